//! Club tournament engine: builds knockout and group-stage rounds from a roster,
//! records results, and carries the field through to a single champion.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    read_roster_csv, seeded_interleave, validate_capacity, GroupPlan, ProgressState,
    ProgressionEngine, RosterImportError, StageRules, ALLOWED_CAPACITIES,
};
pub use models::{
    ConfigurationError, Entity, GameMatch, Group, GroupId, GroupStage, KnockoutStage, MatchId,
    Outcome, Participant, ParticipantId, Round, RoundId, RoundOutcome, Standing, Tournament,
    TournamentError, TournamentId,
};
pub use store::{MemoryStore, TournamentStore};
