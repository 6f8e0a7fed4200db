//! Data structures for a club tournament: participants, matches, rounds, tournament.

mod error;
mod game;
mod participant;
mod stage;
mod tournament;

pub use error::{ConfigurationError, Entity, TournamentError};
pub use game::{GameMatch, MatchId, Outcome};
pub use participant::{Participant, ParticipantId};
pub use stage::{Group, GroupId, GroupStage, KnockoutStage, Round, RoundId, RoundOutcome, Standing};
pub use tournament::{Tournament, TournamentId};
