//! Tournament business logic: sizing rules, knockout and group stages, round progression.

mod group_stage;
mod knockout;
mod progression;
pub mod roster;
pub mod rules;

pub use group_stage::seeded_interleave;
pub use progression::{ProgressState, ProgressionEngine};
pub use roster::{read_roster_csv, FittedRoster, RosterImportError};
pub use rules::{validate_capacity, GroupPlan, StageRules, ALLOWED_CAPACITIES};
