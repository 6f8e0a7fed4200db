//! Error taxonomy for tournament configuration, round structure, and state transitions.

use crate::models::game::MatchId;
use crate::models::participant::ParticipantId;
use crate::models::stage::GroupId;
use crate::models::tournament::TournamentId;
use serde::Serialize;
use thiserror::Error;

/// A tournament-level invariant that does not hold. Reported before any round is created.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("capacity {0} is not one of the allowed sizes (2, 4, 8, 16, 32, 48, 96)")]
    CapacityNotAllowed(usize),
    #[error("the registration deadline cannot be after the start")]
    DeadlineAfterStart,
    #[error("the tournament should have a positive duration")]
    StartAfterEnd,
    #[error("the registration deadline cannot be before the tournament was created")]
    DeadlineBeforeCreation,
    #[error("{participants} participants exceed the capacity of {capacity}")]
    Oversubscribed { capacity: usize, participants: usize },
    #[error("{survivors} survivors cannot be split into groups of {group_size}")]
    UnevenGroups { survivors: usize, group_size: usize },
    #[error("{required} winners cannot be shared evenly between {groups} groups")]
    UnevenWinners { required: usize, groups: usize },
    #[error("{0} winners per group is odd; the seeded interleave needs an even count")]
    OddWinnersPerGroup(usize),
    #[error("{winners} winners per group exceeds the group size of {group_size}")]
    WinnersExceedGroupSize { winners: usize, group_size: usize },
}

/// The kind of record a lookup failed to find.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Entity {
    Tournament(TournamentId),
    Match(MatchId),
    Group(GroupId),
    Participant(ParticipantId),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::Tournament(id) => write!(f, "Tournament {}", id),
            Entity::Match(id) => write!(f, "Match {}", id),
            Entity::Group(id) => write!(f, "Group {}", id),
            Entity::Participant(id) => write!(f, "Participant {}", id),
        }
    }
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Bad capacity, date ordering, oversubscribed roster or unusable group sizing.
    #[error("invalid tournament configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A freshly built round is malformed. Always an engine bug; the round is never persisted.
    #[error("round failed its structural check: {0}")]
    StructuralInvariant(String),
    /// The operation does not apply to the record in its current state. Nothing was changed.
    #[error("{0}")]
    InvalidState(String),
    #[error("{0} not found")]
    NotFound(Entity),
}

impl TournamentError {
    pub(crate) fn invalid_state(msg: impl Into<String>) -> Self {
        TournamentError::InvalidState(msg.into())
    }

    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        TournamentError::StructuralInvariant(msg.into())
    }
}
