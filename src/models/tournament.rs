//! Tournament configuration and its own invariants.

use crate::logic::rules::validate_capacity;
use crate::models::error::{ConfigurationError, TournamentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A club tournament. Its roster and rounds are kept by the store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    /// Maximum number of participants. Must be one of the allowed capacities.
    pub capacity: usize,
    /// Last moment participants may join or withdraw.
    pub deadline: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub created_on: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament. Nothing is validated until [`Tournament::validate`].
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        deadline: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            capacity,
            deadline,
            start,
            end,
            created_on: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check capacity, date ordering and roster size against the tournament's own rules.
    pub fn validate(&self, participants: usize) -> Result<(), TournamentError> {
        validate_capacity(self.capacity)?;
        if self.capacity < participants {
            return Err(ConfigurationError::Oversubscribed {
                capacity: self.capacity,
                participants,
            }
            .into());
        }
        if self.deadline > self.start {
            return Err(ConfigurationError::DeadlineAfterStart.into());
        }
        if self.start > self.end {
            return Err(ConfigurationError::StartAfterEnd.into());
        }
        if self.deadline < self.created_on {
            return Err(ConfigurationError::DeadlineBeforeCreation.into());
        }
        Ok(())
    }

    pub fn is_full(&self, participants: usize) -> bool {
        participants >= self.capacity
    }

    /// Number of rounds a tournament starting with `participants` entrants will take.
    pub fn max_round_num(participants: usize) -> u32 {
        if participants > 32 {
            6
        } else if participants > 16 {
            5
        } else {
            let mut n = participants;
            let mut rounds = 0;
            while n > 1 {
                rounds += 1;
                n = n.div_ceil(2);
            }
            rounds
        }
    }
}
