//! Participant: one club member entered into one tournament.

use crate::models::error::TournamentError;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = Uuid;

/// A member entered into a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub name: String,
    /// Round in which the participant was knocked out; `None` while still active.
    pub round_eliminated: Option<u32>,
    /// Registration time. Roster order (and therefore seeding) follows it.
    pub joined: DateTime<Utc>,
}

impl Participant {
    pub fn new(
        tournament_id: TournamentId,
        name: impl Into<String>,
        joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            round_eliminated: None,
            joined,
        }
    }

    pub fn is_active(&self) -> bool {
        self.round_eliminated.is_none()
    }

    /// Mark the participant as knocked out in `round_num`.
    ///
    /// Returns `Ok(true)` when this call eliminated them and `Ok(false)` when they were
    /// already eliminated in the same round. Eliminating them in a different round is rejected.
    pub fn eliminate(&mut self, round_num: u32) -> Result<bool, TournamentError> {
        match self.round_eliminated {
            None => {
                self.round_eliminated = Some(round_num);
                Ok(true)
            }
            Some(r) if r == round_num => Ok(false),
            Some(r) => Err(TournamentError::invalid_state(format!(
                "{} was already eliminated in round {}",
                self.name, r
            ))),
        }
    }
}
