//! Match (game) between two participants and its Outcome.

use crate::models::error::TournamentError;
use crate::models::participant::ParticipantId;
use crate::models::stage::GroupId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Result of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Incomplete,
    SideAVictory,
    SideBVictory,
    Stalemate,
}

impl Outcome {
    /// A win for either side.
    pub fn is_decisive(self) -> bool {
        matches!(self, Outcome::SideAVictory | Outcome::SideBVictory)
    }
}

/// A single game between `side_a` and `side_b`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub side_a: ParticipantId,
    pub side_b: ParticipantId,
    pub result: Outcome,
    /// Round this match was generated for.
    pub round_num: u32,
    /// Owning group when the match is part of a group stage.
    pub group: Option<GroupId>,
}

impl GameMatch {
    /// Create an unplayed match. A participant cannot play themselves.
    pub fn new(
        side_a: ParticipantId,
        side_b: ParticipantId,
        round_num: u32,
        group: Option<GroupId>,
    ) -> Result<Self, TournamentError> {
        if side_a == side_b {
            return Err(TournamentError::structural(format!(
                "participant {} cannot play themselves",
                side_a
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            side_a,
            side_b,
            result: Outcome::Incomplete,
            round_num,
            group,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.result != Outcome::Incomplete
    }

    /// Set the result. Only an unplayed match accepts one, and only once.
    pub fn record_result(&mut self, outcome: Outcome) -> Result<(), TournamentError> {
        if self.is_complete() {
            return Err(TournamentError::invalid_state(
                "The match has already had the result registered",
            ));
        }
        if outcome == Outcome::Incomplete {
            return Err(TournamentError::invalid_state(
                "A result must be a victory or a stalemate",
            ));
        }
        self.result = outcome;
        Ok(())
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.side_a == participant || self.side_b == participant
    }

    /// Victor and loser of a decisive match.
    pub fn decided(&self) -> Option<(ParticipantId, ParticipantId)> {
        match self.result {
            Outcome::SideAVictory => Some((self.side_a, self.side_b)),
            Outcome::SideBVictory => Some((self.side_b, self.side_a)),
            Outcome::Incomplete | Outcome::Stalemate => None,
        }
    }
}
