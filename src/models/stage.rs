//! Rounds of a tournament: knockout stages, group stages and the groups inside them.

use crate::models::game::{GameMatch, MatchId};
use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a round.
pub type RoundId = uuid::Uuid;

/// Unique identifier for a round-robin group.
pub type GroupId = uuid::Uuid;

/// A round of disjoint one-shot pairings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutStage {
    pub id: RoundId,
    pub round_num: u32,
    /// Pairings in bracket order.
    pub matches: Vec<GameMatch>,
}

/// A round-robin group inside a group stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub winners_required: usize,
    /// Members in seeding order.
    pub members: Vec<ParticipantId>,
    pub matches: Vec<GameMatch>,
}

/// A round made of several groups whose winners are interleaved into the next round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStage {
    pub id: RoundId,
    pub round_num: u32,
    pub groups: Vec<Group>,
}

/// One numbered phase of a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Round {
    Knockout(KnockoutStage),
    Group(GroupStage),
}

/// Who goes through from a completed round and who goes out.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Advancing participants, in the order the next round pairs them.
    pub advancing: Vec<ParticipantId>,
    pub eliminated: Vec<ParticipantId>,
}

/// One row of a group table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant: ParticipantId,
    /// Win = 1, stalemate = 0.5, loss = 0.
    pub score: f64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub played: u32,
    /// Position the participant entered the group at.
    pub seed: usize,
}

impl Round {
    pub fn id(&self) -> RoundId {
        match self {
            Round::Knockout(stage) => stage.id,
            Round::Group(stage) => stage.id,
        }
    }

    pub fn round_num(&self) -> u32 {
        match self {
            Round::Knockout(stage) => stage.round_num,
            Round::Group(stage) => stage.round_num,
        }
    }

    pub fn is_knockout(&self) -> bool {
        matches!(self, Round::Knockout(_))
    }

    /// Every match in the round, group by group for a group stage.
    pub fn matches(&self) -> Vec<&GameMatch> {
        match self {
            Round::Knockout(stage) => stage.matches.iter().collect(),
            Round::Group(stage) => stage.groups.iter().flat_map(|g| g.matches.iter()).collect(),
        }
    }

    pub fn find_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches().into_iter().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        match self {
            Round::Knockout(stage) => stage.matches.iter_mut().find(|m| m.id == id),
            Round::Group(stage) => stage
                .groups
                .iter_mut()
                .flat_map(|g| g.matches.iter_mut())
                .find(|m| m.id == id),
        }
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        match self {
            Round::Knockout(_) => None,
            Round::Group(stage) => stage.groups.iter().find(|g| g.id == id),
        }
    }

    /// True when no match of the round is still unplayed.
    pub fn is_complete(&self) -> bool {
        self.matches().iter().all(|m| m.is_complete())
    }
}
