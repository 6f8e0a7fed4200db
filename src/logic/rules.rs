//! Capacity whitelist and the sizing rules that pick knockout vs. group stage.

use crate::models::{ConfigurationError, TournamentError};
use serde::{Deserialize, Serialize};

/// Capacities that keep every group and knockout round exactly sized.
pub const ALLOWED_CAPACITIES: [usize; 7] = [2, 4, 8, 16, 32, 48, 96];

/// Reject any capacity outside [`ALLOWED_CAPACITIES`].
pub fn validate_capacity(capacity: usize) -> Result<(), ConfigurationError> {
    if ALLOWED_CAPACITIES.contains(&capacity) {
        Ok(())
    } else {
        Err(ConfigurationError::CapacityNotAllowed(capacity))
    }
}

/// Sizing constants for building rounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageRules {
    /// Largest field played as a straight knockout (must also be a power of two).
    pub knockout_max: usize,
    /// Fields below this size use small groups, others large groups.
    pub large_group_threshold: usize,
    pub small_group_size: usize,
    pub small_required_winners: usize,
    pub large_group_size: usize,
    pub large_required_winners: usize,
}

impl Default for StageRules {
    fn default() -> Self {
        Self {
            knockout_max: 16,
            large_group_threshold: 33,
            small_group_size: 4,
            small_required_winners: 16,
            large_group_size: 6,
            large_required_winners: 32,
        }
    }
}

/// How a group stage splits its survivors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupPlan {
    pub group_size: usize,
    pub num_groups: usize,
    pub winners_per_group: usize,
}

impl StageRules {
    /// Knockout when the field is a power of two no larger than `knockout_max`.
    pub fn uses_knockout(&self, survivors: usize) -> bool {
        survivors <= self.knockout_max && survivors.is_power_of_two()
    }

    /// Group sizing for `survivors`. Fails unless groups divide evenly and each group
    /// sends an even number of winners through.
    pub fn group_plan(&self, survivors: usize) -> Result<GroupPlan, TournamentError> {
        let (group_size, required) = if survivors < self.large_group_threshold {
            (self.small_group_size, self.small_required_winners)
        } else {
            (self.large_group_size, self.large_required_winners)
        };

        if group_size == 0 || survivors % group_size != 0 || survivors < group_size {
            return Err(ConfigurationError::UnevenGroups {
                survivors,
                group_size,
            }
            .into());
        }
        let num_groups = survivors / group_size;
        if required % num_groups != 0 {
            return Err(ConfigurationError::UnevenWinners {
                required,
                groups: num_groups,
            }
            .into());
        }
        let winners_per_group = required / num_groups;
        if winners_per_group > group_size {
            return Err(ConfigurationError::WinnersExceedGroupSize {
                winners: winners_per_group,
                group_size,
            }
            .into());
        }
        if winners_per_group % 2 != 0 {
            return Err(ConfigurationError::OddWinnersPerGroup(winners_per_group).into());
        }

        Ok(GroupPlan {
            group_size,
            num_groups,
            winners_per_group,
        })
    }
}
