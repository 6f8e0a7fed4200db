//! Group stage: round-robin groups, standings, and the seeded interleave of group winners.

use crate::logic::rules::StageRules;
use crate::models::{
    GameMatch, Group, GroupStage, Outcome, ParticipantId, RoundOutcome, Standing,
    TournamentError,
};
use std::collections::HashMap;
use uuid::Uuid;

impl Group {
    /// A complete round robin: one match for every unordered pair of `members`.
    pub fn round_robin(
        round_num: u32,
        members: &[ParticipantId],
        winners_required: usize,
    ) -> Result<Self, TournamentError> {
        let id = Uuid::new_v4();
        let mut matches = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                matches.push(GameMatch::new(a, b, round_num, Some(id))?);
            }
        }
        let group = Self {
            id,
            winners_required,
            members: members.to_vec(),
            matches,
        };
        group.validate()?;
        Ok(group)
    }

    /// Every member plays every other member exactly once.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let k = self.members.len();
        if self.matches.len() != k * k.saturating_sub(1) / 2 {
            return Err(TournamentError::structural(format!(
                "a group of {} needs {} matches, found {}",
                k,
                k * k.saturating_sub(1) / 2,
                self.matches.len()
            )));
        }

        let mut occurrences: HashMap<ParticipantId, usize> =
            self.members.iter().map(|&p| (p, 0)).collect();
        if occurrences.len() != k {
            return Err(TournamentError::structural("a group lists the same member twice"));
        }
        let mut pairs = std::collections::HashSet::with_capacity(self.matches.len());
        for m in &self.matches {
            for id in [m.side_a, m.side_b] {
                match occurrences.get_mut(&id) {
                    Some(count) => *count += 1,
                    None => {
                        return Err(TournamentError::structural(format!(
                            "participant {} plays in a group they are not a member of",
                            id
                        )))
                    }
                }
            }
            let pair = if m.side_a < m.side_b {
                (m.side_a, m.side_b)
            } else {
                (m.side_b, m.side_a)
            };
            if !pairs.insert(pair) {
                return Err(TournamentError::structural(format!(
                    "{} and {} meet more than once in a group",
                    pair.0, pair.1
                )));
            }
        }
        if occurrences.values().any(|&n| n != k - 1) {
            return Err(TournamentError::structural(
                "not all players play the correct number of games",
            ));
        }
        if self.winners_required > k {
            return Err(TournamentError::structural(format!(
                "a group of {} cannot send {} winners through",
                k, self.winners_required
            )));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.is_complete())
    }

    /// Current table, best first: score, then wins, then seeding position.
    ///
    /// Unplayed matches are ignored, so this also serves for display mid-round.
    pub fn standings(&self) -> Vec<Standing> {
        let mut table: Vec<Standing> = self
            .members
            .iter()
            .enumerate()
            .map(|(seed, &participant)| Standing {
                participant,
                score: 0.0,
                wins: 0,
                draws: 0,
                losses: 0,
                played: 0,
                seed,
            })
            .collect();
        let index: HashMap<ParticipantId, usize> =
            self.members.iter().enumerate().map(|(i, &p)| (p, i)).collect();

        for m in &self.matches {
            let (Some(&a), Some(&b)) = (index.get(&m.side_a), index.get(&m.side_b)) else {
                continue;
            };
            match m.result {
                Outcome::Incomplete => continue,
                Outcome::SideAVictory => {
                    table[a].record_win();
                    table[b].losses += 1;
                }
                Outcome::SideBVictory => {
                    table[b].record_win();
                    table[a].losses += 1;
                }
                Outcome::Stalemate => {
                    table[a].record_draw();
                    table[b].record_draw();
                }
            }
            table[a].played += 1;
            table[b].played += 1;
        }

        table.sort_by(|x, y| {
            y.score
                .total_cmp(&x.score)
                .then(y.wins.cmp(&x.wins))
                .then(x.seed.cmp(&y.seed))
        });
        table
    }

    /// Top `winners_required` of the final table advance; the rest are out.
    /// `None` while any match is unplayed.
    pub fn winners(&self) -> Option<RoundOutcome> {
        if !self.is_complete() {
            return None;
        }
        let table = self.standings();
        let cut = self.winners_required.min(table.len());
        Some(RoundOutcome {
            advancing: table[..cut].iter().map(|s| s.participant).collect(),
            eliminated: table[cut..].iter().map(|s| s.participant).collect(),
        })
    }
}

impl Standing {
    fn record_win(&mut self) {
        self.score += 1.0;
        self.wins += 1;
    }

    fn record_draw(&mut self) {
        self.score += 0.5;
        self.draws += 1;
    }
}

impl GroupStage {
    /// Split the ordered survivors into consecutive groups sized by `rules`.
    pub fn build(
        round_num: u32,
        survivors: &[ParticipantId],
        rules: &StageRules,
    ) -> Result<Self, TournamentError> {
        let plan = rules.group_plan(survivors.len())?;
        let groups = survivors
            .chunks_exact(plan.group_size)
            .map(|chunk| Group::round_robin(round_num, chunk, plan.winners_per_group))
            .collect::<Result<Vec<_>, _>>()?;

        let stage = Self {
            id: Uuid::new_v4(),
            round_num,
            groups,
        };
        stage.validate()?;
        if stage.groups.len() != plan.num_groups {
            return Err(TournamentError::structural(format!(
                "expected {} groups, built {}",
                plan.num_groups,
                stage.groups.len()
            )));
        }
        Ok(stage)
    }

    /// At least one group, every group a complete round robin, nobody in two groups.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.groups.is_empty() {
            return Err(TournamentError::structural("no groups assigned to the stage"));
        }
        let mut seen = std::collections::HashSet::new();
        for group in &self.groups {
            group.validate()?;
            if let Some(dup) = group.members.iter().find(|&&p| !seen.insert(p)) {
                return Err(TournamentError::structural(format!(
                    "participant {} is in more than one group",
                    dup
                )));
            }
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(|g| g.is_complete())
    }

    /// Group winners interleaved so former group-mates are never adjacent.
    /// `None` while any group is unfinished.
    pub fn winners(&self) -> Result<Option<RoundOutcome>, TournamentError> {
        let mut placings = Vec::with_capacity(self.groups.len());
        let mut eliminated = Vec::new();
        for group in &self.groups {
            match group.winners() {
                Some(outcome) => {
                    placings.push(outcome.advancing);
                    eliminated.extend(outcome.eliminated);
                }
                None => return Ok(None),
            }
        }
        let advancing = seeded_interleave(&placings)?;
        Ok(Some(RoundOutcome {
            advancing,
            eliminated,
        }))
    }
}

/// Diagonal interleave of group placings.
///
/// `placings[j][p]` is the `p`-th placed winner of group `j`. For each slot `i` and each
/// group `j` in turn, emits `placings[j][(i + j) % w]`, where `w` is the winners per group.
pub fn seeded_interleave(
    placings: &[Vec<ParticipantId>],
) -> Result<Vec<ParticipantId>, TournamentError> {
    let Some(first) = placings.first() else {
        return Ok(Vec::new());
    };
    let per_group = first.len();
    if placings.iter().any(|p| p.len() != per_group) {
        return Err(TournamentError::structural(
            "groups disagree on how many winners they send through",
        ));
    }

    let mut order = Vec::with_capacity(per_group * placings.len());
    for slot in 0..per_group {
        for (j, group) in placings.iter().enumerate() {
            order.push(group[(slot + j) % per_group]);
        }
    }
    Ok(order)
}
