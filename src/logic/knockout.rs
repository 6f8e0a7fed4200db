//! Knockout stage: positional pairing, structural check and winner extraction.

use crate::models::{
    GameMatch, KnockoutStage, Outcome, ParticipantId, RoundOutcome, TournamentError,
};
use std::collections::HashSet;
use uuid::Uuid;

impl KnockoutStage {
    /// Pair survivors by position: 0 vs 1, 2 vs 3, ...
    ///
    /// The survivor order must be the order the previous round produced its winners in.
    pub fn build(round_num: u32, survivors: &[ParticipantId]) -> Result<Self, TournamentError> {
        if survivors.len() % 2 != 0 {
            return Err(TournamentError::structural(format!(
                "cannot pair an odd field of {} for a knockout",
                survivors.len()
            )));
        }
        let matches = survivors
            .chunks_exact(2)
            .map(|pair| GameMatch::new(pair[0], pair[1], round_num, None))
            .collect::<Result<Vec<_>, _>>()?;

        let stage = Self {
            id: Uuid::new_v4(),
            round_num,
            matches,
        };
        stage.validate_entrants(survivors)?;
        Ok(stage)
    }

    /// Match count is a power of two and nobody plays twice.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if !self.matches.len().is_power_of_two() {
            return Err(TournamentError::structural(format!(
                "the number of matches must be a power of two, found {}",
                self.matches.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.matches.len() * 2);
        for m in &self.matches {
            for id in [m.side_a, m.side_b] {
                if !seen.insert(id) {
                    return Err(TournamentError::structural(format!(
                        "participant {} plays more than one knockout match",
                        id
                    )));
                }
            }
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus every survivor appears and nobody else does.
    pub fn validate_entrants(&self, survivors: &[ParticipantId]) -> Result<(), TournamentError> {
        self.validate()?;
        if self.matches.len() * 2 != survivors.len() {
            return Err(TournamentError::structural(format!(
                "{} survivors need {} matches, found {}",
                survivors.len(),
                survivors.len() / 2,
                self.matches.len()
            )));
        }
        let expected: HashSet<_> = survivors.iter().copied().collect();
        if let Some(m) = self
            .matches
            .iter()
            .find(|m| !expected.contains(&m.side_a) || !expected.contains(&m.side_b))
        {
            return Err(TournamentError::structural(format!(
                "match {} includes a participant who is not a survivor",
                m.id
            )));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.is_complete())
    }

    /// Victors in match order, losers out in this round. `None` while any match is unplayed.
    ///
    /// A stalemate cannot advance anyone, so finding one here is a structural error.
    pub fn winners(&self) -> Result<Option<RoundOutcome>, TournamentError> {
        if !self.is_complete() {
            return Ok(None);
        }
        let mut outcome = RoundOutcome::default();
        for m in &self.matches {
            match m.decided() {
                Some((victor, loser)) => {
                    outcome.advancing.push(victor);
                    outcome.eliminated.push(loser);
                }
                None => {
                    debug_assert_eq!(m.result, Outcome::Stalemate);
                    return Err(TournamentError::structural(format!(
                        "knockout match {} ended in a stalemate and has no victor",
                        m.id
                    )));
                }
            }
        }
        Ok(Some(outcome))
    }
}
