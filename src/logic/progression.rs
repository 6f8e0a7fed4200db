//! Round orchestration: decides the shape of the next round, builds it, and tracks completion.

use crate::logic::roster::{check_join, check_withdraw, fit_to_capacity, FittedRoster};
use crate::logic::rules::StageRules;
use crate::models::{
    Entity, GroupId, GroupStage, KnockoutStage, MatchId, Outcome, Participant, ParticipantId,
    Round, RoundOutcome, Standing, Tournament, TournamentError, TournamentId,
};
use crate::store::TournamentStore;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where a tournament stands between rounds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProgressState {
    /// No round exists yet.
    NotStarted,
    /// The current round still has unplayed matches.
    RoundInProgress { round_num: u32 },
    /// Every match of the current round is played; the next round can be generated.
    RoundComplete { round_num: u32 },
    /// A single participant is left.
    TournamentComplete { champion: ParticipantId },
}

impl RoundOutcome {
    fn champion(&self) -> Option<ParticipantId> {
        match self.advancing.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl Round {
    /// Build the round `survivors` call for: knockout when the field allows it, groups otherwise.
    pub fn build(
        round_num: u32,
        survivors: &[ParticipantId],
        rules: &StageRules,
    ) -> Result<Self, TournamentError> {
        if rules.uses_knockout(survivors.len()) {
            KnockoutStage::build(round_num, survivors).map(Round::Knockout)
        } else {
            GroupStage::build(round_num, survivors, rules).map(Round::Group)
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        match self {
            Round::Knockout(stage) => stage.validate(),
            Round::Group(stage) => stage.validate(),
        }
    }

    /// Advancing and eliminated participants once the round is complete, else `None`.
    pub fn winners(&self) -> Result<Option<RoundOutcome>, TournamentError> {
        match self {
            Round::Knockout(stage) => stage.winners(),
            Round::Group(stage) => stage.winners(),
        }
    }
}

/// Drives a tournament from its roster to a single champion.
///
/// One call at a time per tournament: the caller holds whatever lock its store needs
/// around `generate_next_round` and `record_result`.
pub struct ProgressionEngine<S> {
    store: S,
    rules: StageRules,
}

impl<S: TournamentStore> ProgressionEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_rules(store, StageRules::default())
    }

    pub fn with_rules(store: S, rules: StageRules) -> Self {
        Self { store, rules }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validate and persist a new tournament.
    pub fn create_tournament(
        &mut self,
        tournament: Tournament,
    ) -> Result<TournamentId, TournamentError> {
        tournament.validate(0)?;
        self.store.save_tournament(&tournament)?;
        log::info!(
            "Created tournament '{}' ({}) with capacity {}",
            tournament.name,
            tournament.id,
            tournament.capacity
        );
        Ok(tournament.id)
    }

    /// Enter a new participant at the back of the roster.
    pub fn join(
        &mut self,
        tournament_id: TournamentId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Participant, TournamentError> {
        let tournament = self.store.tournament(tournament_id)?;
        let roster = self.store.participants(tournament_id)?;
        let started = self.store.current_round(tournament_id)?.is_some();
        check_join(&tournament, &roster, name, started)?;

        let participant = Participant::new(tournament_id, name.trim(), now);
        self.store.save_participant(&participant)?;
        log::debug!("{} joined tournament {}", participant.name, tournament_id);
        Ok(participant)
    }

    /// Enter a batch of names in order. Either every name is admitted or none is saved.
    pub fn join_all<N: AsRef<str>>(
        &mut self,
        tournament_id: TournamentId,
        names: &[N],
        now: DateTime<Utc>,
    ) -> Result<Vec<Participant>, TournamentError> {
        let tournament = self.store.tournament(tournament_id)?;
        let mut roster = self.store.participants(tournament_id)?;
        let started = self.store.current_round(tournament_id)?.is_some();
        let existing = roster.len();
        for name in names {
            let name = name.as_ref();
            check_join(&tournament, &roster, name, started)?;
            roster.push(Participant::new(tournament_id, name.trim(), now));
        }

        let joined = roster.split_off(existing);
        for participant in &joined {
            self.store.save_participant(participant)?;
        }
        log::info!("{} participant(s) joined tournament {}", joined.len(), tournament_id);
        Ok(joined)
    }

    pub fn withdraw(
        &mut self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        let tournament = self.store.tournament(tournament_id)?;
        let started = self.store.current_round(tournament_id)?.is_some();
        check_withdraw(&tournament, now, started)?;
        self.store.remove_participant(tournament_id, participant_id)?;
        log::debug!(
            "Participant {} withdrew from tournament {}",
            participant_id,
            tournament_id
        );
        Ok(())
    }

    /// Build, validate and persist the next round.
    ///
    /// Returns `Ok(None)` when there is nothing to generate: the current round is still in
    /// progress, the tournament already has its champion, or too few participants joined.
    pub fn generate_next_round(
        &mut self,
        tournament_id: TournamentId,
    ) -> Result<Option<Round>, TournamentError> {
        let mut tournament = self.store.tournament(tournament_id)?;
        let mut roster = self.store.participants(tournament_id)?;
        tournament.validate(roster.len())?;

        // The opening trim is only written once round 1 builds.
        let mut trim = None;
        let (survivors, round_num) = match self.store.current_round(tournament_id)? {
            None => {
                let fitted = fit_to_capacity(tournament.capacity, roster)?;
                let kept: Vec<ParticipantId> = fitted.kept.iter().map(|p| p.id).collect();
                trim = Some(fitted);
                (kept, 1)
            }
            Some(current) => {
                let Some(outcome) = self.settle(&current, &mut roster)? else {
                    log::warn!(
                        "Round {} of tournament {} is still in progress",
                        current.round_num(),
                        tournament_id
                    );
                    return Ok(None);
                };
                if outcome.champion().is_some() {
                    log::warn!("Tournament {} is already complete", tournament_id);
                    return Ok(None);
                }
                (outcome.advancing, current.round_num() + 1)
            }
        };

        if survivors.len() < 2 {
            log::warn!(
                "Tournament {} has {} participant(s); no round to play",
                tournament_id,
                survivors.len()
            );
            return Ok(None);
        }

        let round = Round::build(round_num, &survivors, &self.rules)
            .and_then(|round| round.validate().map(|()| round))
            .inspect_err(|e| {
                if matches!(e, TournamentError::StructuralInvariant(_)) {
                    log::error!("Refusing to persist round {}: {}", round_num, e);
                }
            })?;
        if let Some(fitted) = trim {
            self.apply_trim(&mut tournament, fitted)?;
        }
        self.store.save_round(tournament_id, &round)?;

        log::info!(
            "Generated round {} of tournament {}: {} with {} survivors and {} matches",
            round_num,
            tournament_id,
            if round.is_knockout() { "knockout" } else { "group stage" },
            survivors.len(),
            round.matches().len()
        );
        Ok(Some(round))
    }

    /// Record the result of one match. Knockout matches only accept a decisive result.
    ///
    /// When this completes the round, its losers are marked eliminated.
    pub fn record_result(
        &mut self,
        match_id: MatchId,
        outcome: Outcome,
    ) -> Result<(), TournamentError> {
        let (tournament_id, mut round) = self.store.round_containing(match_id)?;
        if round.is_knockout() && outcome == Outcome::Stalemate {
            return Err(TournamentError::invalid_state(
                "A knockout match needs a victor; replay it instead of recording a stalemate",
            ));
        }
        let game = round
            .find_match_mut(match_id)
            .ok_or(TournamentError::NotFound(Entity::Match(match_id)))?;
        game.record_result(outcome)?;
        let game = game.clone();
        self.store.save_match(tournament_id, &game)?;
        log::debug!(
            "Recorded {:?} for match {} in round {}",
            outcome,
            match_id,
            round.round_num()
        );

        if round.is_complete() {
            let mut roster = self.store.participants(tournament_id)?;
            if let Some(outcome) = self.settle(&round, &mut roster)? {
                match outcome.champion() {
                    Some(champion) => log::info!(
                        "Tournament {} is complete; champion {}",
                        tournament_id,
                        champion
                    ),
                    None => log::info!(
                        "Round {} of tournament {} is complete; {} advance",
                        round.round_num(),
                        tournament_id,
                        outcome.advancing.len()
                    ),
                }
            }
        }
        Ok(())
    }

    /// True once the current round leaves exactly one participant.
    pub fn is_complete(&self, tournament_id: TournamentId) -> Result<bool, TournamentError> {
        Ok(self.champion(tournament_id)?.is_some())
    }

    pub fn champion(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<ParticipantId>, TournamentError> {
        self.store.tournament(tournament_id)?;
        match self.store.current_round(tournament_id)? {
            Some(round) => Ok(round.winners()?.and_then(|o| o.champion())),
            None => Ok(None),
        }
    }

    pub fn state(&self, tournament_id: TournamentId) -> Result<ProgressState, TournamentError> {
        self.store.tournament(tournament_id)?;
        let Some(round) = self.store.current_round(tournament_id)? else {
            return Ok(ProgressState::NotStarted);
        };
        let round_num = round.round_num();
        Ok(match round.winners()? {
            None => ProgressState::RoundInProgress { round_num },
            Some(outcome) => match outcome.champion() {
                Some(champion) => ProgressState::TournamentComplete { champion },
                None => ProgressState::RoundComplete { round_num },
            },
        })
    }

    /// Table of one group, best first, counting only played matches.
    pub fn current_standings(&self, group_id: GroupId) -> Result<Vec<Standing>, TournamentError> {
        Ok(self.store.group(group_id)?.standings())
    }

    pub fn rounds(&self, tournament_id: TournamentId) -> Result<Vec<Round>, TournamentError> {
        self.store.tournament(tournament_id)?;
        self.store.rounds(tournament_id)
    }

    /// Drop the late entrants `fitted` left out and lower the capacity to match.
    fn apply_trim(
        &mut self,
        tournament: &mut Tournament,
        fitted: FittedRoster,
    ) -> Result<(), TournamentError> {
        for p in &fitted.removed {
            self.store.remove_participant(tournament.id, p.id)?;
        }
        if fitted.capacity != tournament.capacity {
            log::warn!(
                "Tournament {} reduced from capacity {} to {}; {} late entrant(s) removed",
                tournament.id,
                tournament.capacity,
                fitted.capacity,
                fitted.removed.len()
            );
            tournament.capacity = fitted.capacity;
            self.store.save_tournament(tournament)?;
        }
        Ok(())
    }

    /// Compute the round's outcome and persist eliminations. Safe to repeat.
    fn settle(
        &mut self,
        round: &Round,
        roster: &mut [Participant],
    ) -> Result<Option<RoundOutcome>, TournamentError> {
        let Some(outcome) = round.winners()? else {
            return Ok(None);
        };
        for &id in &outcome.eliminated {
            let participant = roster
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(TournamentError::NotFound(Entity::Participant(id)))?;
            if participant.eliminate(round.round_num())? {
                self.store.save_participant(participant)?;
                log::debug!("{} eliminated in round {}", participant.name, round.round_num());
            }
        }
        Ok(Some(outcome))
    }
}
