//! Persistence seam for the progression engine, plus an in-memory implementation.

use crate::models::{
    Entity, GameMatch, Group, GroupId, MatchId, Participant, ParticipantId, Round, Tournament,
    TournamentError, TournamentId,
};
use std::collections::HashMap;

/// Loads and saves the records the engine works on.
///
/// Callers must serialize `generate_next_round` and `record_result` per tournament;
/// implementations are not expected to detect interleaved writes.
pub trait TournamentStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError>;

    /// Roster in registration order.
    fn participants(&self, id: TournamentId) -> Result<Vec<Participant>, TournamentError>;

    /// Every round, in ascending round number.
    fn rounds(&self, id: TournamentId) -> Result<Vec<Round>, TournamentError>;

    /// The round with the highest round number, if any.
    fn current_round(&self, id: TournamentId) -> Result<Option<Round>, TournamentError> {
        Ok(self
            .rounds(id)?
            .into_iter()
            .max_by_key(|r| r.round_num()))
    }

    /// The round holding `match_id`, with the tournament it belongs to.
    fn round_containing(&self, match_id: MatchId)
        -> Result<(TournamentId, Round), TournamentError>;

    fn group(&self, group_id: GroupId) -> Result<Group, TournamentError>;

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError>;

    fn save_round(&mut self, tournament_id: TournamentId, round: &Round)
        -> Result<(), TournamentError>;

    fn save_match(&mut self, tournament_id: TournamentId, game: &GameMatch)
        -> Result<(), TournamentError>;

    fn save_participant(&mut self, participant: &Participant) -> Result<(), TournamentError>;

    fn remove_participant(
        &mut self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<(), TournamentError>;
}

#[derive(Clone, Debug)]
struct Entry {
    tournament: Tournament,
    participants: Vec<Participant>,
    rounds: Vec<Round>,
}

/// Everything held in a map keyed by tournament.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<TournamentId, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: TournamentId) -> Result<&Entry, TournamentError> {
        self.entries
            .get(&id)
            .ok_or(TournamentError::NotFound(Entity::Tournament(id)))
    }

    fn entry_mut(&mut self, id: TournamentId) -> Result<&mut Entry, TournamentError> {
        self.entries
            .get_mut(&id)
            .ok_or(TournamentError::NotFound(Entity::Tournament(id)))
    }
}

impl TournamentStore for MemoryStore {
    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        Ok(self.entry(id)?.tournament.clone())
    }

    fn participants(&self, id: TournamentId) -> Result<Vec<Participant>, TournamentError> {
        let mut roster = self.entry(id)?.participants.clone();
        // Stable: equal join times keep insertion order.
        roster.sort_by_key(|p| p.joined);
        Ok(roster)
    }

    fn rounds(&self, id: TournamentId) -> Result<Vec<Round>, TournamentError> {
        Ok(self.entry(id)?.rounds.clone())
    }

    fn round_containing(
        &self,
        match_id: MatchId,
    ) -> Result<(TournamentId, Round), TournamentError> {
        self.entries
            .iter()
            .find_map(|(id, entry)| {
                entry
                    .rounds
                    .iter()
                    .find(|r| r.find_match(match_id).is_some())
                    .map(|r| (*id, r.clone()))
            })
            .ok_or(TournamentError::NotFound(Entity::Match(match_id)))
    }

    fn group(&self, group_id: GroupId) -> Result<Group, TournamentError> {
        self.entries
            .values()
            .flat_map(|entry| entry.rounds.iter())
            .find_map(|r| r.group(group_id).cloned())
            .ok_or(TournamentError::NotFound(Entity::Group(group_id)))
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError> {
        self.entries
            .entry(tournament.id)
            .and_modify(|e| e.tournament = tournament.clone())
            .or_insert_with(|| Entry {
                tournament: tournament.clone(),
                participants: Vec::new(),
                rounds: Vec::new(),
            });
        Ok(())
    }

    fn save_round(
        &mut self,
        tournament_id: TournamentId,
        round: &Round,
    ) -> Result<(), TournamentError> {
        let entry = self.entry_mut(tournament_id)?;
        match entry.rounds.iter_mut().find(|r| r.id() == round.id()) {
            Some(existing) => *existing = round.clone(),
            None => entry.rounds.push(round.clone()),
        }
        entry.rounds.sort_by_key(|r| r.round_num());
        Ok(())
    }

    fn save_match(
        &mut self,
        tournament_id: TournamentId,
        game: &GameMatch,
    ) -> Result<(), TournamentError> {
        let entry = self.entry_mut(tournament_id)?;
        let slot = entry
            .rounds
            .iter_mut()
            .find_map(|r| r.find_match_mut(game.id))
            .ok_or(TournamentError::NotFound(Entity::Match(game.id)))?;
        *slot = game.clone();
        Ok(())
    }

    fn save_participant(&mut self, participant: &Participant) -> Result<(), TournamentError> {
        let entry = self.entry_mut(participant.tournament_id)?;
        match entry.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant.clone(),
            None => entry.participants.push(participant.clone()),
        }
        Ok(())
    }

    fn remove_participant(
        &mut self,
        tournament_id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<(), TournamentError> {
        let entry = self.entry_mut(tournament_id)?;
        let idx = entry
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(TournamentError::NotFound(Entity::Participant(participant_id)))?;
        entry.participants.remove(idx);
        Ok(())
    }
}
