//! Shared setup for the integration tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use club_tournament::{
    MemoryStore, Outcome, ParticipantId, ProgressionEngine, Round, Tournament, TournamentId,
    TournamentStore,
};

pub type Engine = ProgressionEngine<MemoryStore>;

/// A tournament opening for registration now, starting tomorrow.
pub fn tournament(capacity: usize) -> Tournament {
    let now = Utc::now();
    Tournament::new(
        "Grand Championship",
        capacity,
        now + Duration::days(1),
        now + Duration::days(2),
        now + Duration::days(3),
    )
}

/// Engine holding one tournament with `entrants` participants joined one second apart.
pub fn engine_with_roster(capacity: usize, entrants: usize) -> (Engine, TournamentId) {
    let mut engine = ProgressionEngine::new(MemoryStore::new());
    let id = engine.create_tournament(tournament(capacity)).unwrap();
    let base = Utc::now();
    for i in 0..entrants {
        engine
            .join(id, &format!("Member {i}"), base + Duration::seconds(i as i64))
            .unwrap();
    }
    (engine, id)
}

pub fn roster_ids(engine: &Engine, id: TournamentId) -> Vec<ParticipantId> {
    engine
        .store()
        .participants(id)
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect()
}

/// Record `outcome` for every match of `round`.
pub fn resolve(engine: &mut Engine, round: &Round, outcome: Outcome) {
    let ids: Vec<_> = round.matches().iter().map(|m| m.id).collect();
    for id in ids {
        engine.record_result(id, outcome).unwrap();
    }
}

/// Every participant id occurring in the round, once per match played.
pub fn occurrences(round: &Round) -> Vec<ParticipantId> {
    round
        .matches()
        .iter()
        .flat_map(|m| [m.side_a, m.side_b])
        .collect()
}
