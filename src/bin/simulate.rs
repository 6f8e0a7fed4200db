//! Play a whole tournament with random results and print how it went.
//! Run with: cargo run --bin simulate -- [capacity] [roster.csv]
//! Without a roster file the tournament is filled with generated members.
//! Set SIM_SEED for a reproducible run.

use chrono::{Duration, Utc};
use club_tournament::{
    read_roster_csv, MemoryStore, Outcome, ProgressionEngine, Round, Tournament, TournamentStore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::File;

/// Chance that a group match ends in a stalemate.
const STALEMATE_CHANCE: f64 = 0.1;

fn random_outcome(rng: &mut StdRng, knockout: bool) -> Outcome {
    if !knockout && rng.gen_bool(STALEMATE_CHANCE) {
        Outcome::Stalemate
    } else if rng.gen_bool(0.5) {
        Outcome::SideAVictory
    } else {
        Outcome::SideBVictory
    }
}

fn describe(round: &Round) -> String {
    match round {
        Round::Knockout(stage) => format!("knockout, {} matches", stage.matches.len()),
        Round::Group(stage) => format!(
            "group stage, {} groups of {}",
            stage.groups.len(),
            stage.groups.first().map_or(0, |g| g.members.len())
        ),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let capacity: usize = match args.next() {
        Some(c) => c.parse()?,
        None => 16,
    };
    let names = match args.next() {
        Some(path) => read_roster_csv(File::open(path)?)?,
        None => (1..=capacity).map(|i| format!("Member {i}")).collect(),
    };

    let mut rng = match std::env::var("SIM_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let now = Utc::now();
    let tournament = Tournament::new(
        "Simulated Championship",
        capacity,
        now + Duration::days(1),
        now + Duration::days(2),
        now + Duration::days(3),
    );
    let mut engine = ProgressionEngine::new(MemoryStore::new());
    let id = engine.create_tournament(tournament)?;
    for (i, name) in names.iter().take(capacity).enumerate() {
        engine.join(id, name, now + Duration::seconds(i as i64))?;
    }

    while let Some(round) = engine.generate_next_round(id)? {
        println!("Round {}: {}", round.round_num(), describe(&round));
        let knockout = round.is_knockout();
        for game in round.matches() {
            engine.record_result(game.id, random_outcome(&mut rng, knockout))?;
        }
    }

    let roster = engine.store().participants(id)?;
    match engine.champion(id)? {
        Some(champion) => {
            let name = roster
                .iter()
                .find(|p| p.id == champion)
                .map_or("unknown", |p| p.name.as_str());
            println!("Champion: {name}");
        }
        None => println!("No champion: not enough participants"),
    }
    let mut by_round: Vec<_> = roster.iter().filter_map(|p| p.round_eliminated).collect();
    by_round.sort_unstable();
    by_round.dedup();
    for r in by_round {
        let out = roster.iter().filter(|p| p.round_eliminated == Some(r)).count();
        println!("  eliminated in round {r}: {out}");
    }
    Ok(())
}
