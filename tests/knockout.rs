//! Knockout stage: pairing, structural checks and winner extraction.

use club_tournament::{GameMatch, KnockoutStage, Outcome, TournamentError};
use std::collections::HashSet;
use uuid::Uuid;

fn field(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

#[test]
fn knockout_parity_for_every_power_of_two() {
    for n in [2, 4, 8, 16] {
        let survivors = field(n);
        let stage = KnockoutStage::build(1, &survivors).unwrap();
        assert_eq!(stage.matches.len(), n / 2);

        let seen: Vec<_> = stage
            .matches
            .iter()
            .flat_map(|m| [m.side_a, m.side_b])
            .collect();
        assert_eq!(seen.len(), n);
        assert_eq!(
            seen.iter().collect::<HashSet<_>>(),
            survivors.iter().collect::<HashSet<_>>()
        );
    }
}

#[test]
fn pairs_survivors_by_position() {
    let survivors = field(8);
    let stage = KnockoutStage::build(3, &survivors).unwrap();
    for (i, m) in stage.matches.iter().enumerate() {
        assert_eq!(m.side_a, survivors[2 * i]);
        assert_eq!(m.side_b, survivors[2 * i + 1]);
        assert_eq!(m.round_num, 3);
        assert_eq!(m.group, None);
        assert_eq!(m.result, Outcome::Incomplete);
    }
}

#[test]
fn odd_field_cannot_be_paired() {
    assert!(matches!(
        KnockoutStage::build(1, &field(5)),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn match_count_must_be_a_power_of_two() {
    let mut stage = KnockoutStage::build(1, &field(8)).unwrap();
    stage.matches.pop();
    assert!(matches!(
        stage.validate(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn participant_cannot_play_twice() {
    let survivors = field(4);
    let mut stage = KnockoutStage::build(1, &survivors).unwrap();
    stage.matches[1] = GameMatch::new(survivors[0], survivors[3], 1, None).unwrap();
    assert!(matches!(
        stage.validate(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn omitted_survivor_is_detected() {
    let survivors = field(4);
    let stage = KnockoutStage::build(1, &survivors).unwrap();
    let mut other = survivors.clone();
    other[3] = Uuid::new_v4();
    assert!(matches!(
        stage.validate_entrants(&other),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn cannot_play_yourself() {
    let p = Uuid::new_v4();
    assert!(matches!(
        GameMatch::new(p, p, 1, None),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn winners_are_none_until_every_match_is_played() {
    let mut stage = KnockoutStage::build(1, &field(8)).unwrap();
    for m in stage.matches.iter_mut().take(3) {
        m.record_result(Outcome::SideAVictory).unwrap();
    }
    assert!(!stage.is_complete());
    assert_eq!(stage.winners().unwrap(), None);
}

#[test]
fn winners_follow_match_order() {
    let survivors = field(8);
    let mut stage = KnockoutStage::build(2, &survivors).unwrap();
    let results = [
        Outcome::SideAVictory,
        Outcome::SideBVictory,
        Outcome::SideBVictory,
        Outcome::SideAVictory,
    ];
    for (m, r) in stage.matches.iter_mut().zip(results) {
        m.record_result(r).unwrap();
    }
    let outcome = stage.winners().unwrap().unwrap();
    assert_eq!(
        outcome.advancing,
        vec![survivors[0], survivors[3], survivors[5], survivors[6]]
    );
    assert_eq!(
        outcome.eliminated,
        vec![survivors[1], survivors[2], survivors[4], survivors[7]]
    );
}

#[test]
fn stalemate_in_a_knockout_is_an_error_not_a_silent_drop() {
    let mut stage = KnockoutStage::build(1, &field(2)).unwrap();
    stage.matches[0].record_result(Outcome::Stalemate).unwrap();
    assert!(matches!(
        stage.winners(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn result_can_only_be_recorded_once() {
    let mut stage = KnockoutStage::build(1, &field(2)).unwrap();
    let m = &mut stage.matches[0];
    m.record_result(Outcome::SideAVictory).unwrap();
    assert!(matches!(
        m.record_result(Outcome::SideBVictory),
        Err(TournamentError::InvalidState(_))
    ));
    assert_eq!(m.result, Outcome::SideAVictory);
}

#[test]
fn incomplete_is_not_a_result() {
    let mut stage = KnockoutStage::build(1, &field(2)).unwrap();
    assert!(matches!(
        stage.matches[0].record_result(Outcome::Incomplete),
        Err(TournamentError::InvalidState(_))
    ));
    assert!(!stage.matches[0].is_complete());
}
