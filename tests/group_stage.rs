//! Group stage: round robins, standings and the seeded interleave.

use club_tournament::{
    seeded_interleave, Group, GroupStage, Outcome, StageRules, TournamentError,
};
use std::collections::HashMap;
use uuid::Uuid;

fn field(n: usize) -> Vec<Uuid> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn set_result(group: &mut Group, a: Uuid, b: Uuid, winner_a: Option<bool>) {
    let m = group
        .matches
        .iter_mut()
        .find(|m| (m.side_a == a && m.side_b == b) || (m.side_a == b && m.side_b == a))
        .unwrap();
    let outcome = match winner_a {
        None => Outcome::Stalemate,
        Some(a_wins) if a_wins == (m.side_a == a) => Outcome::SideAVictory,
        Some(_) => Outcome::SideBVictory,
    };
    m.record_result(outcome).unwrap();
}

#[test]
fn round_robin_is_complete() {
    for k in [4, 6] {
        let members = field(k);
        let group = Group::round_robin(1, &members, 2).unwrap();
        assert_eq!(group.matches.len(), k * (k - 1) / 2);

        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for m in &group.matches {
            *counts.entry(m.side_a).or_default() += 1;
            *counts.entry(m.side_b).or_default() += 1;
            assert_eq!(m.group, Some(group.id));
        }
        assert_eq!(counts.len(), k);
        assert!(counts.values().all(|&c| c == k - 1));
    }
}

#[test]
fn missing_match_fails_validation() {
    let mut group = Group::round_robin(1, &field(4), 2).unwrap();
    group.matches.pop();
    assert!(matches!(
        group.validate(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn repeated_pairing_fails_validation() {
    let members = field(4);
    let mut group = Group::round_robin(1, &members, 2).unwrap();
    // Replace the last pairing with a rematch of the first.
    group.matches[5] = group.matches[0].clone();
    assert!(matches!(
        group.validate(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn stage_without_groups_is_invalid() {
    let mut stage = GroupStage::build(1, &field(32), &StageRules::default()).unwrap();
    stage.groups.clear();
    assert!(matches!(
        stage.validate(),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn ninety_six_field_uses_sixteen_groups_of_six() {
    let survivors = field(96);
    let stage = GroupStage::build(1, &survivors, &StageRules::default()).unwrap();
    assert_eq!(stage.groups.len(), 16);
    for (j, group) in stage.groups.iter().enumerate() {
        assert_eq!(group.members, survivors[j * 6..(j + 1) * 6].to_vec());
        assert_eq!(group.winners_required, 2);
        assert_eq!(group.matches.len(), 15);
    }
}

#[test]
fn thirty_two_field_uses_eight_groups_of_four() {
    let stage = GroupStage::build(4, &field(32), &StageRules::default()).unwrap();
    assert_eq!(stage.groups.len(), 8);
    assert!(stage
        .groups
        .iter()
        .all(|g| g.members.len() == 4 && g.winners_required == 2 && g.matches.len() == 6));
}

#[test]
fn standings_score_wins_and_draws() {
    let p = field(4);
    let mut group = Group::round_robin(1, &p, 2).unwrap();
    set_result(&mut group, p[0], p[1], Some(false)); // p1 beats p0
    set_result(&mut group, p[0], p[2], None);
    set_result(&mut group, p[0], p[3], Some(true));
    set_result(&mut group, p[1], p[2], Some(true));
    set_result(&mut group, p[1], p[3], None);
    set_result(&mut group, p[2], p[3], Some(true));

    let table = group.standings();
    let order: Vec<_> = table.iter().map(|s| s.participant).collect();
    // p0 and p2 tie on score and wins; p0 was seeded first.
    assert_eq!(order, vec![p[1], p[0], p[2], p[3]]);

    let scores: Vec<_> = table.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![2.5, 1.5, 1.5, 0.5]);
    assert!(table.iter().all(|s| s.played == 3));
    assert_eq!((table[0].wins, table[0].draws, table[0].losses), (2, 1, 0));
}

#[test]
fn ties_on_score_and_wins_fall_back_to_seeding() {
    let p = field(4);
    let mut group = Group::round_robin(1, &p, 2).unwrap();
    for m in group.matches.iter_mut() {
        m.record_result(Outcome::Stalemate).unwrap();
    }
    let order: Vec<_> = group.standings().iter().map(|s| s.participant).collect();
    assert_eq!(order, p);

    let outcome = group.winners().unwrap();
    assert_eq!(outcome.advancing, vec![p[0], p[1]]);
    assert_eq!(outcome.eliminated, vec![p[2], p[3]]);
}

#[test]
fn standings_count_only_played_matches() {
    let p = field(4);
    let mut group = Group::round_robin(1, &p, 2).unwrap();
    set_result(&mut group, p[2], p[3], Some(false));
    let table = group.standings();
    assert_eq!(table[0].participant, p[3]);
    assert_eq!(table[0].played, 1);
    assert_eq!(table.iter().map(|s| s.played).sum::<u32>(), 2);
    assert_eq!(group.winners(), None);
}

#[test]
fn interleave_keeps_group_mates_apart() {
    let groups: Vec<Vec<Uuid>> = (0..4).map(|_| field(2)).collect();
    let order = seeded_interleave(&groups).unwrap();
    assert_eq!(
        order,
        vec![
            groups[0][0],
            groups[1][1],
            groups[2][0],
            groups[3][1],
            groups[0][1],
            groups[1][0],
            groups[2][1],
            groups[3][0],
        ]
    );
}

#[test]
fn interleave_with_four_winners_per_group() {
    let groups: Vec<Vec<Uuid>> = (0..8).map(|_| field(4)).collect();
    let order = seeded_interleave(&groups).unwrap();
    assert_eq!(order.len(), 32);
    for (pos, id) in order.iter().enumerate() {
        let (slot, j) = (pos / 8, pos % 8);
        assert_eq!(*id, groups[j][(slot + j) % 4]);
    }
    // Adjacent entries always come from different groups.
    let group_of: HashMap<Uuid, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(j, g)| g.iter().map(move |&p| (p, j)))
        .collect();
    assert!(order.windows(2).all(|w| group_of[&w[0]] != group_of[&w[1]]));
}

#[test]
fn interleave_rejects_uneven_groups() {
    let groups = vec![field(2), field(3)];
    assert!(matches!(
        seeded_interleave(&groups),
        Err(TournamentError::StructuralInvariant(_))
    ));
}

#[test]
fn stage_winners_wait_for_every_group() {
    let mut stage = GroupStage::build(1, &field(32), &StageRules::default()).unwrap();
    for group in stage.groups.iter_mut().take(7) {
        for m in group.matches.iter_mut() {
            m.record_result(Outcome::SideAVictory).unwrap();
        }
    }
    assert_eq!(stage.winners().unwrap(), None);
    for m in stage.groups[7].matches.iter_mut() {
        m.record_result(Outcome::SideAVictory).unwrap();
    }
    let outcome = stage.winners().unwrap().unwrap();
    assert_eq!(outcome.advancing.len(), 16);
    assert_eq!(outcome.eliminated.len(), 16);
}
