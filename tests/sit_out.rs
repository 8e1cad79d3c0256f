//! Integration tests for sit-out selection: fairness cost and tie-breaking.

mod common;

use common::{player, refs};
use court_rotation_web::logic::{FairnessContext, FairnessCost};
use court_rotation_web::{
    select_sit_outs, Gender, PairCounts, PairingMode, Player, Settings, SkillMode,
    UniquenessImportance,
};
use std::collections::HashSet;

fn with_counts(mut p: Player, games: u32, sits: u32) -> Player {
    p.games_played = games;
    p.sits = sits;
    p
}

fn mixed_five() -> Vec<Player> {
    vec![
        player(1, "Ann", Gender::Female, 5),
        player(2, "Beth", Gender::Female, 5),
        player(3, "Carl", Gender::Male, 5),
        player(4, "Dan", Gender::Male, 5),
        player(5, "Ed", Gender::Male, 5),
    ]
}

#[test]
fn zero_sitters_returns_empty_selection() {
    let players = mixed_five();
    let sel = select_sit_outs(&refs(&players), 0, &Settings::default(), &PairCounts::new(), &HashSet::new());
    assert!(sel.sitters.is_empty());
    assert!(sel.rationale.is_empty());
}

#[test]
fn sitting_whole_pool_returns_everyone() {
    let players = mixed_five();
    let sel = select_sit_outs(&refs(&players), 7, &Settings::default(), &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![1, 2, 3, 4, 5]);
}

#[test]
fn happy_to_sit_player_is_chosen_from_nine() {
    let mut players: Vec<Player> = (1..=9)
        .map(|i| player(i, &format!("P{i}"), Gender::Other, 5))
        .collect();
    players[6].happy_to_sit = true;
    let sel = select_sit_outs(&refs(&players), 1, &Settings::default(), &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![7]);
    assert!(sel.rationale[&7].contains("happy to sit"));
}

#[test]
fn equal_costs_fall_back_to_alphabetical_order() {
    let players = vec![
        player(1, "Zoe", Gender::Other, 5),
        player(2, "Mia", Gender::Other, 5),
        player(3, "Abe", Gender::Other, 5),
        player(4, "Kim", Gender::Other, 5),
        player(5, "Lou", Gender::Other, 5),
        player(6, "Bo", Gender::Other, 5),
    ];
    let sel = select_sit_outs(&refs(&players), 2, &Settings::default(), &PairCounts::new(), &HashSet::new());
    let mut sitters = sel.sitters.clone();
    sitters.sort_unstable();
    assert_eq!(sitters, vec![3, 6]);
}

#[test]
fn back_to_back_penalty_protects_last_rounds_sitter() {
    // Same counters for everyone, so only last round's sit separates Alice.
    let players = vec![
        with_counts(player(1, "Alice", Gender::Other, 5), 2, 1),
        with_counts(player(2, "Bob", Gender::Other, 5), 2, 1),
        with_counts(player(3, "Cal", Gender::Other, 5), 2, 1),
        with_counts(player(4, "Dee", Gender::Other, 5), 2, 1),
        with_counts(player(5, "Eve", Gender::Other, 5), 2, 1),
    ];
    let pool = refs(&players);
    let sat_last: HashSet<u32> = [1].into_iter().collect();

    let ctx = FairnessContext::new(&pool, &sat_last);
    let alice = FairnessCost::of(pool[0], &ctx);
    let bob = FairnessCost::of(pool[1], &ctx);
    assert_eq!(alice.back_to_back, 8.0);
    assert_eq!(alice.total(), bob.total() + 8.0);

    let sel = select_sit_outs(&pool, 1, &Settings::default(), &PairCounts::new(), &sat_last);
    assert_eq!(sel.sitters, vec![2]);
}

#[test]
fn repeat_sitter_still_sits_when_clearly_cheapest() {
    // Alice has sat far less than her share; +8 does not outweigh that.
    let players = vec![
        with_counts(player(1, "Alice", Gender::Other, 5), 4, 0),
        with_counts(player(2, "Bob", Gender::Other, 5), 2, 2),
        with_counts(player(3, "Cal", Gender::Other, 5), 2, 2),
        with_counts(player(4, "Dee", Gender::Other, 5), 2, 2),
        with_counts(player(5, "Eve", Gender::Other, 5), 2, 2),
    ];
    let sat_last: HashSet<u32> = [1].into_iter().collect();
    let sel = select_sit_outs(&refs(&players), 1, &Settings::default(), &PairCounts::new(), &sat_last);
    assert_eq!(sel.sitters, vec![1]);
    assert!(sel.rationale[&1].contains("also sat last round"));
}

#[test]
fn bootstrap_cost_uses_raw_sits_before_any_game() {
    let players = vec![
        with_counts(player(1, "A", Gender::Other, 5), 0, 2),
        with_counts(player(2, "B", Gender::Other, 5), 0, 0),
    ];
    let pool = refs(&players);
    let none = HashSet::new();
    let ctx = FairnessContext::new(&pool, &none);
    assert_eq!(ctx.avg_sit_rate, 0.0);
    assert_eq!(FairnessCost::of(pool[0], &ctx).total(), 20.0);
    assert_eq!(FairnessCost::of(pool[1], &ctx).total(), 0.0);
}

#[test]
fn expected_share_cost_uses_pool_sit_rate() {
    // 2 sits over 8 games: rate 0.25.
    let players = vec![
        with_counts(player(1, "A", Gender::Other, 5), 4, 2),
        with_counts(player(2, "B", Gender::Other, 5), 4, 0),
    ];
    let pool = refs(&players);
    let none = HashSet::new();
    let ctx = FairnessContext::new(&pool, &none);
    assert_eq!(ctx.avg_sit_rate, 0.25);
    let a = FairnessCost::of(pool[0], &ctx);
    assert_eq!(a.expected_sits, Some(1.0));
    assert_eq!(a.total(), 20.0);
    assert_eq!(FairnessCost::of(pool[1], &ctx).total(), -20.0);
}

#[test]
fn players_behind_on_games_are_protected() {
    let players = vec![
        with_counts(player(1, "A", Gender::Other, 5), 3, 0),
        with_counts(player(2, "B", Gender::Other, 5), 1, 0),
        with_counts(player(3, "C", Gender::Other, 5), 2, 0),
    ];
    let pool = refs(&players);
    let none = HashSet::new();
    let ctx = FairnessContext::new(&pool, &none);
    assert_eq!(FairnessCost::of(pool[1], &ctx).game_lag, 6.0);
    assert_eq!(FairnessCost::of(pool[2], &ctx).game_lag, 0.0);
}

#[test]
fn mixed_mode_sits_a_player_who_leaves_two_and_two() {
    let players = mixed_five();
    let settings = Settings {
        pairing_mode: PairingMode::Mixed,
        ..Settings::default()
    };
    let sel = select_sit_outs(&refs(&players), 1, &settings, &PairCounts::new(), &HashSet::new());
    // Ann sorts first, but sitting her leaves one woman for the court.
    assert_eq!(sel.sitters, vec![3]);
}

#[test]
fn high_uniqueness_outranks_pairing() {
    let players = mixed_five();
    let mut co_court = PairCounts::new();
    for other in 2..=5 {
        for _ in 0..3 {
            co_court.increment(1, other);
        }
    }
    let mut settings = Settings {
        pairing_mode: PairingMode::Mixed,
        uniqueness_importance: UniquenessImportance::High,
        ..Settings::default()
    };
    let sel = select_sit_outs(&refs(&players), 1, &settings, &co_court, &HashSet::new());
    assert_eq!(sel.sitters, vec![1]);

    settings.uniqueness_importance = UniquenessImportance::Medium;
    let sel = select_sit_outs(&refs(&players), 1, &settings, &co_court, &HashSet::new());
    assert_eq!(sel.sitters, vec![3]);
}

#[test]
fn same_gender_mode_sits_the_odd_one_out() {
    let players = vec![
        player(1, "Abe", Gender::Male, 5),
        player(2, "Bob", Gender::Male, 5),
        player(3, "Cal", Gender::Male, 5),
        player(4, "Dan", Gender::Male, 5),
        player(5, "Zoe", Gender::Female, 5),
    ];
    let mut settings = Settings {
        pairing_mode: PairingMode::SameGender,
        ..Settings::default()
    };
    let sel = select_sit_outs(&refs(&players), 1, &settings, &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![5]);

    settings.pairing_mode = PairingMode::Random;
    let sel = select_sit_outs(&refs(&players), 1, &settings, &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![1]);
}

#[test]
fn same_skill_mode_sits_the_skill_outlier() {
    let players = vec![
        player(1, "Abe", Gender::Other, 5),
        player(2, "Bob", Gender::Other, 5),
        player(3, "Cal", Gender::Other, 5),
        player(4, "Dan", Gender::Other, 5),
        player(5, "Zed", Gender::Other, 9),
    ];
    let mut settings = Settings {
        skill_mode: SkillMode::SameSkill,
        ..Settings::default()
    };
    let sel = select_sit_outs(&refs(&players), 1, &settings, &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![5]);

    settings.skill_mode = SkillMode::Balanced;
    let sel = select_sit_outs(&refs(&players), 1, &settings, &PairCounts::new(), &HashSet::new());
    assert_eq!(sel.sitters, vec![1]);
}

#[test]
fn low_uniqueness_ranks_skill_above_repeats() {
    // Sitting Zed evens skill; sitting Cal clears every repeat pairing.
    let players = vec![
        player(1, "Abe", Gender::Other, 5),
        player(2, "Bob", Gender::Other, 5),
        player(3, "Cal", Gender::Other, 5),
        player(4, "Dan", Gender::Other, 5),
        player(5, "Zed", Gender::Other, 9),
    ];
    let mut co_court = PairCounts::new();
    for other in [1, 2, 4] {
        for _ in 0..3 {
            co_court.increment(3, other);
        }
    }
    let mut settings = Settings {
        skill_mode: SkillMode::SameSkill,
        uniqueness_importance: UniquenessImportance::Low,
        ..Settings::default()
    };
    let sel = select_sit_outs(&refs(&players), 1, &settings, &co_court, &HashSet::new());
    assert_eq!(sel.sitters, vec![5]);

    settings.uniqueness_importance = UniquenessImportance::Medium;
    let sel = select_sit_outs(&refs(&players), 1, &settings, &co_court, &HashSet::new());
    assert_eq!(sel.sitters, vec![3]);
}
