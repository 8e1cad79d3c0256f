//! History index: who has shared a court, or a side, with whom.

use crate::models::{PlayerId, Round};
use std::collections::{HashMap, HashSet};

/// Counts keyed by unordered player pair.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PairCounts {
    counts: HashMap<(PlayerId, PlayerId), u32>,
}

fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl PairCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `a` and `b` appear together; order does not matter.
    pub fn get(&self, a: PlayerId, b: PlayerId) -> u32 {
        self.counts.get(&key(a, b)).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, a: PlayerId, b: PlayerId) {
        *self.counts.entry(key(a, b)).or_insert(0) += 1;
    }

    /// Sum over every unordered pair drawn from `ids`.
    pub fn sum_within(&self, ids: &[PlayerId]) -> u32 {
        let mut total = 0;
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                total += self.get(a, b);
            }
        }
        total
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// For every court in every round, count each of its 6 player pairs once.
pub fn co_court_counts(rounds: &[Round]) -> PairCounts {
    let mut counts = PairCounts::new();
    for court in rounds.iter().flat_map(|r| r.courts.iter()) {
        for (i, &a) in court.players.iter().enumerate() {
            for &b in &court.players[i + 1..] {
                counts.increment(a, b);
            }
        }
    }
    counts
}

/// How many times each pair has been partners (same side of a court).
pub fn partner_counts(rounds: &[Round]) -> PairCounts {
    let mut counts = PairCounts::new();
    for pair in rounds.iter().flat_map(|r| r.courts.iter()).flat_map(|c| c.pairs.iter()) {
        counts.increment(pair[0], pair[1]);
    }
    counts
}

/// Players who sat out the most recent round.
pub fn last_sit_outs(rounds: &[Round]) -> HashSet<PlayerId> {
    rounds
        .last()
        .map(|r| r.sit_outs.iter().copied().collect())
        .unwrap_or_default()
}
