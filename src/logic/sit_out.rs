//! Sit-out selection: who rests this round.
//!
//! Every subset of the required size is scored by the summed fairness cost of
//! its members, then by how well the remaining players can form courts
//! (pairing, skill, uniqueness in priority order), then alphabetically.

use crate::logic::combinations::Combinations;
use crate::logic::history::PairCounts;
use crate::logic::metrics::{pool_metrics, priority_order};
use crate::models::{Player, PlayerId, Settings};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Weight on the gap between actual and expected sits once rates exist.
const RATE_WEIGHT: f64 = 20.0;
/// Weight on raw sits before anyone has played.
const BOOTSTRAP_WEIGHT: f64 = 10.0;
const BACK_TO_BACK_PENALTY: f64 = 8.0;
const HAPPY_TO_SIT_BONUS: f64 = 5.0;
/// Players this many games behind the leader are protected from sitting.
const GAME_LAG_THRESHOLD: u32 = 2;
const GAME_LAG_WEIGHT: f64 = 3.0;

/// Pool-wide inputs to the per-player fairness cost.
#[derive(Clone, Debug)]
pub struct FairnessContext<'a> {
    /// Total sits over total games across the pool, 0 before any game.
    pub avg_sit_rate: f64,
    pub max_games: u32,
    pub sat_last_round: &'a HashSet<PlayerId>,
}

impl<'a> FairnessContext<'a> {
    pub fn new(pool: &[&Player], sat_last_round: &'a HashSet<PlayerId>) -> Self {
        let total_sits: u32 = pool.iter().map(|p| p.sits).sum();
        let total_games: u32 = pool.iter().map(|p| p.games_played).sum();
        let avg_sit_rate = if total_games > 0 {
            total_sits as f64 / total_games as f64
        } else {
            0.0
        };
        Self {
            avg_sit_rate,
            max_games: pool.iter().map(|p| p.games_played).max().unwrap_or(0),
            sat_last_round,
        }
    }
}

/// Fairness cost split into its parts. Lower total = more deserving of a rest.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FairnessCost {
    /// Sits share (or raw sits during bootstrap).
    pub base: f64,
    /// Set once the player has games and the pool has a sit rate.
    pub expected_sits: Option<f64>,
    pub back_to_back: f64,
    pub happy_to_sit: f64,
    pub game_lag: f64,
}

impl FairnessCost {
    pub fn of(player: &Player, ctx: &FairnessContext<'_>) -> Self {
        let mut cost = Self::default();
        if player.games_played > 0 && ctx.avg_sit_rate > 0.0 {
            let expected = player.games_played as f64 * ctx.avg_sit_rate;
            cost.expected_sits = Some(expected);
            cost.base = (player.sits as f64 - expected) * RATE_WEIGHT;
        } else {
            cost.base = player.sits as f64 * BOOTSTRAP_WEIGHT;
        }
        if ctx.sat_last_round.contains(&player.id) {
            cost.back_to_back = BACK_TO_BACK_PENALTY;
        }
        if player.happy_to_sit {
            cost.happy_to_sit = -HAPPY_TO_SIT_BONUS;
        }
        let lag = ctx.max_games.saturating_sub(player.games_played);
        if lag >= GAME_LAG_THRESHOLD {
            cost.game_lag = GAME_LAG_WEIGHT * lag as f64;
        }
        cost
    }

    pub fn total(&self) -> f64 {
        self.base + self.back_to_back + self.happy_to_sit + self.game_lag
    }

    /// Short human-readable reason, for the "why" tooltip.
    pub fn describe(&self, player: &Player) -> String {
        let mut parts = match self.expected_sits {
            Some(expected) => vec![format!(
                "sat {} time(s), {:.1} expected after {} game(s)",
                player.sits, expected, player.games_played
            )],
            None => vec![format!("sat {} time(s)", player.sits)],
        };
        if self.back_to_back > 0.0 {
            parts.push("also sat last round".to_string());
        }
        if self.happy_to_sit < 0.0 {
            parts.push("happy to sit".to_string());
        }
        if self.game_lag > 0.0 {
            parts.push("behind on games".to_string());
        }
        format!("{} (cost {:.1})", parts.join(", "), self.total())
    }
}

/// Chosen sitters and the reason shown for each.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SitOutSelection {
    pub sitters: Vec<PlayerId>,
    pub rationale: BTreeMap<PlayerId, String>,
}

/// Score of one candidate sit-out subset.
struct Candidate<'a> {
    fairness: f64,
    metrics: [f64; 3],
    names: Vec<&'a str>,
    ids: Vec<PlayerId>,
}

impl Candidate<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        self.fairness
            .total_cmp(&other.fairness)
            .then_with(|| {
                self.metrics
                    .iter()
                    .zip(&other.metrics)
                    .map(|(a, b)| a.total_cmp(b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| self.names.cmp(&other.names))
            .then_with(|| self.ids.cmp(&other.ids))
    }
}

/// Pick `num_sit` players from `pool` to sit out.
///
/// `num_sit == 0` sits nobody; `num_sit >= pool.len()` sits everyone.
pub fn select_sit_outs(
    pool: &[&Player],
    num_sit: usize,
    settings: &Settings,
    co_court: &PairCounts,
    sat_last_round: &HashSet<PlayerId>,
) -> SitOutSelection {
    let ctx = FairnessContext::new(pool, sat_last_round);
    let costs: Vec<FairnessCost> = pool.iter().map(|p| FairnessCost::of(p, &ctx)).collect();
    let explain = |indices: &[usize]| SitOutSelection {
        sitters: indices.iter().map(|&i| pool[i].id).collect(),
        rationale: indices
            .iter()
            .map(|&i| (pool[i].id, costs[i].describe(pool[i])))
            .collect(),
    };

    if num_sit == 0 {
        return SitOutSelection::default();
    }
    if num_sit >= pool.len() {
        return explain(&(0..pool.len()).collect::<Vec<_>>());
    }

    let order = priority_order(settings.uniqueness_importance);
    let mut best: Option<(Candidate<'_>, Vec<usize>)> = None;
    for combo in Combinations::new(pool.len(), num_sit) {
        let playing: Vec<&Player> = (0..pool.len())
            .filter(|i| !combo.contains(i))
            .map(|i| pool[i])
            .collect();
        let mut names: Vec<&str> = combo.iter().map(|&i| pool[i].name.as_str()).collect();
        names.sort_unstable();
        let mut ids: Vec<PlayerId> = combo.iter().map(|&i| pool[i].id).collect();
        ids.sort_unstable();
        let candidate = Candidate {
            fairness: combo.iter().map(|&i| costs[i].total()).sum(),
            metrics: pool_metrics(&playing, settings, co_court).ordered(order),
            names,
            ids,
        };
        let better = match &best {
            Some((current, _)) => candidate.compare(current).is_lt(),
            None => true,
        };
        if better {
            best = Some((candidate, combo));
        }
    }

    match best {
        Some((_, combo)) => explain(&combo),
        None => {
            let mut ranked: Vec<usize> = (0..pool.len()).collect();
            ranked.sort_by(|&a, &b| {
                costs[a]
                    .total()
                    .total_cmp(&costs[b].total())
                    .then_with(|| pool[a].name.cmp(&pool[b].name))
            });
            ranked.truncate(num_sit);
            explain(&ranked)
        }
    }
}
