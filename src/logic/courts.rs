//! Court grouping: partition the play pool into quartets, one court at a time.

use crate::logic::combinations::Combinations;
use crate::logic::history::PairCounts;
use crate::logic::metrics::{priority_order, quartet_metrics, QuartetMetrics};
use crate::models::{Player, PlayerId, Settings};

/// A quartet picked for one court, with the scores it won on.
#[derive(Clone, Debug)]
pub struct Quartet<'a> {
    pub players: [&'a Player; 4],
    pub metrics: QuartetMetrics,
}

impl Quartet<'_> {
    pub fn ids(&self) -> [PlayerId; 4] {
        self.players.map(|p| p.id)
    }
}

/// Greedily fill courts: each step takes the best 4-subset of who is left,
/// ranked by the priority-ordered metrics, then by smallest id sum, then by
/// the sorted ids.
///
/// Stops early if fewer than 4 players remain, so a pool that is not a
/// multiple of 4 leaves its remainder unassigned.
pub fn group_courts<'a>(
    players: &[&'a Player],
    settings: &Settings,
    co_court: &PairCounts,
) -> Vec<Quartet<'a>> {
    let order = priority_order(settings.uniqueness_importance);
    let num_courts = players.len() / 4;
    let mut remaining: Vec<&'a Player> = players.to_vec();
    let mut courts = Vec::with_capacity(num_courts);

    for _ in 0..num_courts {
        if remaining.len() < 4 {
            break;
        }
        let best = Combinations::new(remaining.len(), 4)
            .map(|combo| {
                let quartet = [
                    remaining[combo[0]],
                    remaining[combo[1]],
                    remaining[combo[2]],
                    remaining[combo[3]],
                ];
                let metrics = quartet_metrics(&quartet, settings, co_court);
                let mut ids = quartet.map(|p| p.id);
                ids.sort_unstable();
                let id_sum: u64 = ids.iter().map(|&id| u64::from(id)).sum();
                ((metrics.ordered(order), id_sum, ids), combo, metrics)
            })
            .min_by(|a, b| a.0.cmp(&b.0));
        let Some((_, combo, metrics)) = best else {
            break;
        };
        let quartet = Quartet {
            players: [
                remaining[combo[0]],
                remaining[combo[1]],
                remaining[combo[2]],
                remaining[combo[3]],
            ],
            metrics,
        };
        log::debug!("Court {}: {:?} ({:?})", courts.len() + 1, quartet.ids(), metrics);
        // Highest index first so earlier indices stay valid.
        for &i in combo.iter().rev() {
            remaining.remove(i);
        }
        courts.push(quartet);
    }
    courts
}
