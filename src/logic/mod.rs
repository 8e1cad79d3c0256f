//! Round-generation engine: history, sit-outs, courts, pairs, assembly.

mod combinations;
mod courts;
mod history;
mod metrics;
mod pairs;
mod round;
mod sit_out;

pub use combinations::Combinations;
pub use courts::{group_courts, Quartet};
pub use history::{co_court_counts, last_sit_outs, partner_counts, PairCounts};
pub use metrics::{
    pool_metrics, priority_order, quartet_metrics, skill_variance, Criterion, GenderCounts,
    PoolMetrics, QuartetMetrics,
};
pub use pairs::{choose_pairs, PairSplit};
pub use round::{generate_round, RoundCapacity, SIT_SEARCH_LIMIT};
pub use sit_out::{select_sit_outs, FairnessContext, FairnessCost, SitOutSelection};
