//! Independent replications of one configuration over many seeds.

use resto_model::StatsSnapshot;

use crate::{NoopObserver, RestaurantConfig, SimBuilder, SimResult};

/// One finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct Replication {
    pub seed:  u64,
    pub stats: StatsSnapshot,
}

/// Means across replications.  All zero when there were no runs.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ReplicationSummary {
    pub runs:              usize,
    pub mean_average_wait: f64,
    pub mean_max_wait:     f64,
    pub mean_served:       f64,
    pub mean_balked:       f64,
    pub mean_balk_rate:    f64,
}

impl ReplicationSummary {
    pub fn from_runs(runs: &[Replication]) -> Self {
        if runs.is_empty() {
            return Self::default();
        }
        let n = runs.len() as f64;
        let mean = |f: fn(&StatsSnapshot) -> f64| runs.iter().map(|r| f(&r.stats)).sum::<f64>() / n;
        Self {
            runs:              runs.len(),
            mean_average_wait: mean(|s| s.average_wait),
            mean_max_wait:     mean(|s| s.max_wait),
            mean_served:       mean(|s| s.served_count as f64),
            mean_balked:       mean(|s| s.balked_count as f64),
            mean_balk_rate:    mean(|s| s.balk_rate),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Replications {
    /// In the order of the `seeds` argument.
    pub runs:    Vec<Replication>,
    pub summary: ReplicationSummary,
}

/// Run `config` once per seed, each run fully isolated.
///
/// With the `parallel` feature the runs are spread over Rayon's thread pool;
/// results are identical to the sequential path and keep seed order.
pub fn replicate(config: &RestaurantConfig, seeds: &[u64]) -> SimResult<Replications> {
    config.validate()?;

    #[cfg(not(feature = "parallel"))]
    let runs = seeds
        .iter()
        .map(|&seed| run_one(config, seed))
        .collect::<SimResult<Vec<_>>>()?;

    #[cfg(feature = "parallel")]
    let runs = {
        use rayon::prelude::*;

        seeds
            .par_iter()
            .map(|&seed| run_one(config, seed))
            .collect::<SimResult<Vec<_>>>()?
    };

    let summary = ReplicationSummary::from_runs(&runs);
    Ok(Replications { runs, summary })
}

fn run_one(config: &RestaurantConfig, seed: u64) -> SimResult<Replication> {
    let stats = SimBuilder::new(config.with_seed(seed)).build()?.run(&mut NoopObserver)?;
    Ok(Replication { seed, stats })
}
