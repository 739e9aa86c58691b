//! Plain data row types written by output backends.

use resto_des::PoolReport;
use resto_model::{StatsSnapshot, Transition};

/// One lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRow {
    pub entity_id: u64,
    pub channel:   &'static str,
    pub stage:     &'static str,
    pub time:      f64,
}

impl From<&Transition> for TransitionRow {
    fn from(t: &Transition) -> Self {
        Self {
            entity_id: t.entity.0,
            channel:   t.channel.as_str(),
            stage:     t.stage.as_str(),
            time:      t.time.as_f64(),
        }
    }
}

/// Final statistics of one run.  `run` is the seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub run:            u64,
    pub generated:      u64,
    pub served:         u64,
    pub balked:         u64,
    pub pending:        u64,
    pub average_wait:   f64,
    pub max_wait:       f64,
    pub balk_rate:      f64,
    pub dine_in_served: u64,
    pub takeout_served: u64,
}

impl SummaryRow {
    pub fn new(run: u64, stats: &StatsSnapshot) -> Self {
        Self {
            run,
            generated:      stats.generated_count,
            served:         stats.served_count,
            balked:         stats.balked_count,
            pending:        stats.pending_count,
            average_wait:   stats.average_wait,
            max_wait:       stats.max_wait,
            balk_rate:      stats.balk_rate,
            dine_in_served: stats.dine_in.served,
            takeout_served: stats.takeout.served,
        }
    }
}

/// Usage of one pool in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolRow {
    pub run:              u64,
    pub pool:             String,
    pub capacity:         u32,
    pub grants:           u64,
    pub queued_grants:    u64,
    pub mean_queue_delay: f64,
    pub max_queue_len:    u64,
    pub utilisation:      f64,
}

impl PoolRow {
    pub fn new(run: u64, report: &PoolReport) -> Self {
        Self {
            run,
            pool:             report.name.clone(),
            capacity:         report.capacity,
            grants:           report.grants,
            queued_grants:    report.queued_grants,
            mean_queue_delay: report.mean_queue_delay,
            max_queue_len:    report.max_queue_len as u64,
            utilisation:      report.utilisation,
        }
    }

    /// One row per pool in `stats`.
    pub fn from_snapshot(run: u64, stats: &StatsSnapshot) -> Vec<Self> {
        stats.pools.iter().map(|p| Self::new(run, p)).collect()
    }
}
