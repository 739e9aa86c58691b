use resto_core::{PoolId, ProcessId, SimTime};
use thiserror::Error;

/// Faults raised by the simulation core.
///
/// None of these are recoverable: they mean a process or the caller broke
/// the scheduling or resource protocol, and the run is aborted.
#[derive(Debug, Error)]
pub enum DesError {
    #[error("invalid delay {0}: delays must be non-negative")]
    InvalidDelay(f64),

    #[error("event due at {due} is before the current clock {now}")]
    EventInPast { due: SimTime, now: SimTime },

    #[error("{pool}: request for {requested} units exceeds capacity {capacity}")]
    ExceedsCapacity {
        pool:      PoolId,
        requested: u32,
        capacity:  u32,
    },

    #[error("{pool}: zero-unit request or release by {process}")]
    ZeroAmount { pool: PoolId, process: ProcessId },

    #[error("{pool}: {process} released {amount} units but holds {held}")]
    OverRelease {
        pool:    PoolId,
        process: ProcessId,
        amount:  u32,
        held:    u32,
    },

    #[error("{0} does not exist")]
    UnknownPool(PoolId),

    #[error("{0} is not a live process")]
    UnknownProcess(ProcessId),

    #[error("pool limit reached ({0} pools registered)")]
    TooManyPools(usize),

    #[error("process fault: {0}")]
    Process(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type DesResult<T> = Result<T, DesError>;
