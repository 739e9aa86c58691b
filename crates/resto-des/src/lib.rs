//! `resto-des`: the discrete-event simulation core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`queue`]     | `EventQueue<T>`, `Event<T>`, `EventHandle`                  |
//! | [`pool`]      | `ResourcePool`, `RequestOutcome`, `PoolReport`              |
//! | [`process`]   | `Process<W>` trait, `Yield`, `Context`, `ProcessState`      |
//! | [`scheduler`] | `Scheduler<W>`: process table + event loop                 |
//! | [`error`]     | `DesError`, `DesResult<T>`                                  |
//!
//! # Execution model
//!
//! ```text
//! loop:
//!   ① pop the earliest (due_time, sequence_id) event ≤ horizon
//!   ② advance the clock to its due_time
//!   ③ resume the process it belongs to; the process runs one step and
//!      yields Timeout(d) | Acquire{pool, n} | Exit
//!   ④ apply the yield: schedule a timer, file a pool request, or tear down
//!   ⑤ apply side effects of the step in call order: waiters granted by
//!      releases are woken, spawned processes are started (both at `now`)
//! ```
//!
//! Exactly one process runs at any instant and every resumption goes through
//! the queue, so a run is a pure function of its inputs.

pub mod error;
pub mod pool;
pub mod process;
pub mod queue;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{DesError, DesResult};
pub use pool::{PoolReport, RequestOutcome, ResourcePool, Waiter};
pub use process::{Context, Process, ProcessState, Yield};
pub use queue::{Event, EventHandle, EventQueue};
pub use scheduler::Scheduler;

#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "fx-hash")]
pub(crate) type Set<K> = rustc_hash::FxHashSet<K>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Set<K> = std::collections::HashSet<K>;
