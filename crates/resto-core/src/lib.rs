//! `resto-core`: foundational types for the restaurant simulator.
//!
//! This crate is a dependency of every other `resto-*` crate.  It has no
//! `resto-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ProcessId`, `EntityId`, `PoolId`                     |
//! | [`time`]        | `SimTime` (virtual time)                              |
//! | [`rng`]         | `Sampler` trait, `SimRng`, `FixedSampler`, `SizeRange` |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{EntityId, PoolId, ProcessId};
pub use rng::{FixedSampler, Sampler, SimRng, SizeRange};
pub use time::SimTime;
