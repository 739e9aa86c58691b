//! `resto-model`: the restaurant model that runs on top of `resto-des`.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`entity`]    | `Channel`, `EntityKind`, `Outcome`, `Entity`                   |
//! | [`roster`]    | `Roster`: every entity of the run, indexed by `EntityId`      |
//! | [`stage`]     | `Stage`, `Transition`: the lifecycle event stream             |
//! | [`stats`]     | `StatsAccumulator`, `StatsSnapshot`, `ChannelStats`            |
//! | [`world`]     | `Restaurant<S>`: model state shared by all processes          |
//! | [`lifecycle`] | `Lifecycle`: per-entity state machine process                 |
//! | [`generator`] | `ArrivalGenerator`: Poisson arrival process per channel       |
//! | [`error`]     | `ModelError`, `ModelResult<T>`                                 |
//!
//! # Lifecycle
//!
//! ```text
//! Arrived ─┬─ dine-in ─▶ TableCheck ─┬─ no table ─▶ Balked
//!          │                         └─ seated ──┐
//!          └─ takeout ───────────────────────────┴▶ Ordering ─▶ QueuedKitchen ─▶ Cooking
//!
//! Cooking ─┬─ dine-in ─▶ ServiceWait ─▶ InService ─▶ Departed
//!          └─ takeout ─────────────────────────────▶ Departed
//! ```
//!
//! The table check is admission control: it happens before any other pool
//! is touched, so a party that balks never occupies kitchen capacity.

pub mod entity;
pub mod error;
pub mod generator;
pub mod lifecycle;
pub mod roster;
pub mod stage;
pub mod stats;
pub mod world;


pub use entity::{Channel, Entity, EntityKind, Outcome};
pub use error::{ModelError, ModelResult};
pub use generator::ArrivalGenerator;
pub use lifecycle::Lifecycle;
pub use roster::Roster;
pub use stage::{Stage, Transition};
pub use stats::{ChannelStats, StatsAccumulator, StatsSnapshot};
pub use world::{Layout, Restaurant, Timing};
