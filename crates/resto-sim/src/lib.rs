//! `resto-sim`: configuration and run orchestration for the restaurant
//! simulator.
//!
//! # Run loop
//!
//! ```text
//! build:
//!   validate RestaurantConfig
//!   pools: kitchen(num_cooks), servers(num_servers), tables(num_tables)
//!   spawn ArrivalGenerator(dine-in), ArrivalGenerator(takeout)
//!
//! run:
//!   ① fire events with due time ≤ simulation_duration
//!   ② horizon: terminate both generators (their pending timers are cancelled)
//!   ③ drain_after_horizon → fire the rest until the queue is empty
//!   ④ snapshot statistics + pool reports
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | [`replicate`] runs seeds on Rayon's thread pool.           |
//! | `serde`    | `RestaurantConfig` derives `Serialize`/`Deserialize`.      |
//! | `fx-hash`  | FxHash for the scheduler's process table.                  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use resto_sim::{NoopObserver, RestaurantConfig, SimBuilder};
//!
//! let mut sim = SimBuilder::new(RestaurantConfig::default()).build()?;
//! let stats = sim.run(&mut NoopObserver)?;
//! println!("served {} balked {}", stats.served_count, stats.balked_count);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod replicate;
pub mod sim;


pub use builder::SimBuilder;
pub use config::RestaurantConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TransitionRecorder};
pub use replicate::{Replication, ReplicationSummary, Replications, replicate};
pub use sim::{Sim, Transitions};
