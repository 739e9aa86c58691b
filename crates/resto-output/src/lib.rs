//! `resto-output`: simulation output writers for the restaurant simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                       |
//! |-----------|---------|-----------------------------------------------------|
//! | *(none)*  | CSV     | `transitions.csv`, `summary.csv`, `pools.csv`       |
//! | `sqlite`  | SQLite  | `output.db`                                         |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `resto_sim::SimObserver`.  The
//! simulation itself never touches the filesystem.
//!
//! # Usage
//!
//! ```rust,ignore
//! use resto_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, config.random_seed);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{PoolRow, SummaryRow, TransitionRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
