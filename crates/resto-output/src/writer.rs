//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, PoolRow, SummaryRow, TransitionRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// When driven by [`SimOutputObserver`][crate::SimOutputObserver], errors are
/// stored and retrieved with
/// [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of lifecycle transitions.
    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()>;

    /// Write one run summary row.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Write the per-pool reports of one run.
    fn write_pools(&mut self, rows: &[PoolRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
