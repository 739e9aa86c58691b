//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use resto_core::SimTime;
use resto_model::{StatsSnapshot, Transition};
use resto_sim::SimObserver;

use crate::row::{PoolRow, SummaryRow, TransitionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// Transitions are handed to the writer in batches of this size.
const BATCH: usize = 1024;

/// A [`SimObserver`] that writes transitions, the run summary, and pool
/// reports to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    run:        u64,
    buffer:     Vec<TransitionRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`; `run` labels the summary and
    /// pool rows (usually the seed).
    pub fn new(writer: W, run: u64) -> Self {
        Self { writer, run, buffer: Vec::with_capacity(BATCH), last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let result = self.writer.write_transitions(&self.buffer);
        self.buffer.clear();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_transition(&mut self, transition: &Transition) {
        self.buffer.push(TransitionRow::from(transition));
        if self.buffer.len() >= BATCH {
            self.flush();
        }
    }

    fn on_horizon(&mut self, _at: SimTime) {
        self.flush();
    }

    fn on_sim_end(&mut self, stats: &StatsSnapshot) {
        self.flush();
        let result = self.writer.write_summary(&SummaryRow::new(self.run, stats));
        self.store_err(result);
        let result = self.writer.write_pools(&PoolRow::from_snapshot(self.run, stats));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
