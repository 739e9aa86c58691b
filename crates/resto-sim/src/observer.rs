//! Simulation observer trait for progress reporting and data collection.

use resto_core::SimTime;
use resto_model::{StatsSnapshot, Transition};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::step`][crate::Sim::step].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: balk counter
///
/// ```rust,ignore
/// struct BalkCounter(u64);
///
/// impl SimObserver for BalkCounter {
///     fn on_transition(&mut self, t: &Transition) {
///         if t.stage == Stage::Balked {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called for every lifecycle transition, in emission order.
    fn on_transition(&mut self, _transition: &Transition) {}

    /// Called once when the horizon is reached and the generators have been
    /// stopped.  In-flight entities may still be draining.
    fn on_horizon(&mut self, _at: SimTime) {}

    /// Called at the end of [`Sim::run`][crate::Sim::run] with the final
    /// statistics.
    fn on_sim_end(&mut self, _stats: &StatsSnapshot) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Keeps every transition in memory.
#[derive(Default, Debug)]
pub struct TransitionRecorder {
    pub transitions: Vec<Transition>,
}

impl TransitionRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimObserver for TransitionRecorder {
    fn on_transition(&mut self, transition: &Transition) {
        self.transitions.push(*transition);
    }
}
