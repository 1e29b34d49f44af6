//! Simulation observer trait for progress reporting and data collection.

use ed_core::SimTime;
use ed_model::Snapshot;

use crate::RunSummary;

/// Callbacks invoked by [`DispatchSim::run`][crate::DispatchSim::run] at key
/// points in the run loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — backlog printer
///
/// ```rust,ignore
/// struct BacklogPrinter;
///
/// impl SimObserver for BacklogPrinter {
///     fn on_snapshot(&mut self, snap: &Snapshot) {
///         println!("{}: {} waiting for an ambulance", snap.at, snap.dispatch_backlog());
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after every resumed process.
    fn on_resume(&mut self, _now: SimTime, _process: &'static str) {}

    /// Called every `config.snapshot_interval` simulated time units.  The
    /// snapshot shows the state on entry to that instant, before any
    /// wake-up due at the same time has run.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once when the run ends, however it ends.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
