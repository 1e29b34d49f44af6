//! The `DispatchSim` struct and its run loop.

use ed_core::{CallId, SimTime, TriageColour};
use ed_kernel::{Kernel, Resumed, RunEnd};
use ed_model::{DispatchWorld, Snapshot, spawn_call};
use log::{info, warn};

use crate::{RunOutcome, RunSummary, SimObserver, SimResult, StopHandle};

/// The main simulation runner.
///
/// Owns the kernel (and through it the [`DispatchWorld`] and every process).
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct DispatchSim {
    kernel:        Kernel<DispatchWorld>,
    stop:          StopHandle,
    /// Time of the next snapshot to report.
    next_snapshot: SimTime,
}

impl DispatchSim {
    pub(crate) fn new(kernel: Kernel<DispatchWorld>, stop: StopHandle, first_snapshot: SimTime) -> Self {
        Self { kernel, stop, next_snapshot: first_snapshot }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.kernel.now()
    }

    pub fn world(&self) -> &DispatchWorld {
        self.kernel.world()
    }

    pub fn kernel(&self) -> &Kernel<DispatchWorld> {
        &self.kernel
    }

    /// A handle that stops this simulation when raised.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current queue lengths, pool occupancy and counters.
    pub fn snapshot(&self) -> Snapshot {
        self.kernel.world().snapshot(self.now())
    }

    /// Summary of the run so far, as if it ended now with `outcome`.
    pub fn summary(&self, outcome: RunOutcome) -> RunSummary {
        RunSummary::collect(self.kernel.world(), outcome, self.now())
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Add a call that is already triaged as `colour`.  It is routed at the
    /// current time, after everything already due now.
    pub fn inject_call(&mut self, colour: TriageColour, rural_remote: bool) -> CallId {
        self.kernel
            .with_ctx(|ctx| spawn_call(ctx, Some(colour), rural_remote))
    }

    /// Run to `config.horizon`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let horizon = SimTime::new(self.world().config.horizon);
        self.run_until(horizon, observer)
    }

    /// Run until `until`, a stop request, or until nothing is scheduled.
    ///
    /// Wake-ups at or after `until` are left pending, so a later call can
    /// carry on from where this one stopped.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<RunSummary> {
        info!("running from {} to {until}", self.now());
        let outcome = loop {
            if self.stop.is_stop_requested() {
                warn!("stop requested at {}", self.now());
                break RunOutcome::Stopped;
            }
            self.report_snapshots(until, observer);
            match self.kernel.step(until)? {
                Some(resumed) => observer.on_resume(resumed.at, resumed.name),
                None => {
                    break match self.kernel.finish_run(until) {
                        RunEnd::Horizon   => RunOutcome::Horizon,
                        RunEnd::Exhausted => RunOutcome::Exhausted,
                    };
                }
            }
        };

        let summary = self.summary(outcome);
        info!(
            "run ended ({outcome}) at {}: {} calls, {} dispatched, {} closed, {} cancelled, {} open",
            summary.end_time,
            summary.counters.calls_created,
            summary.counters.dispatched,
            summary.counters.closed_by_clinician,
            summary.counters.cancelled_by_reassessment,
            summary.open_calls,
        );
        observer.on_sim_end(&summary);
        Ok(summary)
    }

    /// Resume exactly one process, never at or past the horizon.
    pub fn step(&mut self) -> SimResult<Option<Resumed>> {
        let horizon = SimTime::new(self.world().config.horizon);
        Ok(self.kernel.step(horizon)?)
    }

    /// Report every snapshot instant up to and including the next wake-up
    /// (and strictly before `until`).  Nothing changes between wake-ups, so
    /// the current world is the state on entry to each of those instants; a
    /// snapshot that coincides with a wake-up is taken before it runs.
    fn report_snapshots<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) {
        let interval = self.world().config.snapshot_interval;
        if interval <= 0.0 {
            return;
        }
        let Some(next_due) = self.kernel.scheduler().next_due() else {
            return;
        };
        while self.next_snapshot <= next_due && self.next_snapshot < until {
            let snapshot = self.kernel.world().snapshot(self.next_snapshot);
            observer.on_snapshot(&snapshot);
            self.next_snapshot = self.next_snapshot.after(interval);
        }
    }
}
