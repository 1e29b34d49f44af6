//! End-of-run summary.

use std::fmt;

use ed_core::{SimTime, TriageColour};
use ed_model::{Counters, DispatchWorld, Outcome, Snapshot};

/// Why a run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reached the requested end time.
    Horizon,
    /// Nothing left to schedule before the end time.
    Exhausted,
    /// A [`StopHandle`][crate::StopHandle] was raised.
    Stopped,
}

impl RunOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RunOutcome::Horizon   => "horizon",
            RunOutcome::Exhausted => "exhausted",
            RunOutcome::Stopped   => "stopped",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time from creation to resolution for calls with one outcome.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolutionStats {
    pub outcome: Outcome,
    pub count:   usize,
    /// `None` when no call had this outcome.
    pub mean:    Option<f64>,
}

/// Count, mean and maximum of one kind of queue wait.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WaitStats {
    pub count: usize,
    /// `None` when nothing has finished waiting.
    pub mean:  Option<f64>,
    pub max:   Option<f64>,
}

impl WaitStats {
    fn from_samples(samples: impl IntoIterator<Item = f64>) -> Self {
        let mut stats = WaitStats::default();
        let mut sum = 0.0;
        for wait in samples {
            stats.count += 1;
            sum += wait;
            stats.max = Some(stats.max.map_or(wait, |m| m.max(wait)));
        }
        stats.mean = (stats.count > 0).then(|| sum / stats.count as f64);
        stats
    }
}

/// Dispatch-queue waits of calls picked up from one colour queue.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DispatchWait {
    pub colour: TriageColour,
    pub wait:   WaitStats,
}

/// Time-weighted mean number of busy workers per pool.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PoolOccupancy {
    pub call_takers: f64,
    pub stcs:        f64,
    pub ambulances:  f64,
    pub reassessors: f64,
}

/// Final state of a run, handed to `on_sim_end` and returned by `run`.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub outcome:    RunOutcome,
    pub end_time:   SimTime,
    pub counters:   Counters,
    /// Calls created but not yet resolved.
    pub open_calls: usize,
    /// One entry per [`Outcome`], in `Outcome::ALL` order.
    pub resolution: Vec<ResolutionStats>,
    /// One entry per dispatch colour, in priority order.  A call counts
    /// under the colour it held when an ambulance took it.
    pub dispatch_wait: Vec<DispatchWait>,
    /// Wait in the teal queue for calls a clinician took.
    pub teal_wait:  WaitStats,
    /// Averaged over `[0, end_time]`.
    pub mean_busy:  PoolOccupancy,
    pub final_snapshot: Snapshot,
}

impl RunSummary {
    pub fn collect(world: &DispatchWorld, outcome: RunOutcome, end_time: SimTime) -> Self {
        let resolution = Outcome::ALL
            .into_iter()
            .map(|o| {
                let times: Vec<f64> = world
                    .calls
                    .iter()
                    .filter(|c| c.outcome() == Some(o))
                    .filter_map(|c| c.time_to_resolution())
                    .collect();
                let mean = (!times.is_empty()).then(|| times.iter().sum::<f64>() / times.len() as f64);
                ResolutionStats { outcome: o, count: times.len(), mean }
            })
            .collect();
        let dispatch_wait = TriageColour::DISPATCH_PRIORITY
            .into_iter()
            .map(|colour| DispatchWait {
                colour,
                wait: WaitStats::from_samples(
                    world
                        .calls
                        .iter()
                        .filter(|c| c.colour == Some(colour))
                        .filter_map(|c| c.dispatch_wait()),
                ),
            })
            .collect();
        let teal_wait = WaitStats::from_samples(world.calls.iter().filter_map(|c| c.teal_wait()));
        let pools = &world.pools;
        let mean_busy = PoolOccupancy {
            call_takers: pools.call_takers.mean_busy(end_time).unwrap_or(0.0),
            stcs:        pools.stcs.mean_busy(end_time).unwrap_or(0.0),
            ambulances:  pools.ambulances.mean_busy(end_time).unwrap_or(0.0),
            reassessors: pools.reassessors.mean_busy(end_time).unwrap_or(0.0),
        };
        let open_calls = world.calls.iter().filter(|c| !c.state.is_terminal()).count();
        Self {
            outcome,
            end_time,
            counters: world.counters,
            open_calls,
            resolution,
            dispatch_wait,
            teal_wait,
            mean_busy,
            final_snapshot: world.snapshot(end_time),
        }
    }

    pub fn stats(&self, outcome: Outcome) -> Option<&ResolutionStats> {
        self.resolution.iter().find(|s| s.outcome == outcome)
    }

    /// Dispatch-queue waits for `colour`; `None` for teal.
    pub fn dispatch_wait(&self, colour: TriageColour) -> Option<&WaitStats> {
        self.dispatch_wait.iter().find(|d| d.colour == colour).map(|d| &d.wait)
    }
}

fn write_wait(f: &mut fmt::Formatter<'_>, label: &str, w: &WaitStats) -> fmt::Result {
    match (w.mean, w.max) {
        (Some(mean), Some(max)) => {
            writeln!(f, "  {label:<24} {mean:>8.2} {max:>8.2} {:>6}", w.count)
        }
        _ => writeln!(f, "  {label:<24} {:>8} {:>8} {:>6}", "-", "-", w.count),
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        writeln!(f, "run ended ({}) at {}", self.outcome, self.end_time)?;
        writeln!(f, "  calls created            {:>8}", c.calls_created)?;
        writeln!(f, "  calls triaged            {:>8}", c.calls_triaged)?;
        writeln!(f, "  dispatched               {:>8}", c.dispatched)?;
        writeln!(f, "  closed by clinician      {:>8}", c.closed_by_clinician)?;
        writeln!(f, "  cancelled on review      {:>8}", c.cancelled_by_reassessment)?;
        writeln!(f, "  teal bounced             {:>8}", c.teal_bounced)?;
        writeln!(f, "  teal deferred            {:>8}", c.teal_deferred)?;
        writeln!(f, "  reassessments started    {:>8}", c.reassessments_started)?;
        writeln!(f, "  reassessments completed  {:>8}", c.reassessments_completed)?;
        writeln!(f, "  still open               {:>8}", self.open_calls)?;
        for s in &self.resolution {
            match s.mean {
                Some(m) => writeln!(f, "  mean time to {:<11} {m:>8.2}", s.outcome.as_str())?,
                None => writeln!(f, "  mean time to {:<11} {:>8}", s.outcome.as_str(), "-")?,
            }
        }
        writeln!(f, "  {:<24} {:>8} {:>8} {:>6}", "queue wait", "mean", "max", "calls")?;
        for d in &self.dispatch_wait {
            write_wait(f, d.colour.as_str(), &d.wait)?;
        }
        write_wait(f, "teal", &self.teal_wait)?;
        let b = &self.mean_busy;
        writeln!(f, "  mean busy call-takers    {:>8.2}", b.call_takers)?;
        writeln!(f, "  mean busy STCs           {:>8.2}", b.stcs)?;
        writeln!(f, "  mean busy ambulances     {:>8.2}", b.ambulances)?;
        writeln!(f, "  mean busy reassessors    {:>8.2}", b.reassessors)?;
        Ok(())
    }
}
