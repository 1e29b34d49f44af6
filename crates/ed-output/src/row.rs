//! Plain data row types written by output backends.

use ed_core::TriageColour;
use ed_model::{Outcome, Snapshot};
use ed_sim::{RunSummary, WaitStats};

/// Queue lengths, busy workers and key counters at one snapshot instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRow {
    pub time:              f64,
    pub intake:            usize,
    pub purple:            usize,
    pub red:               usize,
    pub orange:            usize,
    pub yellow:            usize,
    pub teal:              usize,
    pub reassessment:      usize,
    pub call_takers_busy:  usize,
    pub stcs_busy:         usize,
    pub ambulances_busy:   usize,
    pub reassessors_busy:  usize,
    pub calls_created:     u64,
    pub dispatched:        u64,
    pub closed:            u64,
    pub cancelled:         u64,
    pub teal_bounced:      u64,
}

impl From<&Snapshot> for SnapshotRow {
    fn from(s: &Snapshot) -> Self {
        Self {
            time:             s.at.as_f64(),
            intake:           s.intake,
            purple:           s.purple,
            red:              s.red,
            orange:           s.orange,
            yellow:           s.yellow,
            teal:             s.teal,
            reassessment:     s.reassessment,
            call_takers_busy: s.call_takers.busy,
            stcs_busy:        s.stcs.busy,
            ambulances_busy:  s.ambulances.busy,
            reassessors_busy: s.reassessors.busy,
            calls_created:    s.counters.calls_created,
            dispatched:       s.counters.dispatched,
            closed:           s.counters.closed_by_clinician,
            cancelled:        s.counters.cancelled_by_reassessment,
            teal_bounced:     s.counters.teal_bounced,
        }
    }
}

/// One-line record of how a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub outcome:                   &'static str,
    pub end_time:                  f64,
    pub calls_created:             u64,
    pub calls_triaged:             u64,
    pub dispatched:                u64,
    pub closed_by_clinician:       u64,
    pub cancelled_by_reassessment: u64,
    pub teal_bounced:              u64,
    pub teal_deferred:             u64,
    pub reassessments_started:     u64,
    pub reassessments_completed:   u64,
    pub open_calls:                usize,
    pub mean_to_dispatch:          Option<f64>,
    pub mean_to_close:             Option<f64>,
    pub mean_to_cancel:            Option<f64>,
    /// Dispatch-queue wait `(mean, max)` per colour, in priority order.
    pub dispatch_wait:             [(Option<f64>, Option<f64>); 4],
    pub teal_wait_mean:            Option<f64>,
    pub teal_wait_max:             Option<f64>,
    pub call_takers_mean_busy:     f64,
    pub stcs_mean_busy:            f64,
    pub ambulances_mean_busy:      f64,
    pub reassessors_mean_busy:     f64,
}

impl From<&RunSummary> for SummaryRow {
    fn from(s: &RunSummary) -> Self {
        let mean = |o| s.stats(o).and_then(|st| st.mean);
        let wait = |colour| {
            let w = s.dispatch_wait(colour).copied().unwrap_or_default();
            (w.mean, w.max)
        };
        let [purple, red, orange, yellow] = TriageColour::DISPATCH_PRIORITY;
        let teal: &WaitStats = &s.teal_wait;
        let c = &s.counters;
        Self {
            outcome:                   s.outcome.as_str(),
            end_time:                  s.end_time.as_f64(),
            calls_created:             c.calls_created,
            calls_triaged:             c.calls_triaged,
            dispatched:                c.dispatched,
            closed_by_clinician:       c.closed_by_clinician,
            cancelled_by_reassessment: c.cancelled_by_reassessment,
            teal_bounced:              c.teal_bounced,
            teal_deferred:             c.teal_deferred,
            reassessments_started:     c.reassessments_started,
            reassessments_completed:   c.reassessments_completed,
            open_calls:                s.open_calls,
            mean_to_dispatch:          mean(Outcome::Dispatched),
            mean_to_close:             mean(Outcome::Closed),
            mean_to_cancel:            mean(Outcome::Cancelled),
            dispatch_wait:             [wait(purple), wait(red), wait(orange), wait(yellow)],
            teal_wait_mean:            teal.mean,
            teal_wait_max:             teal.max,
            call_takers_mean_busy:     s.mean_busy.call_takers,
            stcs_mean_busy:            s.mean_busy.stcs,
            ambulances_mean_busy:      s.mean_busy.ambulances,
            reassessors_mean_busy:     s.mean_busy.reassessors,
        }
    }
}
