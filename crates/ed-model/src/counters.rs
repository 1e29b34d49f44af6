//! Running totals.  Every field only ever increases.

/// Monotonic event counters for one run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub calls_created:             u64,
    pub calls_triaged:             u64,
    /// Teal calls that timed out waiting for a clinician.
    pub teal_bounced:              u64,
    /// Teal calls a clinician assessed and sent on for dispatch.
    pub teal_deferred:             u64,
    pub closed_by_clinician:       u64,
    pub dispatched:                u64,
    pub cancelled_by_reassessment: u64,
    pub reassessments_started:     u64,
    pub reassessments_completed:   u64,
}

impl Counters {
    /// Calls that reached a terminal state.
    pub fn resolved(&self) -> u64 {
        self.dispatched + self.closed_by_clinician + self.cancelled_by_reassessment
    }
}
