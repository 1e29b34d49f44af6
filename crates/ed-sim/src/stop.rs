//! Cross-thread stop signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable flag asking a running [`DispatchSim`][crate::DispatchSim] to
/// halt.  Checked between scheduler steps; the run ends with
/// [`RunOutcome::Stopped`][crate::RunOutcome::Stopped] and keeps its
/// counters.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
