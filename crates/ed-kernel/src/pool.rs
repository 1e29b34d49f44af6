//! `WorkerPool` — a fixed-size set of worker processes with busy tracking.

use ed_core::{ProcessId, SimTime};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum WorkerStatus {
    Idle,
    Busy,
}

/// Members of one worker kind, in a fixed scan order.
///
/// Capacity is the member count and never changes after the pool is built.
/// Busy status is tracked per member, so `busy_count() <= capacity()` holds
/// by construction.  Every status change also accrues `busy × elapsed` so
/// the time-weighted mean occupancy is available at any instant.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    name:      &'static str,
    members:   Vec<ProcessId>,
    status:    Vec<WorkerStatus>,
    busy:      usize,
    /// Integral of `busy` over time up to `accrued_to`.
    busy_area:  f64,
    accrued_to: SimTime,
}

impl WorkerPool {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            members:    Vec::new(),
            status:     Vec::new(),
            busy:       0,
            busy_area:  0.0,
            accrued_to: SimTime::ZERO,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a worker process; returns its slot in the pool.
    pub fn add(&mut self, pid: ProcessId) -> usize {
        self.members.push(pid);
        self.status.push(WorkerStatus::Idle);
        self.members.len() - 1
    }

    pub fn capacity(&self) -> usize {
        self.members.len()
    }

    pub fn busy_count(&self) -> usize {
        self.busy
    }

    pub fn idle_count(&self) -> usize {
        self.capacity() - self.busy
    }

    pub fn members(&self) -> &[ProcessId] {
        &self.members
    }

    pub fn status(&self, slot: usize) -> Option<WorkerStatus> {
        self.status.get(slot).copied()
    }

    /// Worker-time spent busy from time zero to `now`.
    pub fn busy_time(&self, now: SimTime) -> f64 {
        self.busy_area + self.busy as f64 * now.since(self.accrued_to)
    }

    /// Time-weighted mean number of busy workers over `[0, now]`, or `None`
    /// before any time has passed.
    pub fn mean_busy(&self, now: SimTime) -> Option<f64> {
        let span = now.as_f64();
        (span > 0.0).then(|| self.busy_time(now) / span)
    }

    fn accrue(&mut self, now: SimTime) {
        self.busy_area = self.busy_time(now);
        self.accrued_to = self.accrued_to.max(now);
    }

    /// Mark slot `slot` busy from `now`.  Returns `false` if it already was
    /// (or does not exist).
    pub fn set_busy(&mut self, slot: usize, now: SimTime) -> bool {
        self.accrue(now);
        match self.status.get_mut(slot) {
            Some(s) if *s == WorkerStatus::Idle => {
                *s = WorkerStatus::Busy;
                self.busy += 1;
                true
            }
            _ => false,
        }
    }

    /// Mark slot `slot` idle from `now`.  Returns `false` if it already was.
    pub fn set_idle(&mut self, slot: usize, now: SimTime) -> bool {
        self.accrue(now);
        match self.status.get_mut(slot) {
            Some(s) if *s == WorkerStatus::Busy => {
                *s = WorkerStatus::Idle;
                self.busy -= 1;
                true
            }
            _ => false,
        }
    }

    /// First member, in pool order, for which `is_passive` holds.
    pub fn first_idle(&self, is_passive: impl Fn(ProcessId) -> bool) -> Option<ProcessId> {
        self.members.iter().copied().find(|&pid| is_passive(pid))
    }
}
