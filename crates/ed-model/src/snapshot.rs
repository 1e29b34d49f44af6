//! Point-in-time views of the world, handed to observers.

use ed_core::{SimTime, TriageColour};
use ed_kernel::WorkerPool;

use crate::Counters;

/// Occupancy of one worker pool.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub capacity: usize,
    pub busy:     usize,
}

impl PoolSnapshot {
    pub fn of(pool: &WorkerPool) -> Self {
        Self { capacity: pool.capacity(), busy: pool.busy_count() }
    }

    pub fn idle(&self) -> usize {
        self.capacity - self.busy
    }
}

/// Queue lengths, pool occupancy and counters at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub at:           SimTime,
    pub intake:       usize,
    pub purple:       usize,
    pub red:          usize,
    pub orange:       usize,
    pub yellow:       usize,
    pub teal:         usize,
    pub reassessment: usize,
    pub call_takers:  PoolSnapshot,
    pub stcs:         PoolSnapshot,
    pub ambulances:   PoolSnapshot,
    pub reassessors:  PoolSnapshot,
    pub counters:     Counters,
}

impl Snapshot {
    pub fn queue_len(&self, colour: TriageColour) -> usize {
        match colour {
            TriageColour::Purple => self.purple,
            TriageColour::Red    => self.red,
            TriageColour::Orange => self.orange,
            TriageColour::Yellow => self.yellow,
            TriageColour::Teal   => self.teal,
        }
    }

    /// Calls waiting for an ambulance across all dispatch queues.
    pub fn dispatch_backlog(&self) -> usize {
        self.purple + self.red + self.orange + self.yellow
    }
}
