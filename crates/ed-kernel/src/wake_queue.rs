//! `WakeQueue` — time-ordered pending wake-ups.
//!
//! Entries are keyed by `(time, seq)` where `seq` is a per-queue counter
//! incremented on every push.  Two wake-ups at the same instant therefore
//! pop in the order they were pushed, which is what lets the first worker
//! activated for a freshly queued call be the one that claims it.
//!
//! `BTreeMap` gives O(log W) push, pop and removal by key (W = pending
//! wake-ups); removal is needed when a scheduled process is cancelled.

use std::collections::BTreeMap;

use ed_core::{ProcessId, SimTime};

/// Position of one wake-up in the queue.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct WakeKey {
    pub time: SimTime,
    pub seq:  u64,
}

#[derive(Default)]
pub struct WakeQueue {
    inner:    BTreeMap<WakeKey, ProcessId>,
    next_seq: u64,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `process` to wake at `time`; returns the key needed to
    /// remove the entry again.
    pub fn push(&mut self, time: SimTime, process: ProcessId) -> WakeKey {
        let key = WakeKey { time, seq: self.next_seq };
        self.next_seq += 1;
        self.inner.insert(key, process);
        key
    }

    /// Remove and return the earliest entry.
    pub fn pop(&mut self) -> Option<(WakeKey, ProcessId)> {
        self.inner.pop_first()
    }

    /// Drop a specific entry.  Returns `false` if it was already gone.
    pub fn remove(&mut self, key: WakeKey) -> bool {
        self.inner.remove(&key).is_some()
    }

    /// The earliest pending wake time, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().map(|k| k.time)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
