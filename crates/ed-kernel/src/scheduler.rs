//! The event clock: simulated time plus the status of every process.

use ed_core::{ProcessId, SimTime};

use crate::{WakeKey, WakeQueue};

/// Where a process currently sits in its lifecycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ProcessStatus {
    /// Waiting in the wake queue (after `hold`, spawn or `activate`).
    Scheduled(WakeKey),
    /// Suspended indefinitely until another process activates it.
    Passive,
    /// Currently being resumed.
    Running,
    /// Ended or cancelled; never resumed again.
    Finished,
}

/// Simulated clock and scheduling state.
///
/// The scheduler knows nothing about what processes *do*; it only records
/// when each one is due and whether it can be woken.  `Kernel` owns it and
/// lends it to the running process through `ProcessCtx`.
#[derive(Default)]
pub struct Scheduler {
    now:       SimTime,
    queue:     WakeQueue,
    status:    Vec<ProcessStatus>,
    cancelled: Vec<ProcessId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Allocate a new process id, scheduled to start at the current time
    /// behind everything already due now.
    pub fn register(&mut self) -> ProcessId {
        let pid = ProcessId(self.status.len() as u32);
        let key = self.queue.push(self.now, pid);
        self.status.push(ProcessStatus::Scheduled(key));
        pid
    }

    pub fn status(&self, pid: ProcessId) -> Option<ProcessStatus> {
        self.status.get(pid.index()).copied()
    }

    #[inline]
    pub fn is_passive(&self, pid: ProcessId) -> bool {
        self.status(pid) == Some(ProcessStatus::Passive)
    }

    /// Schedule `pid` to wake at `time`, replacing any pending wake-up.
    ///
    /// # Panics
    /// Panics in debug mode if `time` is in the past.
    pub fn schedule_at(&mut self, time: SimTime, pid: ProcessId) {
        debug_assert!(time >= self.now, "wake-up {time} scheduled before now {}", self.now);
        let Some(slot) = self.status.get_mut(pid.index()) else { return };
        match *slot {
            ProcessStatus::Finished => return,
            ProcessStatus::Scheduled(old) => {
                self.queue.remove(old);
            }
            ProcessStatus::Passive | ProcessStatus::Running => {}
        }
        let key = self.queue.push(time.max(self.now), pid);
        *slot = ProcessStatus::Scheduled(key);
    }

    /// `hold(duration)` for `pid`.
    pub fn hold(&mut self, pid: ProcessId, duration: f64) {
        self.schedule_at(self.now.after(duration), pid);
    }

    /// Suspend `pid` until activated.
    pub fn passivate(&mut self, pid: ProcessId) {
        if let Some(slot) = self.status.get_mut(pid.index()) {
            if let ProcessStatus::Scheduled(old) = *slot {
                self.queue.remove(old);
            }
            if *slot != ProcessStatus::Finished {
                *slot = ProcessStatus::Passive;
            }
        }
    }

    /// Wake a passive process at the current time.
    ///
    /// No-op (returning `false`) for a process that is holding, already
    /// scheduled, running or finished.
    pub fn activate(&mut self, pid: ProcessId) -> bool {
        if !self.is_passive(pid) {
            return false;
        }
        let key = self.queue.push(self.now, pid);
        self.status[pid.index()] = ProcessStatus::Scheduled(key);
        true
    }

    /// Terminate `pid` from outside.  Any pending wake-up is discarded.
    /// Returns `false` if it had already finished.
    pub fn cancel(&mut self, pid: ProcessId) -> bool {
        let Some(slot) = self.status.get_mut(pid.index()) else { return false };
        match *slot {
            ProcessStatus::Finished => return false,
            ProcessStatus::Scheduled(key) => {
                self.queue.remove(key);
            }
            ProcessStatus::Passive | ProcessStatus::Running => {}
        }
        *slot = ProcessStatus::Finished;
        self.cancelled.push(pid);
        true
    }

    /// Mark `pid` as ended of its own accord.
    pub fn finish(&mut self, pid: ProcessId) {
        if let Some(slot) = self.status.get_mut(pid.index()) {
            if let ProcessStatus::Scheduled(key) = *slot {
                self.queue.remove(key);
            }
            *slot = ProcessStatus::Finished;
        }
    }

    /// Earliest pending wake time.
    pub fn next_due(&self) -> Option<SimTime> {
        self.queue.next_time()
    }

    /// Number of pending wake-ups.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pop the next wake-up strictly before `until`, advance the clock to it
    /// and mark the process running.
    pub(crate) fn pop_due(&mut self, until: SimTime) -> Option<ProcessId> {
        if self.queue.next_time()? >= until {
            return None;
        }
        let (key, pid) = self.queue.pop()?;
        self.now = key.time;
        self.status[pid.index()] = ProcessStatus::Running;
        Some(pid)
    }

    /// Move the clock forward to `t` without resuming anything (horizon
    /// reached).  Never moves it backwards.
    pub(crate) fn advance_to(&mut self, t: SimTime) {
        self.now = self.now.max(t);
    }

    pub(crate) fn take_cancelled(&mut self) -> Vec<ProcessId> {
        std::mem::take(&mut self.cancelled)
    }
}
