//! `DispatchWorld` — all shared model state.

use ed_core::{CallId, CoreResult, DispatchConfig, SimRng, SimTime, TimerId, TriageColour, WeightedTable};
use ed_kernel::{FifoQueue, WorkerPool};
use log::debug;

use crate::{CallRecord, CallState, Counters, Outcome, PoolSnapshot, Snapshot, TimerRecord};

// ── QueueSet ──────────────────────────────────────────────────────────────────

/// Every FIFO a call can wait in.
///
/// A call is in at most one of `intake`, the four dispatch queues and `teal`
/// at any instant.  `reassessment` is a review list layered over the
/// dispatch queues: a call listed there is still waiting in its colour queue.
#[derive(Debug)]
pub struct QueueSet {
    pub intake:       FifoQueue<CallId>,
    pub purple:       FifoQueue<CallId>,
    pub red:          FifoQueue<CallId>,
    pub orange:       FifoQueue<CallId>,
    pub yellow:       FifoQueue<CallId>,
    pub teal:         FifoQueue<CallId>,
    pub reassessment: FifoQueue<CallId>,
}

impl QueueSet {
    pub fn new() -> Self {
        Self {
            intake:       FifoQueue::new("intake"),
            purple:       FifoQueue::new("purple"),
            red:          FifoQueue::new("red"),
            orange:       FifoQueue::new("orange"),
            yellow:       FifoQueue::new("yellow"),
            teal:         FifoQueue::new("teal"),
            reassessment: FifoQueue::new("reassessment"),
        }
    }

    /// The queue a call of `colour` waits in after triage.
    pub fn colour(&self, colour: TriageColour) -> &FifoQueue<CallId> {
        match colour {
            TriageColour::Purple => &self.purple,
            TriageColour::Red    => &self.red,
            TriageColour::Orange => &self.orange,
            TriageColour::Yellow => &self.yellow,
            TriageColour::Teal   => &self.teal,
        }
    }

    pub fn colour_mut(&mut self, colour: TriageColour) -> &mut FifoQueue<CallId> {
        match colour {
            TriageColour::Purple => &mut self.purple,
            TriageColour::Red    => &mut self.red,
            TriageColour::Orange => &mut self.orange,
            TriageColour::Yellow => &mut self.yellow,
            TriageColour::Teal   => &mut self.teal,
        }
    }

    /// First non-empty dispatch queue in priority order.
    pub fn highest_waiting(&self) -> Option<TriageColour> {
        TriageColour::DISPATCH_PRIORITY
            .into_iter()
            .find(|&c| !self.colour(c).is_empty())
    }

    /// Total calls waiting for an ambulance.
    pub fn dispatch_backlog(&self) -> usize {
        TriageColour::DISPATCH_PRIORITY
            .into_iter()
            .map(|c| self.colour(c).len())
            .sum()
    }
}

impl Default for QueueSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Pools ─────────────────────────────────────────────────────────────────────

/// One worker pool per role.  Members are added when the workers are spawned.
#[derive(Debug)]
pub struct Pools {
    pub call_takers: WorkerPool,
    pub stcs:        WorkerPool,
    pub ambulances:  WorkerPool,
    pub reassessors: WorkerPool,
}

impl Pools {
    pub fn new() -> Self {
        Self {
            call_takers: WorkerPool::new("call-takers"),
            stcs:        WorkerPool::new("stcs"),
            ambulances:  WorkerPool::new("ambulances"),
            reassessors: WorkerPool::new("reassessors"),
        }
    }
}

impl Default for Pools {
    fn default() -> Self {
        Self::new()
    }
}

// ── DispatchWorld ─────────────────────────────────────────────────────────────

/// The state every dispatch process reads and mutates.
pub struct DispatchWorld {
    pub config:   DispatchConfig,
    pub rng:      SimRng,
    pub calls:    Vec<CallRecord>,
    pub timers:   Vec<TimerRecord>,
    pub queues:   QueueSet,
    pub pools:    Pools,
    pub counters: Counters,
    triage_table: WeightedTable<TriageColour>,
}

impl DispatchWorld {
    /// Validate `config` and build an empty world seeded from `config.seed`.
    pub fn new(config: DispatchConfig) -> CoreResult<Self> {
        config.validate()?;
        let triage_table = config.triage_weights.table()?;
        let rng = SimRng::new(config.seed);
        Ok(Self {
            config,
            rng,
            calls: Vec::new(),
            timers: Vec::new(),
            queues: QueueSet::new(),
            pools: Pools::new(),
            counters: Counters::default(),
            triage_table,
        })
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    /// Append a fresh, untriaged call record.  The owning process id is
    /// filled in by the caller once the process is spawned.
    pub fn create_call(&mut self, now: SimTime, rural_remote: bool) -> CallId {
        let id = CallId(self.calls.len() as u32);
        self.calls.push(CallRecord::new(id, now, rural_remote));
        self.counters.calls_created += 1;
        id
    }

    #[inline]
    pub fn call(&self, id: CallId) -> &CallRecord {
        &self.calls[id.index()]
    }

    #[inline]
    pub fn call_mut(&mut self, id: CallId) -> &mut CallRecord {
        &mut self.calls[id.index()]
    }

    /// Draw a colour from the configured triage weights.
    pub fn draw_colour(&mut self) -> TriageColour {
        self.triage_table.pick(&mut self.rng)
    }

    /// `true` while the call sits in the dispatch queue of its colour.
    pub fn in_colour_queue(&self, id: CallId) -> bool {
        match self.call(id).colour {
            Some(c) if c.is_dispatchable() => self.queues.colour(c).contains(id),
            _ => false,
        }
    }

    /// Move a call into its terminal state and count the outcome.
    pub fn resolve(&mut self, id: CallId, outcome: Outcome, now: SimTime) {
        let record = self.call_mut(id);
        record.state = CallState::Terminal(outcome);
        record.resolved_at = Some(now);
        match outcome {
            Outcome::Dispatched => self.counters.dispatched += 1,
            Outcome::Closed     => self.counters.closed_by_clinician += 1,
            Outcome::Cancelled  => self.counters.cancelled_by_reassessment += 1,
        }
        debug!("{now} {id} resolved: {outcome}");
    }

    // ── Timers ────────────────────────────────────────────────────────────

    /// Register an active timer for `call` and link it from the call record.
    pub fn create_timer(&mut self, call: CallId) -> TimerId {
        let id = TimerId(self.timers.len() as u32);
        self.timers.push(TimerRecord::new(call));
        self.call_mut(call).timer = Some(id);
        id
    }

    #[inline]
    pub fn timer(&self, id: TimerId) -> &TimerRecord {
        &self.timers[id.index()]
    }

    #[inline]
    pub fn timer_mut(&mut self, id: TimerId) -> &mut TimerRecord {
        &mut self.timers[id.index()]
    }

    /// Switch off the call's timer if it is still active and return the
    /// timer's process so the caller can wake it to exit.
    pub fn deactivate_timer(&mut self, call: CallId) -> Option<ed_core::ProcessId> {
        let timer = self.call(call).timer?;
        let record = self.timer_mut(timer);
        if !record.active {
            return None;
        }
        record.active = false;
        Some(record.process)
    }

    /// `true` if the call has a timer that has not been switched off.
    pub fn has_active_timer(&self, call: CallId) -> bool {
        self.call(call)
            .timer
            .is_some_and(|t| self.timer(t).active)
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    /// Point-in-time view of queue lengths, pool occupancy and counters.
    pub fn snapshot(&self, at: SimTime) -> Snapshot {
        let q = &self.queues;
        Snapshot {
            at,
            intake:       q.intake.len(),
            purple:       q.purple.len(),
            red:          q.red.len(),
            orange:       q.orange.len(),
            yellow:       q.yellow.len(),
            teal:         q.teal.len(),
            reassessment: q.reassessment.len(),
            call_takers:  PoolSnapshot::of(&self.pools.call_takers),
            stcs:         PoolSnapshot::of(&self.pools.stcs),
            ambulances:   PoolSnapshot::of(&self.pools.ambulances),
            reassessors:  PoolSnapshot::of(&self.pools.reassessors),
            counters:     self.counters,
        }
    }
}
