//! The `Process` trait — every concurrently modelled actor implements it.

use ed_core::{ProcessId, SimTime};

use crate::{KernelResult, Scheduler, WorkerPool};

/// How a process suspends itself at the end of a resume.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    /// Resume automatically after `duration` simulated time units.
    Hold(f64),
    /// Suspend until another process calls `activate` on this one.
    Passivate,
    /// The process is done and is dropped from the arena.
    Finish,
}

/// A resumable unit of execution over a shared world `W`.
///
/// A process is an explicit state machine: each call to
/// [`resume`](Self::resume) runs from the previous suspension point to the
/// next one and reports how to suspend through the returned [`Step`].  The
/// process keeps whatever it needs to know "where it was" in its own fields.
///
/// # Example
///
/// ```rust,ignore
/// struct Ticker { fired: u32 }
///
/// impl Process<Counter> for Ticker {
///     fn name(&self) -> &'static str { "ticker" }
///
///     fn resume(&mut self, ctx: &mut ProcessCtx<'_, Counter>) -> KernelResult<Step> {
///         ctx.world.ticks += 1;
///         self.fired += 1;
///         Ok(if self.fired < 10 { Step::Hold(1.0) } else { Step::Finish })
///     }
/// }
/// ```
pub trait Process<W> {
    /// Short label used in logs and observer callbacks.
    fn name(&self) -> &'static str;

    /// Run until the next suspension point.
    ///
    /// An `Err` aborts the whole run; it is reserved for broken invariants,
    /// never for ordinary model outcomes.
    fn resume(&mut self, ctx: &mut ProcessCtx<'_, W>) -> KernelResult<Step>;
}

/// Everything a process may touch while it runs.
///
/// The world is exposed directly as a field so processes can borrow
/// disjoint parts of it; the scheduler is private and reachable only through
/// the suspension primitives below.
pub struct ProcessCtx<'a, W> {
    pid:       ProcessId,
    /// Shared simulation state.
    pub world: &'a mut W,
    scheduler: &'a mut Scheduler,
    spawned:   &'a mut Vec<(ProcessId, Box<dyn Process<W>>)>,
}

impl<'a, W> ProcessCtx<'a, W> {
    pub(crate) fn new(
        pid:       ProcessId,
        world:     &'a mut W,
        scheduler: &'a mut Scheduler,
        spawned:   &'a mut Vec<(ProcessId, Box<dyn Process<W>>)>,
    ) -> Self {
        Self { pid, world, scheduler, spawned }
    }

    /// Id of the running process.
    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Start a new process at the current time.  It runs after every
    /// wake-up already due now.
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> ProcessId {
        let pid = self.scheduler.register();
        self.spawned.push((pid, process));
        pid
    }

    /// Wake `other` now if it is passive; no-op otherwise.
    pub fn activate(&mut self, other: ProcessId) -> bool {
        self.scheduler.activate(other)
    }

    /// Terminate `other`, discarding any pending wake-up.
    pub fn cancel(&mut self, other: ProcessId) -> bool {
        self.scheduler.cancel(other)
    }

    pub fn is_passive(&self, other: ProcessId) -> bool {
        self.scheduler.is_passive(other)
    }

    /// Activate the first passive member of the pool selected by `pool`,
    /// scanning in the pool's fixed member order.
    ///
    /// Returns the woken process, or `None` if every member is busy or
    /// already scheduled (in which case the work stays queued until a worker
    /// comes back and scans for it).
    pub fn wake_first_idle<F>(&mut self, pool: F) -> Option<ProcessId>
    where
        F: FnOnce(&W) -> &WorkerPool,
    {
        let scheduler = &mut *self.scheduler;
        let found = pool(&*self.world).first_idle(|pid| scheduler.is_passive(pid))?;
        scheduler.activate(found);
        Some(found)
    }
}
