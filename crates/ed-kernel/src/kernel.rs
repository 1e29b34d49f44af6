//! `Kernel<W>` — the process arena and the resume loop.

use ed_core::{ProcessId, SimTime};
use log::trace;

use crate::{KernelError, KernelResult, Process, ProcessCtx, ProcessStatus, Scheduler, Step};

/// Why [`Kernel::run`] returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunEnd {
    /// The next wake-up is at or after `until`; the clock now reads `until`.
    Horizon,
    /// No process is scheduled.  Everything left is passive or finished.
    Exhausted,
}

/// One resumed process, reported by [`Kernel::step`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Resumed {
    pub pid:  ProcessId,
    pub name: &'static str,
    pub at:   SimTime,
    pub step: Step,
}

/// Owns the world, the scheduler and every live process.
///
/// Processes live in an arena indexed by `ProcessId`.  While one is being
/// resumed its slot is temporarily empty, which is what lets it receive
/// `&mut W` and `&mut Scheduler` at the same time.
pub struct Kernel<W> {
    scheduler: Scheduler,
    processes: Vec<Option<Box<dyn Process<W>>>>,
    world:     W,
}

impl<W> Kernel<W> {
    pub fn new(world: W) -> Self {
        Self {
            scheduler: Scheduler::new(),
            processes: Vec::new(),
            world,
        }
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of processes that have not finished.
    pub fn live_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.is_some()).count()
    }

    /// Add a process from outside any running process.  It starts at the
    /// current time, behind everything already due now.
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> ProcessId {
        let pid = self.scheduler.register();
        self.install(pid, process);
        pid
    }

    /// Run a closure with a process context that is not tied to any process.
    /// Drivers use this to inject work between steps.
    pub fn with_ctx<R>(&mut self, f: impl FnOnce(&mut ProcessCtx<'_, W>) -> R) -> R {
        let mut spawned = Vec::new();
        let result = {
            let mut ctx = ProcessCtx::new(
                ProcessId::INVALID,
                &mut self.world,
                &mut self.scheduler,
                &mut spawned,
            );
            f(&mut ctx)
        };
        for (pid, process) in spawned {
            self.install(pid, process);
        }
        self.sweep_cancelled();
        result
    }

    /// Resume the earliest wake-up strictly before `until`.
    ///
    /// Returns `Ok(None)` when there is nothing due before `until`.
    pub fn step(&mut self, until: SimTime) -> KernelResult<Option<Resumed>> {
        let Some(pid) = self.scheduler.pop_due(until) else {
            return Ok(None);
        };
        let at = self.scheduler.now();
        let mut process = self
            .processes
            .get_mut(pid.index())
            .and_then(Option::take)
            .ok_or(KernelError::MissingProcess(pid))?;
        let name = process.name();
        trace!("{at} resume {name} {pid}");

        let mut spawned = Vec::new();
        let outcome = {
            let mut ctx = ProcessCtx::new(pid, &mut self.world, &mut self.scheduler, &mut spawned);
            process.resume(&mut ctx)
        };
        for (child, boxed) in spawned {
            self.install(child, boxed);
        }
        let step = outcome?;

        // A process may have been cancelled while it ran; honour that over
        // whatever it asked for.
        if self.scheduler.status(pid) == Some(ProcessStatus::Finished) {
            self.sweep_cancelled();
            return Ok(Some(Resumed { pid, name, at, step: Step::Finish }));
        }

        match step {
            Step::Hold(duration) => {
                self.scheduler.hold(pid, duration);
                self.processes[pid.index()] = Some(process);
            }
            Step::Passivate => {
                self.scheduler.passivate(pid);
                self.processes[pid.index()] = Some(process);
            }
            Step::Finish => self.scheduler.finish(pid),
        }
        self.sweep_cancelled();
        Ok(Some(Resumed { pid, name, at, step }))
    }

    /// Resume processes until nothing is due before `until`.
    pub fn run(&mut self, until: SimTime) -> KernelResult<RunEnd> {
        while self.step(until)?.is_some() {}
        Ok(self.finish_run(until))
    }

    /// Classify why stepping stopped and, on a horizon halt, move the clock
    /// to `until`.
    pub fn finish_run(&mut self, until: SimTime) -> RunEnd {
        match self.scheduler.next_due() {
            Some(_) => {
                self.scheduler.advance_to(until);
                RunEnd::Horizon
            }
            None => RunEnd::Exhausted,
        }
    }

    fn install(&mut self, pid: ProcessId, process: Box<dyn Process<W>>) {
        let idx = pid.index();
        if self.processes.len() <= idx {
            self.processes.resize_with(idx + 1, || None);
        }
        self.processes[idx] = Some(process);
    }

    fn sweep_cancelled(&mut self) {
        for pid in self.scheduler.take_cancelled() {
            if let Some(slot) = self.processes.get_mut(pid.index()) {
                *slot = None;
            }
        }
    }
}
