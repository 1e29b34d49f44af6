//! Calls: the per-call record and the process that carries a call through
//! triage, the teal pathway and the dispatch queues.

use std::fmt;

use ed_core::{CallId, ProcessId, SimTime, TimerId, TriageColour};
use ed_kernel::{KernelError, KernelResult, Process, Step};
use log::debug;

use crate::timer::ReassessmentTimer;
use crate::{Ctx, triage};

// ── Record ────────────────────────────────────────────────────────────────────

/// How a call left the system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// An ambulance was assigned.
    Dispatched,
    /// Closed by a secondary triage clinician without an ambulance.
    Closed,
    /// Cancelled by a reassessment clinician.
    Cancelled,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Dispatched, Outcome::Closed, Outcome::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Dispatched => "dispatched",
            Outcome::Closed     => "closed",
            Outcome::Cancelled  => "cancelled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a call currently is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallState {
    /// In the intake queue or with a call-taker.
    AwaitingTriage,
    /// Waiting in a dispatch queue.
    QueuedDispatch,
    /// Waiting in the teal queue for a clinician.
    QueuedTeal,
    /// Being assessed by a secondary triage clinician.
    WithClinician,
    /// Listed for reassessment while still waiting in its dispatch queue.
    AwaitingReassessment,
    /// Taken by an ambulance; resolves when the job finishes.
    AmbulanceAssigned,
    Terminal(Outcome),
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Terminal(_))
    }
}

/// Per-call data kept for the whole run.
#[derive(Clone, Debug)]
pub struct CallRecord {
    pub id:                     CallId,
    /// The `CallProcess` driving this call.
    pub process:                ProcessId,
    /// `None` until a call-taker has triaged the call.
    pub colour:                 Option<TriageColour>,
    pub rural_remote:           bool,
    pub processed_by_clinician: bool,
    pub timer:                  Option<TimerId>,
    pub state:                  CallState,
    pub created_at:             SimTime,
    pub triaged_at:             Option<SimTime>,
    /// Last time the call joined the teal queue.
    pub teal_queued_at:         Option<SimTime>,
    /// When a secondary triage clinician took the call off the teal queue.
    pub assessed_at:            Option<SimTime>,
    /// Last time the call joined a dispatch queue.
    pub dispatch_queued_at:     Option<SimTime>,
    /// When an ambulance took the call off its dispatch queue.
    pub assigned_at:            Option<SimTime>,
    pub resolved_at:            Option<SimTime>,
}

impl CallRecord {
    pub fn new(id: CallId, created_at: SimTime, rural_remote: bool) -> Self {
        Self {
            id,
            process: ProcessId::INVALID,
            colour: None,
            rural_remote,
            processed_by_clinician: false,
            timer: None,
            state: CallState::AwaitingTriage,
            created_at,
            triaged_at: None,
            teal_queued_at: None,
            assessed_at: None,
            dispatch_queued_at: None,
            assigned_at: None,
            resolved_at: None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            CallState::Terminal(o) => Some(o),
            _ => None,
        }
    }

    /// Time from creation to resolution, for resolved calls.
    pub fn time_to_resolution(&self) -> Option<f64> {
        self.resolved_at.map(|t| t.since(self.created_at))
    }

    /// Time spent in a dispatch queue before an ambulance took the call.
    pub fn dispatch_wait(&self) -> Option<f64> {
        Some(self.assigned_at?.since(self.dispatch_queued_at?))
    }

    /// Time spent in the teal queue before a clinician took the call.
    pub fn teal_wait(&self) -> Option<f64> {
        Some(self.assessed_at?.since(self.teal_queued_at?))
    }
}

// ── Process ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// Not yet in the system.
    Arrive,
    /// Colour assigned; route on next resume.
    Triaged { screen: bool },
    /// In a dispatch queue until an ambulance or reassessor resolves it.
    AwaitDispatch,
    /// Holding in the teal queue for at most `teal_max_wait`.
    TealWait,
    /// Teal wait expired while a clinician was mid-assessment.
    AwaitClinician,
}

/// Drives one call from arrival to a dispatch queue or closure.
///
/// Once the call is in a dispatch queue this process stays passive; the
/// ambulance or reassessor that resolves the call cancels it.
pub struct CallProcess {
    call:  CallId,
    stage: Stage,
}

impl CallProcess {
    /// A call that goes through intake and a call-taker.
    pub fn new(call: CallId) -> Self {
        Self { call, stage: Stage::Arrive }
    }

    /// A call whose colour is already on its record; it skips intake and
    /// screening and routes straight away.
    pub fn pre_triaged(call: CallId) -> Self {
        Self { call, stage: Stage::Triaged { screen: false } }
    }

    fn arrive(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        ctx.world.queues.intake.enter(self.call)?;
        ctx.world.call_mut(self.call).state = CallState::AwaitingTriage;
        ctx.wake_first_idle(|w| &w.pools.call_takers);
        self.stage = Stage::Triaged { screen: true };
        Ok(Step::Passivate)
    }

    fn route(&mut self, ctx: &mut Ctx<'_>, screen: bool) -> KernelResult<Step> {
        let assigned = ctx
            .world
            .call(self.call)
            .colour
            .ok_or_else(|| KernelError::Invariant(format!("{} routed before triage", self.call)))?;
        let colour = if screen {
            triage::screen(ctx.world, self.call, assigned)
        } else {
            assigned
        };
        ctx.world.call_mut(self.call).colour = Some(colour);
        debug!("{} {} routed as {colour}", ctx.now(), self.call);

        if colour.is_dispatchable() {
            return self.enter_dispatch(ctx, colour, true);
        }
        ctx.world.queues.teal.enter(self.call)?;
        let now = ctx.now();
        let record = ctx.world.call_mut(self.call);
        record.state = CallState::QueuedTeal;
        record.teal_queued_at = Some(now);
        ctx.wake_first_idle(|w| &w.pools.stcs);
        self.stage = Stage::TealWait;
        Ok(Step::Hold(ctx.world.config.teal_max_wait))
    }

    /// Join the dispatch queue for `colour`, optionally arming a
    /// reassessment timer, and wake an ambulance.
    fn enter_dispatch(
        &mut self,
        ctx:        &mut Ctx<'_>,
        colour:     TriageColour,
        with_timer: bool,
    ) -> KernelResult<Step> {
        let call = self.call;
        let now = ctx.now();
        ctx.world.queues.colour_mut(colour).enter(call)?;
        let record = ctx.world.call_mut(call);
        record.colour = Some(colour);
        record.state = CallState::QueuedDispatch;
        record.dispatch_queued_at = Some(now);

        if with_timer {
            let timer = ctx.world.create_timer(call);
            let pid = ctx.spawn(Box::new(ReassessmentTimer::new(timer)));
            ctx.world.timer_mut(timer).process = pid;
        }
        ctx.wake_first_idle(|w| &w.pools.ambulances);
        self.stage = Stage::AwaitDispatch;
        Ok(Step::Passivate)
    }

    fn teal_timeout(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let call = self.call;
        if ctx.world.queues.teal.leave(call) {
            ctx.world.counters.teal_bounced += 1;
            debug!("{} {call} bounced from teal", ctx.now());
            return self.reclassify_yellow(ctx);
        }
        if ctx.world.call(call).processed_by_clinician {
            return self.after_clinician(ctx);
        }
        // A clinician has the call; it reactivates us when done.
        self.stage = Stage::AwaitClinician;
        Ok(Step::Passivate)
    }

    fn after_clinician(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let p = ctx.world.config.teal_closure_probability;
        if ctx.world.rng.gen_bool(p) {
            let now = ctx.now();
            ctx.world.resolve(self.call, Outcome::Closed, now);
            return Ok(Step::Finish);
        }
        ctx.world.counters.teal_deferred += 1;
        self.reclassify_yellow(ctx)
    }

    fn reclassify_yellow(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let with_timer = ctx.world.config.reassess_reclassified_yellow;
        self.enter_dispatch(ctx, TriageColour::Yellow, with_timer)
    }
}

impl Process<crate::DispatchWorld> for CallProcess {
    fn name(&self) -> &'static str {
        "call"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        match self.stage {
            Stage::Arrive => self.arrive(ctx),
            Stage::Triaged { screen } => self.route(ctx, screen),
            Stage::TealWait => self.teal_timeout(ctx),
            Stage::AwaitClinician => {
                if ctx.world.call(self.call).processed_by_clinician {
                    self.after_clinician(ctx)
                } else {
                    Ok(Step::Passivate)
                }
            }
            Stage::AwaitDispatch => Ok(Step::Passivate),
        }
    }
}
