//! Reassessment clinicians: review long-waiting calls and cancel some.

use ed_core::CallId;
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{CallState, Ctx, DispatchWorld, Outcome};

/// One reassessment clinician.  `slot` is its index in `pools.reassessors`.
pub struct Reassessor {
    slot:      usize,
    reviewing: Option<CallId>,
}

impl Reassessor {
    pub fn new(slot: usize) -> Self {
        Self { slot, reviewing: None }
    }

    fn conclude(&mut self, ctx: &mut Ctx<'_>, call: CallId) {
        let now = ctx.now();
        let world = &mut *ctx.world;
        world.counters.reassessments_completed += 1;
        world.pools.reassessors.set_idle(self.slot, now);
        let cancel = world.rng.gen_bool(world.config.reassessment_cancel_probability);

        // An ambulance may have taken the call during the review.
        if !world.in_colour_queue(call) {
            return;
        }
        world.queues.reassessment.leave(call);
        if cancel {
            if let Some(colour) = world.call(call).colour {
                world.queues.colour_mut(colour).leave(call);
            }
            let timer = world.deactivate_timer(call);
            world.resolve(call, Outcome::Cancelled, now);
            let process = world.call(call).process;
            ctx.cancel(process);
            if let Some(timer) = timer {
                ctx.activate(timer);
            }
            return;
        }
        world.call_mut(call).state = CallState::QueuedDispatch;
        debug!("{now} {call} kept after reassessment");
        let timer = world.call(call).timer.map(|t| *world.timer(t));
        if let Some(timer) = timer.filter(|t| t.active) {
            ctx.activate(timer.process);
        }
    }
}

impl Process<DispatchWorld> for Reassessor {
    fn name(&self) -> &'static str {
        "reassessor"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        if let Some(call) = self.reviewing.take() {
            self.conclude(ctx, call);
        }
        let now = ctx.now();
        let world = &mut *ctx.world;
        if world.queues.reassessment.is_empty() {
            return Ok(Step::Passivate);
        }
        let call = world.queues.reassessment.pop_first()?;
        world.pools.reassessors.set_busy(self.slot, now);
        self.reviewing = Some(call);
        Ok(Step::Hold(world.config.reassessment_service.sample(&mut world.rng)))
    }
}
