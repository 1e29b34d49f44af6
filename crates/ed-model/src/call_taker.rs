//! Call-takers: pull calls from intake and assign a triage colour.

use ed_core::CallId;
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{Ctx, DispatchWorld};

/// One call-taker.  `slot` is its index in `pools.call_takers`.
pub struct CallTaker {
    slot:    usize,
    serving: Option<CallId>,
}

impl CallTaker {
    pub fn new(slot: usize) -> Self {
        Self { slot, serving: None }
    }

    fn finish_triage(&mut self, ctx: &mut Ctx<'_>, call: CallId) {
        let now = ctx.now();
        let world = &mut *ctx.world;
        let colour = world.draw_colour();
        let record = world.call_mut(call);
        record.colour = Some(colour);
        record.triaged_at = Some(now);
        let process = record.process;
        world.counters.calls_triaged += 1;
        world.pools.call_takers.set_idle(self.slot, now);
        debug!("{now} {call} triaged {colour}");
        ctx.activate(process);
    }
}

impl Process<DispatchWorld> for CallTaker {
    fn name(&self) -> &'static str {
        "call-taker"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        if let Some(call) = self.serving.take() {
            self.finish_triage(ctx, call);
        }
        let now = ctx.now();
        let world = &mut *ctx.world;
        if world.queues.intake.is_empty() {
            return Ok(Step::Passivate);
        }
        let call = world.queues.intake.pop_first()?;
        world.pools.call_takers.set_busy(self.slot, now);
        self.serving = Some(call);
        Ok(Step::Hold(world.config.call_taker_service.sample(&mut world.rng)))
    }
}
