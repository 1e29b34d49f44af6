//! Secondary triage clinicians: assess teal calls.

use ed_core::CallId;
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{CallState, Ctx, DispatchWorld};

/// One secondary triage clinician.  `slot` is its index in `pools.stcs`.
pub struct Stc {
    slot:      usize,
    assessing: Option<CallId>,
}

impl Stc {
    pub fn new(slot: usize) -> Self {
        Self { slot, assessing: None }
    }
}

impl Process<DispatchWorld> for Stc {
    fn name(&self) -> &'static str {
        "stc"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let now = ctx.now();
        if let Some(call) = self.assessing.take() {
            let world = &mut *ctx.world;
            let record = world.call_mut(call);
            record.processed_by_clinician = true;
            let process = record.process;
            world.pools.stcs.set_idle(self.slot, now);
            debug!("{now} {call} assessed");
            // Only lands if the call already gave up waiting and passivated.
            ctx.activate(process);
        }
        let world = &mut *ctx.world;
        if world.queues.teal.is_empty() {
            return Ok(Step::Passivate);
        }
        let call = world.queues.teal.pop_first()?;
        let record = world.call_mut(call);
        record.state = CallState::WithClinician;
        record.assessed_at = Some(now);
        world.pools.stcs.set_busy(self.slot, now);
        self.assessing = Some(call);
        Ok(Step::Hold(world.config.stc_service.sample(&mut world.rng)))
    }
}
