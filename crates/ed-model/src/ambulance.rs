//! Ambulances: serve dispatch queues in strict colour priority.

use ed_core::CallId;
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{CallState, Ctx, DispatchWorld, Outcome};

/// One ambulance.  `slot` is its index in `pools.ambulances`.
pub struct Ambulance {
    slot:    usize,
    serving: Option<CallId>,
}

impl Ambulance {
    pub fn new(slot: usize) -> Self {
        Self { slot, serving: None }
    }
}

impl Process<DispatchWorld> for Ambulance {
    fn name(&self) -> &'static str {
        "ambulance"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let now = ctx.now();
        if let Some(call) = self.serving.take() {
            let world = &mut *ctx.world;
            world.resolve(call, Outcome::Dispatched, now);
            world.pools.ambulances.set_idle(self.slot, now);
            let process = world.call(call).process;
            ctx.cancel(process);
        }

        let world = &mut *ctx.world;
        let Some(colour) = world.queues.highest_waiting() else {
            return Ok(Step::Passivate);
        };
        let call = world.queues.colour_mut(colour).pop_first()?;
        world.queues.reassessment.leave(call);
        let timer = world.deactivate_timer(call);
        let record = world.call_mut(call);
        record.state = CallState::AmbulanceAssigned;
        record.assigned_at = Some(now);
        world.pools.ambulances.set_busy(self.slot, now);
        let service = world.config.ambulance_service(colour).sample(&mut world.rng);
        self.serving = Some(call);
        debug!("{now} {call} ({colour}) assigned to ambulance {}", self.slot);
        // Wake a passive timer so it sees it was switched off and exits.
        if let Some(timer) = timer {
            ctx.activate(timer);
        }
        Ok(Step::Hold(service))
    }
}
