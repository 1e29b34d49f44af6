//! Call arrivals.

use ed_core::{CallId, TriageColour};
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{CallProcess, Ctx, DispatchWorld};

/// Create a call record and spawn its process.
///
/// With `colour = None` the call goes through intake and a call-taker.
/// With `Some(colour)` it is recorded as already triaged and routed directly.
pub fn spawn_call(ctx: &mut Ctx<'_>, colour: Option<TriageColour>, rural_remote: bool) -> CallId {
    let now = ctx.now();
    let call = ctx.world.create_call(now, rural_remote);
    let process = match colour {
        None => CallProcess::new(call),
        Some(c) => {
            let record = ctx.world.call_mut(call);
            record.colour = Some(c);
            record.triaged_at = Some(now);
            ctx.world.counters.calls_triaged += 1;
            CallProcess::pre_triaged(call)
        }
    };
    let pid = ctx.spawn(Box::new(process));
    ctx.world.call_mut(call).process = pid;
    debug!("{now} {call} created (rural_remote={rural_remote})");
    call
}

/// Creates a call, then waits one inter-arrival time, forever.
#[derive(Default)]
pub struct CallGenerator;

impl CallGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Process<DispatchWorld> for CallGenerator {
    fn name(&self) -> &'static str {
        "call-generator"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let world = &mut *ctx.world;
        let rural = world.rng.gen_bool(world.config.rural_screening.rural_fraction);
        spawn_call(ctx, None, rural);
        let world = &mut *ctx.world;
        let gap = world.config.interarrival.sample(&mut world.rng);
        Ok(Step::Hold(gap))
    }
}
