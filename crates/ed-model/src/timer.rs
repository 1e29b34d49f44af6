//! Reassessment timers: put long-waiting dispatch calls up for review.

use ed_core::{CallId, ProcessId, TimerId};
use ed_kernel::{KernelResult, Process, Step};
use log::debug;

use crate::{CallState, Ctx, DispatchWorld};

/// Timer state shared through the world.  `active` is cleared by whoever
/// takes the call out of its dispatch queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerRecord {
    pub call:    CallId,
    pub process: ProcessId,
    pub active:  bool,
}

impl TimerRecord {
    pub fn new(call: CallId) -> Self {
        Self { call, process: ProcessId::INVALID, active: true }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// Start a fresh countdown.
    Arm,
    /// Counting down `reassessment_timeframe`.
    Counting,
    /// The call is on the reassessment list; a reassessor re-arms us.
    UnderReview,
}

/// Waits `reassessment_timeframe`, then lists its call for reassessment.
/// Exits as soon as it finds itself switched off.
pub struct ReassessmentTimer {
    timer: TimerId,
    stage: Stage,
}

impl ReassessmentTimer {
    pub fn new(timer: TimerId) -> Self {
        Self { timer, stage: Stage::Arm }
    }
}

impl Process<DispatchWorld> for ReassessmentTimer {
    fn name(&self) -> &'static str {
        "reassessment-timer"
    }

    fn resume(&mut self, ctx: &mut Ctx<'_>) -> KernelResult<Step> {
        let world = &mut *ctx.world;
        let record = *world.timer(self.timer);
        if !record.active {
            return Ok(Step::Finish);
        }
        let timeframe = world.config.reassessment_timeframe;
        match self.stage {
            Stage::Arm | Stage::UnderReview => {
                self.stage = Stage::Counting;
                Ok(Step::Hold(timeframe))
            }
            Stage::Counting => {
                let call = record.call;
                if !world.in_colour_queue(call) {
                    world.timer_mut(self.timer).active = false;
                    return Ok(Step::Finish);
                }
                if world.queues.reassessment.contains(call) {
                    return Ok(Step::Hold(timeframe));
                }
                world.queues.reassessment.enter(call)?;
                world.call_mut(call).state = CallState::AwaitingReassessment;
                world.counters.reassessments_started += 1;
                debug!("{} {call} listed for reassessment", ctx.now());
                ctx.wake_first_idle(|w| &w.pools.reassessors);
                self.stage = Stage::UnderReview;
                Ok(Step::Passivate)
            }
        }
    }
}
