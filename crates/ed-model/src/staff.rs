//! Populating a kernel with the configured workers.

use ed_kernel::Kernel;

use crate::{Ambulance, CallTaker, DispatchWorld, Reassessor, Stc};

/// Spawn every worker process named by `config.staffing` and register it
/// in its pool.
///
/// Spawn order fixes both the order in which workers first run at t=0 and
/// the scan order used when waking an idle worker: clinicians, then
/// ambulances, call-takers and reassessors, each in slot order.
pub fn spawn_staff(kernel: &mut Kernel<DispatchWorld>) {
    let staffing = kernel.world().config.staffing.clone();

    for slot in 0..staffing.stcs {
        let pid = kernel.spawn(Box::new(Stc::new(slot)));
        kernel.world_mut().pools.stcs.add(pid);
    }
    for slot in 0..staffing.ambulances {
        let pid = kernel.spawn(Box::new(Ambulance::new(slot)));
        kernel.world_mut().pools.ambulances.add(pid);
    }
    for slot in 0..staffing.call_takers {
        let pid = kernel.spawn(Box::new(CallTaker::new(slot)));
        kernel.world_mut().pools.call_takers.add(pid);
    }
    for slot in 0..staffing.reassessors {
        let pid = kernel.spawn(Box::new(Reassessor::new(slot)));
        kernel.world_mut().pools.reassessors.add(pid);
    }
}
