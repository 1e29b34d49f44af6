//! Post-triage colour adjustments applied when a call is routed.

use ed_core::{CallId, TriageColour};

use crate::DispatchWorld;

/// Final routing colour for a call a call-taker marked `assigned`.
///
/// With rural screening enabled, a rural/remote call whose colour is one of
/// the screened colours is sent to teal with the configured probability.
/// When screening does not apply and `double_draw` is set, the colour is
/// drawn again from the triage weights.
pub fn screen(world: &mut DispatchWorld, call: CallId, assigned: TriageColour) -> TriageColour {
    let screening = &world.config.rural_screening;
    let eligible = screening.enabled
        && world.call(call).rural_remote
        && screening.screen_colours.contains(&assigned);
    if eligible {
        let p = screening.teal_probability;
        if world.rng.gen_bool(p) {
            return TriageColour::Teal;
        }
        return assigned;
    }
    if world.config.double_draw {
        return world.draw_colour();
    }
    assigned
}
