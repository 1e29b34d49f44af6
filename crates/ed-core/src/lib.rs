//! `ed-core` — foundational types for the `ed_dispatch` simulation.
//!
//! This crate is a dependency of every other `ed-*` crate.  It has no `ed-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `ProcessId`, `CallId`, `TimerId`                          |
//! | [`time`]      | `SimTime` (totally ordered, non-negative `f64`)           |
//! | [`colour`]    | `TriageColour`, dispatch priority order                   |
//! | [`dist`]      | `Dist` — serialisable duration distributions             |
//! | [`rng`]       | `SimRng`, `WeightedTable<T>`                              |
//! | [`config`]    | `DispatchConfig`, `Staffing`, `TriageWeights`, `RuralScreening` |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |

pub mod colour;
pub mod config;
pub mod dist;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use colour::TriageColour;
pub use config::{DispatchConfig, RuralScreening, Staffing, TriageWeights};
pub use dist::Dist;
pub use error::{CoreError, CoreResult};
pub use ids::{CallId, ProcessId, TimerId};
pub use rng::{SimRng, WeightedTable};
pub use time::SimTime;
