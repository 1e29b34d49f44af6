//! `ed-model` — the emergency-dispatch call-centre model.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`world`]       | `DispatchWorld`, `QueueSet`, `Pools`                     |
//! | [`call`]        | `CallRecord`, `CallState`, `Outcome`, `CallProcess`      |
//! | [`triage`]      | rural/remote screening and the double-draw option        |
//! | [`generator`]   | `CallGenerator`, `spawn_call`                            |
//! | [`call_taker`]  | `CallTaker`                                              |
//! | [`stc`]         | `Stc` (secondary triage clinician)                       |
//! | [`ambulance`]   | `Ambulance`                                              |
//! | [`timer`]       | `TimerRecord`, `ReassessmentTimer`                       |
//! | [`reassessor`]  | `Reassessor` (reassessment clinician)                    |
//! | [`counters`]    | `Counters`                                               |
//! | [`snapshot`]    | `Snapshot`, `PoolSnapshot`                               |
//! | [`staff`]       | `spawn_staff`                                            |
//!
//! # Call lifecycle
//!
//! ```text
//! CallGenerator ──spawn──▶ Call ──▶ intake ──CallTaker──▶ colour assigned
//!                                     │
//!         ┌───────── dispatchable ────┴──────── teal ─────────┐
//!         ▼                                                    ▼
//!   colour queue + ReassessmentTimer                     teal queue ──Stc──▶ closed
//!         │            │                                       │  (timeout / deferred)
//!     Ambulance    timer fires ──▶ reassessment queue          └──▶ yellow queue
//!         │                           │
//!     dispatched              Reassessor ──▶ cancelled | timer re-armed
//! ```
//!
//! Every process receives the world through `ProcessCtx::world` and only ever
//! holds ids (`CallId`, `TimerId`, `ProcessId`) between resumes.

pub mod ambulance;
pub mod call;
pub mod call_taker;
pub mod counters;
pub mod generator;
pub mod reassessor;
pub mod snapshot;
pub mod staff;
pub mod stc;
pub mod timer;
pub mod triage;
pub mod world;

#[cfg(test)]
mod tests;

pub use ambulance::Ambulance;
pub use call::{CallProcess, CallRecord, CallState, Outcome};
pub use call_taker::CallTaker;
pub use counters::Counters;
pub use generator::{CallGenerator, spawn_call};
pub use reassessor::Reassessor;
pub use snapshot::{PoolSnapshot, Snapshot};
pub use staff::spawn_staff;
pub use stc::Stc;
pub use timer::{ReassessmentTimer, TimerRecord};
pub use world::{DispatchWorld, Pools, QueueSet};

/// Shorthand for the context every dispatch process runs with.
pub type Ctx<'a> = ed_kernel::ProcessCtx<'a, DispatchWorld>;
