//! `ed-sim` — run orchestration for the ed_dispatch simulation.
//!
//! # Run loop
//!
//! ```text
//! loop:
//!   ① Stop     — a raised StopHandle ends the run with RunOutcome::Stopped.
//!   ② Snapshot — every snapshot instant up to the next wake-up is reported
//!                to the observer (state cannot change between wake-ups).
//!   ③ Step     — resume the earliest process due before the horizon.
//!   ④ Done     — nothing due before the horizon → Horizon or Exhausted.
//! on_sim_end(RunSummary)
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ed_core::DispatchConfig;
//! use ed_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(DispatchConfig::default()).build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! println!("{summary}");
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stop;
pub mod summary;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::DispatchSim;
pub use stop::StopHandle;
pub use summary::{DispatchWait, PoolOccupancy, ResolutionStats, RunOutcome, RunSummary, WaitStats};
