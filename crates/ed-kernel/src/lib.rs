//! `ed-kernel` — the discrete-event kernel.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`wake_queue`]  | `WakeQueue` (`BTreeMap<WakeKey, ProcessId>`)             |
//! | [`scheduler`]   | `Scheduler` — simulated clock and per-process status     |
//! | [`process`]     | `Process` trait, `Step`, `ProcessCtx`                    |
//! | [`kernel`]      | `Kernel<W>` — process arena and the resume loop          |
//! | [`queue`]       | `FifoQueue<T>`                                           |
//! | [`pool`]        | `WorkerPool`, `WorkerStatus`                             |
//! | [`error`]       | `KernelError`, `KernelResult<T>`                         |
//!
//! # Execution model
//!
//! ```text
//! loop:
//!   ① pop the earliest (time, seq) wake-up; stop if none or time >= until
//!   ② advance the clock to that time
//!   ③ resume exactly that process until it returns a Step
//!        Hold(d)   → re-queue at now + d
//!        Passivate → wait for another process to activate it
//!        Finish    → drop the process
//! ```
//!
//! Only one process ever runs at a time, so every read and write a process
//! makes between two suspension points is atomic with respect to every other
//! process.  Same-time wake-ups resume in the order they were scheduled.

pub mod error;
pub mod kernel;
pub mod pool;
pub mod process;
pub mod queue;
pub mod scheduler;
pub mod wake_queue;


pub use error::{KernelError, KernelResult};
pub use kernel::{Kernel, Resumed, RunEnd};
pub use pool::{WorkerPool, WorkerStatus};
pub use process::{Process, ProcessCtx, Step};
pub use queue::FifoQueue;
pub use scheduler::{ProcessStatus, Scheduler};
pub use wake_queue::{WakeKey, WakeQueue};
