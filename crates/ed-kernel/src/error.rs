use ed_core::ProcessId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    /// `pop_first` on an empty queue.  Callers must check `len()` first;
    /// reaching this is a bug in process logic.
    #[error("pop from empty queue `{queue}`")]
    EmptyQueue { queue: &'static str },

    #[error("item already present in queue `{queue}`")]
    DuplicateEntry { queue: &'static str },

    #[error("{0} is not in the process arena")]
    MissingProcess(ProcessId),

    #[error("world invariant violated: {0}")]
    Invariant(String),
}

pub type KernelResult<T> = Result<T, KernelError>;
