use ed_core::CoreError;
use ed_kernel::KernelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Core(#[from] CoreError),

    #[error("simulation aborted: {0}")]
    Kernel(#[from] KernelError),
}

pub type SimResult<T> = Result<T, SimError>;
