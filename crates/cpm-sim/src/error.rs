use cpm_core::CpmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CpmError),
}

pub type SimResult<T> = Result<T, SimError>;
