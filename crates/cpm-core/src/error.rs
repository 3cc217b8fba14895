//! Model error type.
//!
//! Sub-crates define their own error enums and wrap `CpmError` as one
//! variant via `#[from]`, so `?` works across crate boundaries.

use thiserror::Error;

use crate::Demographic;

/// The base error type for `cpm-core` and the crates built on it.
#[derive(Debug, Error)]
pub enum CpmError {
    /// A demographic name that matches none of the known variants.
    #[error("unknown demographic '{0}'")]
    UnknownDemographic(String),

    /// A valid demographic that the active registry does not contain.
    #[error("demographic {0} is not registered in this model")]
    UnregisteredDemographic(Demographic),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `cpm-*` crates.
pub type CpmResult<T> = Result<T, CpmError>;
