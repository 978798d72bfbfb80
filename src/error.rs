//! Error type shared by the engine and problem bindings.

use thiserror::Error;

/// Errors surfaced by the GA engine.
///
/// `TypeMismatch` and `InvalidState` are produced by [`Individual`]
/// implementations and travel through the engine unchanged.
///
/// [`Individual`]: crate::ga::Individual
#[derive(Debug, Error)]
pub enum GaError {
    /// A rate, threshold or size is out of range, or an epoch would have
    /// to breed from a parent pool that is too small.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// `breed` was called with an incompatible individual.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Fitness could not be computed from the individual's state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Reading or writing a problem instance failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;

impl GaError {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        GaError::InvalidParameter(msg.into())
    }
}
