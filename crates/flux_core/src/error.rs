//! Motion error types

use thiserror::Error;

/// Errors raised by motion handles and the engine entry points
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// The motion value was released (directly or through its owner)
    #[error("motion value has been released")]
    Released,

    /// The container was never mounted or has been unmounted
    #[error("container is not mounted")]
    UnknownContainer,

    /// The effect handle does not refer to a live effect
    #[error("effect has been detached or never existed")]
    UnknownEffect,

    /// The effect exists but is of a different kind than requested
    #[error("effect kind mismatch: expected {expected}")]
    EffectMismatch { expected: &'static str },

    /// Effect parameters the fields cannot work with
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: &'static str },
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
