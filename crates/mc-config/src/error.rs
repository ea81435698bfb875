//! Validation errors for [`crate::EvalContext`] construction.

use thiserror::Error;

/// Errors raised while building or validating an [`crate::EvalContext`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("error_bound must be within [0, 1], got {value}")]
    InvalidErrorBound { value: f64 },

    #[error("confidence must be within (0, 1), got {value}")]
    InvalidConfidence { value: f64 },

    #[error("state count n must be greater than zero")]
    ZeroStates,

    #[error("run mode CTMDPI requires an MDPI state count, but none was set")]
    MissingMdpiStateCount,

    #[error("MDPI state count must be greater than zero when set")]
    ZeroMdpiStates,
}

/// Result alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
