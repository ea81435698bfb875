//! Errors raised while evaluating a formula tree.
//!
//! Mirrors the source's two-tier error handling: most variants here are
//! fatal (an invariant of the tagged-union tree design was violated, or
//! an external kernel returned nothing) and are expected to abort the
//! whole evaluation. [`EvalError::ModeMismatch`] is the sole recoverable
//! variant: the dispatcher logs it and installs a degraded zero vector
//! instead of bubbling it up, so the walker can keep descending the
//! tree (`spec.md` §7.2, §9 "Degraded-on-mode-mismatch behavior").

use mc_common::RunMode;
use thiserror::Error;

/// Errors raised by the formula-tree evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A node required a child that was absent (malformed tree).
    #[error("{node} node is missing a required child")]
    NullChild { node: &'static str },

    /// A variant's kind tag did not match any case the evaluator knows.
    #[error("{node} node carries an unknown kind tag {tag}")]
    UnknownNodeKind { node: &'static str, tag: i64 },

    /// A two-set (statistical) Boolean node was reached where neither
    /// child had been evaluated statistically (`spec.md` §4.3
    /// precondition `simL ∨ simR`).
    #[error("{node} entered two-set mode but neither child was simulated")]
    TwoSetNeitherChildSimulated { node: &'static str },

    /// A probabilistic operator is not defined for the current run
    /// mode (`spec.md` §4.5's run-mode validity matrix). Recoverable:
    /// the dispatcher installs a zero vector and evaluation continues.
    #[error("operator {operator} is not valid in run mode {run_mode}")]
    ModeMismatch {
        operator: &'static str,
        run_mode: RunMode,
    },

    /// A numerical kernel returned no result (the source's null-vector
    /// sentinel). Fatal, carrying the contextual parameters the spec
    /// requires for the error message (`spec.md` §4.8, §7.3).
    #[error("kernel for {operator} failed (size={size}, bounds={bounds})")]
    KernelFailure {
        operator: &'static str,
        size: usize,
        bounds: String,
    },
}

impl EvalError {
    /// Whether this error is recoverable (the walker may continue past
    /// it) or fatal (the whole evaluation must abort).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EvalError::ModeMismatch { .. })
    }
}

/// Result alias for evaluator operations.
pub type Result<T> = std::result::Result<T, EvalError>;
