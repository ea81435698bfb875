//! Runtime context construction for the mc-core model checker.
//!
//! `mc-core`'s evaluator never touches globals: every evaluation is
//! given an [`EvalContext`] up front (run mode, error bound,
//! confidence, steady-state simulation strategy, state counts), and
//! every numerical/statistical collaborator it calls takes that same
//! context as an explicit argument.

mod context;
mod error;

pub use context::EvalContext;
pub use error::{ConfigError, Result};
