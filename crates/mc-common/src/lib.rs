//! Shared types for the mc-core model-checker workspace.
//!
//! This crate deliberately holds nothing beyond the handful of small,
//! `Copy` enums that both `mc-config` (runtime context) and `mc-core`
//! (the evaluator) need to agree on: the model class a formula is
//! checked against, and the comparator syntax used to fold a
//! probability/reward vector into a yes-set.

mod types;

pub use types::{ComparatorOp, RunMode, SteadyStateMode};
