//! Post-order formula-tree evaluator for PCTL/CSL/PRCTL/CSRL model
//! checking.
//!
//! This crate is the **evaluator and result combinator**: given a
//! formula tree built from [`node::FormulaNode`], [`walker::evaluate`]
//! walks it once, post-order, producing for every node a satisfying
//! state set and, for probabilistic operators, a probability or reward
//! vector with its numerical error bound. Numerical kernels,
//! statistical (simulation-based) engines, and the labeling service are
//! named external collaborators — consumed here only as the
//! [`traits::Kernels`], [`traits::StatisticalEngine`], and
//! [`traits::Labeling`] traits, so this crate has no dependency on any
//! particular bitset/matrix/model-file stack.
//!
//! ```
//! use mc_common::{ComparatorOp, RunMode, SteadyStateMode};
//! use mc_config::EvalContext;
//!
//! let ctx = EvalContext::new(RunMode::Dtmc, 4, 1e-6, 0.95, SteadyStateMode::Hybrid, None)
//!     .expect("valid context");
//! assert_eq!(ctx.n(), 4);
//! ```

pub mod atomic;
pub mod bitset;
pub mod boolean;
pub mod comparator;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod node;
pub mod traits;
pub mod walker;

pub use bitset::StateSet;
pub use error::{EvalError, Result};
pub use node::{EvalResult, FormulaNode};
pub use walker::{evaluate, Collaborators};
