//! The runtime context threaded through the formula evaluator.
//!
//! `spec.md` §9 (Design Notes) explicitly calls out that the source
//! MRMC implementation reads run mode, error bound, confidence, and the
//! simulation-mode flag from process-wide globals, and recommends that
//! a Rust rewrite instead form "an explicit context value threaded
//! through the walker; kernels and statistical engines take this
//! context as an argument." `EvalContext` is that value.
//!
//! It is built with a small validating constructor rather than public
//! field assignment so an evaluator can never observe an
//! out-of-range `error_bound` or `confidence`.

use mc_common::{RunMode, SteadyStateMode};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Shared, read-only state for one formula evaluation.
///
/// Cheap to clone (all fields are `Copy`); the evaluator takes this by
/// shared reference (`spec.md` §5: kernels and statistical engines are
/// read-only consumers of this state, save for the RNG, which lives
/// outside this crate entirely).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalContext {
    run_mode: RunMode,
    error_bound: f64,
    confidence: f64,
    sim_steady_state_mode: SteadyStateMode,
    n: usize,
    mdpi_n: Option<usize>,
}

impl EvalContext {
    /// Builds a new context, validating every field.
    ///
    /// `mdpi_n` must be `Some` and non-zero when `run_mode` is
    /// [`RunMode::Ctmdpi`]; it is ignored (but may still be `Some`, for
    /// a caller that precomputes it speculatively) in every other mode.
    pub fn new(
        run_mode: RunMode,
        n: usize,
        error_bound: f64,
        confidence: f64,
        sim_steady_state_mode: SteadyStateMode,
        mdpi_n: Option<usize>,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&error_bound) || error_bound.is_nan() {
            return Err(ConfigError::InvalidErrorBound { value: error_bound });
        }
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ConfigError::InvalidConfidence { value: confidence });
        }
        if n == 0 {
            return Err(ConfigError::ZeroStates);
        }
        match (run_mode, mdpi_n) {
            (RunMode::Ctmdpi, None) => return Err(ConfigError::MissingMdpiStateCount),
            (_, Some(0)) => return Err(ConfigError::ZeroMdpiStates),
            _ => {}
        }

        Ok(EvalContext {
            run_mode,
            error_bound,
            confidence,
            sim_steady_state_mode,
            n,
            mdpi_n,
        })
    }

    /// The model class this evaluation is checked against.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// The conservative uniform numerical error bound applied at every
    /// probabilistic node (`spec.md` §9: "the rewrite should keep the
    /// same conservative behavior ... and document the limitation").
    pub fn error_bound(&self) -> f64 {
        self.error_bound
    }

    /// The confidence level requested of statistical engines.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Which steady-state simulation strategy to use when a
    /// steady-state/long-run node is evaluated statistically.
    pub fn sim_steady_state_mode(&self) -> SteadyStateMode {
        self.sim_steady_state_mode
    }

    /// The number of states in the (non-CTMDPI) state space.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The number of states in the CTMDPI state space, if this context
    /// was built for one.
    pub fn mdpi_n(&self) -> Option<usize> {
        self.mdpi_n
    }

    /// The vector length a probabilistic operator's result should use:
    /// `mdpi_n` in CTMDPI mode, `n` otherwise.
    pub fn result_size(&self) -> usize {
        if self.run_mode == RunMode::Ctmdpi {
            self.mdpi_n.unwrap_or(self.n)
        } else {
            self.n
        }
    }

    /// Returns a copy of this context with a different run mode.
    ///
    /// Useful for tests that want to exercise the dispatcher across
    /// several run modes against the same state count.
    pub fn with_run_mode(mut self, run_mode: RunMode) -> Result<Self> {
        self.run_mode = run_mode;
        if run_mode == RunMode::Ctmdpi && self.mdpi_n.is_none() {
            return Err(ConfigError::MissingMdpiStateCount);
        }
        Ok(self)
    }
}
