//! External collaborators, expressed as traits (`spec.md` §6).
//!
//! The evaluator never links against a concrete numerical or
//! statistical backend; it is generic over these three traits so the
//! crate is self-contained, testable with fakes, and so a caller can
//! plug in whatever bitset/matrix/label-file stack they already have.

use crate::bitset::StateSet;
use mc_common::{ComparatorOp, SteadyStateMode};

/// The labeling service: state count and per-label state sets.
pub trait Labeling {
    /// Number of states in the (non-CTMDPI) state space.
    fn n(&self) -> usize;

    /// The states satisfying label `name`, or `None` if the label is
    /// not known (`spec.md` §4.2 — unknown label is silent).
    fn label_bitset(&self, name: &str) -> Option<StateSet>;
}

/// The numerical kernels (`spec.md` §6). Each returns `Err` where the
/// source would have returned a null vector — the fatal
/// [`crate::error::EvalError::KernelFailure`] case.
pub trait Kernels {
    /// Time-unbounded or time-interval until, `Φ U Ψ` (optionally with
    /// reward bounds folded in by the caller via `until_rewards`).
    #[allow(clippy::too_many_arguments)]
    fn until(
        &self,
        phi: &StateSet,
        psi: &StateSet,
        t1: Option<f64>,
        t2: Option<f64>,
        extra_lump: bool,
    ) -> Result<Vec<f64>, KernelError>;

    /// `Φ U[r1,r2] Ψ` with reward bounds; also returns per-state error.
    #[allow(clippy::too_many_arguments)]
    fn until_rewards(
        &self,
        phi: &StateSet,
        psi: &StateSet,
        t1: Option<f64>,
        t2: Option<f64>,
        r1: f64,
        r2: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), KernelError>;

    /// Next-step operator, optionally time- or reward-bounded.
    fn next(
        &self,
        phi: &StateSet,
        t1: Option<f64>,
        t2: Option<f64>,
    ) -> Result<Vec<f64>, KernelError>;

    /// Reward-bounded next-step operator.
    fn next_rewards(
        &self,
        phi: &StateSet,
        t1: Option<f64>,
        t2: Option<f64>,
        r1: f64,
        r2: f64,
    ) -> Result<Vec<f64>, KernelError>;

    /// Steady-state / long-run distribution restricted to `phi`.
    fn steady(&self, phi: &StateSet) -> Result<Vec<f64>, KernelError>;

    /// Expected accumulated reward up to `epoch` (`E`, epoch 0 = long-run rate).
    fn ef(&self, epoch: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError>;

    /// Instantaneous reward at `epoch` (`C`).
    fn cf(&self, epoch: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError>;

    /// Expected average reward up to `epoch` (`Y`).
    fn yf(&self, epoch: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError>;
}

/// A numerical kernel returned no result (the source's null-vector
/// sentinel). Carries the same contextual detail `EvalError::KernelFailure`
/// needs to report (`spec.md` §4.8).
#[derive(Debug, Clone, PartialEq)]
pub struct KernelError {
    pub size: usize,
    pub bounds: String,
}

/// The output of a statistical engine invocation (`spec.md` §6): a
/// two-set yes/no decision plus confidence-interval bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticalOutcome {
    pub yes: StateSet,
    pub no: StateSet,
    pub ci_left: Vec<f64>,
    pub ci_right: Vec<f64>,
    pub max_obs: u64,
}

/// Statistical (simulation-based) engines for Until and Steady-state
/// (`spec.md` §6, §4.5).
pub trait StatisticalEngine {
    /// Unbounded Until, simulated.
    #[allow(clippy::too_many_arguments)]
    fn model_check_unbounded_until(
        &self,
        phi: &StateSet,
        psi: &StateSet,
        confidence: f64,
        op: ComparatorOp,
        bound_left: f64,
        bound_right: Option<f64>,
        initial_state: usize,
        one_init_state: bool,
    ) -> Result<StatisticalOutcome, KernelError>;

    /// Time-interval Until, simulated.
    #[allow(clippy::too_many_arguments)]
    fn model_check_time_interval_until(
        &self,
        phi: &StateSet,
        psi: &StateSet,
        t1: f64,
        t2: f64,
        confidence: f64,
        op: ComparatorOp,
        bound_left: f64,
        bound_right: Option<f64>,
        initial_state: usize,
        one_init_state: bool,
    ) -> Result<StatisticalOutcome, KernelError>;

    /// Steady-state, hybrid mode: reachability to accepting BSCCs is
    /// obtained from the numerical `until` kernel.
    #[allow(clippy::too_many_arguments)]
    fn model_check_steady_state_hybrid(
        &self,
        phi: &StateSet,
        confidence: f64,
        op: ComparatorOp,
        bound_left: f64,
        bound_right: Option<f64>,
        initial_state: usize,
        one_init_state: bool,
    ) -> Result<StatisticalOutcome, KernelError>;

    /// Steady-state, pure mode: reachability is itself obtained
    /// statistically.
    #[allow(clippy::too_many_arguments)]
    fn model_check_steady_state_pure(
        &self,
        phi: &StateSet,
        confidence: f64,
        op: ComparatorOp,
        bound_left: f64,
        bound_right: Option<f64>,
        initial_state: usize,
        one_init_state: bool,
    ) -> Result<StatisticalOutcome, KernelError>;
}

/// Picks which [`StatisticalEngine`] method to call for a steady-state
/// node, given the configured strategy (`spec.md` §4.5).
pub fn steady_state_variant(mode: SteadyStateMode) -> &'static str {
    match mode {
        SteadyStateMode::Hybrid => "hybrid",
        SteadyStateMode::Pure => "pure",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_state_variant_names() {
        assert_eq!(steady_state_variant(SteadyStateMode::Hybrid), "hybrid");
        assert_eq!(steady_state_variant(SteadyStateMode::Pure), "pure");
    }
}
