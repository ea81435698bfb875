//! Small shared types threaded between `mc-config` and `mc-core`.
//!
//! These mirror the model classes and comparator syntax used throughout
//! the PCTL/CSL/PRCTL/CSRL logic families: the run mode selects which
//! probabilistic operators are valid (see `mc-core`'s dispatcher), and
//! the comparator operator selects how a probability/reward vector is
//! folded into a yes-set.

use serde::{Deserialize, Serialize};

/// The model class a formula is being checked against.
///
/// Determines which probabilistic operators are valid (`mc-core`'s
/// run-mode validity matrix) and which state count (`n` vs. the
/// CTMDPI-specific `mdpi_n`) a result vector is sized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Discrete-time Markov chain.
    Dtmc,
    /// Continuous-time Markov chain.
    Ctmc,
    /// Discrete-time Markov reward model.
    Dmrm,
    /// Continuous-time Markov reward model.
    Cmrm,
    /// Continuous-time Markov decision process with internal nondeterminism.
    Ctmdpi,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunMode::Dtmc => "DTMC",
            RunMode::Ctmc => "CTMC",
            RunMode::Dmrm => "DMRM",
            RunMode::Cmrm => "CMRM",
            RunMode::Ctmdpi => "CTMDPI",
        };
        write!(f, "{s}")
    }
}

impl RunMode {
    /// Whether this run mode carries reward information (DMRM/CMRM).
    pub fn is_reward_model(&self) -> bool {
        matches!(self, RunMode::Dmrm | RunMode::Cmrm)
    }

    /// Whether this run mode is continuous-time (CTMC/CMRM/CTMDPI).
    pub fn is_continuous_time(&self) -> bool {
        matches!(self, RunMode::Ctmc | RunMode::Cmrm | RunMode::Ctmdpi)
    }
}

/// Which reachability strategy the statistical engine uses for
/// steady-state / long-run simulation (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SteadyStateMode {
    /// Reachability to accepting BSCCs is obtained numerically.
    Hybrid,
    /// Reachability to accepting BSCCs is obtained statistically.
    Pure,
}

impl std::fmt::Display for SteadyStateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SteadyStateMode::Hybrid => write!(f, "hybrid"),
            SteadyStateMode::Pure => write!(f, "pure"),
        }
    }
}

/// Comparator operators used by a `Comparator` node to fold a
/// probability/reward vector into a yes-set (`spec.md` §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorOp {
    /// `v[i] > bound`.
    Greater,
    /// `v[i] >= bound`.
    GreaterOrEqual,
    /// `v[i] < bound`.
    Less,
    /// `v[i] <= bound`.
    LessOrEqual,
    /// `bound_left <= v[i] <= bound_right`.
    Interval,
}

impl std::fmt::Display for ComparatorOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComparatorOp::Greater => ">",
            ComparatorOp::GreaterOrEqual => ">=",
            ComparatorOp::Less => "<",
            ComparatorOp::LessOrEqual => "<=",
            ComparatorOp::Interval => "interval",
        };
        write!(f, "{s}")
    }
}

impl ComparatorOp {
    /// Whether this comparator takes a single bound (as opposed to
    /// `Interval`, which takes two).
    pub fn is_single_bound(&self) -> bool {
        !matches!(self, ComparatorOp::Interval)
    }
}
