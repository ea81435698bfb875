//! The formula tree (C2's Result record, plus the node variants from
//! `spec.md` §3).
//!
//! The source relies on every node starting with a common header so an
//! opaque pointer can be reinterpreted as a Result record (`spec.md`
//! §9, "Polymorphism via a common header"). Here that contract is
//! expressed as a tagged union instead: [`FormulaNode`] is an enum
//! whose variants each embed an [`EvalResult`] as their first field,
//! and [`FormulaNode::result`]/[`FormulaNode::result_mut`] dispatch to
//! it. No pointer is ever reinterpreted.
//!
//! A probabilistic operator (Next/Until/LongSteady/PureReward) only
//! ever appears wrapped in a [`ComparatorNode`] — mirroring how PCTL/CSL
//! formulas are written (`P_{⋈p}[...]`): the threshold is syntactically
//! the parent of the probabilistic subformula, so there is no need for
//! the back-pointer the source keeps from the probabilistic node up to
//! its enclosing comparator.

use crate::bitset::StateSet;
use crate::error::EvalError;
use mc_common::ComparatorOp;

/// Per-node evaluation outputs (`spec.md` §3's Result record, C2).
#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    /// Satisfying states. Populated for every node once evaluation has
    /// reached it (invariant P1), except the CTMDPI degenerate case.
    pub yes_set: Option<StateSet>,
    /// Definitely-not-satisfying states; present only in two-set mode
    /// (`sim_here || sim_below`).
    pub no_set: Option<StateSet>,
    /// Probability or reward vector, length `size`.
    pub prob_reward: Option<Vec<f64>>,
    /// Length of `prob_reward` (and of `error_per_state`, when present).
    pub size: usize,
    /// Uniform error bound covering every state in `prob_reward`.
    pub error_scalar: f64,
    /// Per-state error, present only for time-/reward-bounded Until.
    pub error_per_state: Option<Vec<f64>>,
    /// Per-state confidence-interval bounds (statistical mode).
    pub ci_left: Option<Vec<f64>>,
    pub ci_right: Option<Vec<f64>>,
    /// Maximum number of statistical observations actually used.
    pub max_obs: Option<u64>,
    /// This node itself was evaluated statistically.
    pub sim_here: bool,
    /// Some descendant of this node was evaluated statistically.
    pub sim_below: bool,
    /// Confidence level requested of the statistical engine.
    pub confidence: Option<f64>,
    /// Restricts statistical evaluation to a single initial state.
    pub initial_state: Option<usize>,
    pub one_init_state: bool,
    /// Recoverable errors raised while evaluating this node or any of
    /// its descendants — currently only [`EvalError::ModeMismatch`]
    /// (`spec.md` §7.2, `SPEC_FULL.md` §7's "Result's ... diagnostic
    /// sink"). The walker accumulates a child's diagnostics into its
    /// parent's as it ascends, so the root's `diagnostics` is the full,
    /// programmatically-inspectable error count for the whole tree.
    pub diagnostics: Vec<EvalError>,
}

impl EvalResult {
    /// A fresh, empty record; `size` is filled in once the evaluator
    /// knows the result's vector length.
    pub fn new() -> Self {
        EvalResult::default()
    }

    /// `sim_here || sim_below` — whether this node's subtree used
    /// statistical evaluation anywhere (`spec.md` §3 invariant 4).
    pub fn is_two_set(&self) -> bool {
        self.sim_here || self.sim_below
    }

    /// Copies `child`'s diagnostics into this result, preserving
    /// whatever this node has already recorded of its own.
    pub fn adopt_diagnostics(&mut self, child: &EvalResult) {
        self.diagnostics.extend(child.diagnostics.iter().cloned());
    }
}

/// Kind tag for [`AtomicNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicKind {
    Tt,
    Ff,
}

/// `TRUE` / `FALSE` / `AP(label)` (`spec.md` §3, §4.2).
#[derive(Debug, Clone)]
pub struct AtomicNode {
    pub result: EvalResult,
    pub kind: AtomicKind,
}

/// An atomic proposition: a label name evaluated via the labeling
/// service. Kept distinct from [`AtomicKind`] since it carries owned
/// data the TT/FF cases don't need.
#[derive(Debug, Clone)]
pub struct ApNode {
    pub result: EvalResult,
    pub label: String,
}

/// Either a structural atomic (`TT`/`FF`) or a named proposition.
#[derive(Debug, Clone)]
pub enum Atomic {
    Structural(AtomicNode),
    Ap(ApNode),
}

/// Kind tag for [`UnaryBoolNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryBoolKind {
    Neg,
    Paren,
}

/// `NEG` / `PAREN`, one child (`spec.md` §3, §4.3).
#[derive(Debug, Clone)]
pub struct UnaryBoolNode {
    pub result: EvalResult,
    pub kind: UnaryBoolKind,
    pub child: Box<FormulaNode>,
}

/// Kind tag for [`BinaryBoolNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryBoolKind {
    And,
    Or,
    Implies,
}

/// `AND` / `OR` / `IMPLIES`, two children (`spec.md` §3, §4.3).
#[derive(Debug, Clone)]
pub struct BinaryBoolNode {
    pub result: EvalResult,
    pub kind: BinaryBoolKind,
    pub left: Box<FormulaNode>,
    pub right: Box<FormulaNode>,
}

/// Time and/or reward bounds shared by Next/Until variants.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub t1: Option<f64>,
    pub t2: Option<f64>,
    pub r1: Option<f64>,
    pub r2: Option<f64>,
}

/// Kind tag for [`NextNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextKind {
    Unb,
    Time,
    TimeReward,
}

/// `X`/Next operator, one child (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct NextNode {
    pub result: EvalResult,
    pub kind: NextKind,
    pub child: Box<FormulaNode>,
    pub bounds: Bounds,
}

/// Kind tag for [`UntilNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntilKind {
    Unb,
    Time,
    TimeReward,
}

/// `Φ U Ψ`, two children (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct UntilNode {
    pub result: EvalResult,
    pub kind: UntilKind,
    pub phi: Box<FormulaNode>,
    pub psi: Box<FormulaNode>,
    pub bounds: Bounds,
}

/// Kind tag for [`LongSteadyNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongSteadyKind {
    LongRun,
    SteadyState,
}

/// `L`/`S`, one child (`spec.md` §3).
#[derive(Debug, Clone)]
pub struct LongSteadyNode {
    pub result: EvalResult,
    pub kind: LongSteadyKind,
    pub child: Box<FormulaNode>,
}

/// Kind tag for [`PureRewardNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PureRewardKind {
    ExpectedRr,
    InstantR,
    ExpectedAr,
}

/// `E`/`C`/`Y`, one child, carries an epoch (`spec.md` §3; epoch 0
/// means long-run rate for `E`).
#[derive(Debug, Clone)]
pub struct PureRewardNode {
    pub result: EvalResult,
    pub kind: PureRewardKind,
    pub child: Box<FormulaNode>,
    pub epoch: u64,
}

/// A probabilistic sub-operator, always wrapped by a [`ComparatorNode`].
#[derive(Debug, Clone)]
pub enum ProbabilisticNode {
    Next(NextNode),
    Until(UntilNode),
    LongSteady(LongSteadyNode),
    PureReward(PureRewardNode),
}

impl ProbabilisticNode {
    pub fn result(&self) -> &EvalResult {
        match self {
            ProbabilisticNode::Next(n) => &n.result,
            ProbabilisticNode::Until(n) => &n.result,
            ProbabilisticNode::LongSteady(n) => &n.result,
            ProbabilisticNode::PureReward(n) => &n.result,
        }
    }

    pub fn result_mut(&mut self) -> &mut EvalResult {
        match self {
            ProbabilisticNode::Next(n) => &mut n.result,
            ProbabilisticNode::Until(n) => &mut n.result,
            ProbabilisticNode::LongSteady(n) => &mut n.result,
            ProbabilisticNode::PureReward(n) => &mut n.result,
        }
    }

    /// Whether this operator's vector holds probabilities in `[0, 1]`
    /// (the comparator's exact-endpoint exception applies) as opposed
    /// to unconstrained reward values (`spec.md` §3 invariant 6).
    pub fn is_probability(&self) -> bool {
        !matches!(self, ProbabilisticNode::PureReward(_))
    }

    /// A short name for error messages and logging.
    pub fn operator_name(&self) -> &'static str {
        match self {
            ProbabilisticNode::Next(n) => match n.kind {
                NextKind::Unb => "next",
                NextKind::Time => "next_time",
                NextKind::TimeReward => "next_rewards",
            },
            ProbabilisticNode::Until(n) => match n.kind {
                UntilKind::Unb => "until",
                UntilKind::Time => "until_time",
                UntilKind::TimeReward => "until_rewards",
            },
            ProbabilisticNode::LongSteady(n) => match n.kind {
                LongSteadyKind::LongRun => "long_run",
                LongSteadyKind::SteadyState => "steady_state",
            },
            ProbabilisticNode::PureReward(n) => match n.kind {
                PureRewardKind::ExpectedRr => "E",
                PureRewardKind::InstantR => "C",
                PureRewardKind::ExpectedAr => "Y",
            },
        }
    }
}

/// Wraps a probabilistic sub-operator in a threshold comparison
/// (`spec.md` §3, §4.4).
#[derive(Debug, Clone)]
pub struct ComparatorNode {
    pub result: EvalResult,
    pub op: ComparatorOp,
    pub bound_left: f64,
    pub bound_right: Option<f64>,
    pub inner: Box<ProbabilisticNode>,
    /// Whether the formula requests statistical (simulation-based)
    /// evaluation of `inner`, when the run mode and operator support
    /// it. This corresponds to the statistical-vs-numerical syntax
    /// distinction made upstream by the (out-of-scope) formula parser.
    pub want_statistical: bool,
    /// Restricts statistical evaluation to a single initial state.
    pub initial_state: usize,
    pub one_init_state: bool,
}

/// A node in the PCTL/CSL/PRCTL/CSRL formula tree.
#[derive(Debug, Clone)]
pub enum FormulaNode {
    Atomic(Atomic),
    UnaryBool(UnaryBoolNode),
    BinaryBool(BinaryBoolNode),
    Comparator(ComparatorNode),
}

impl FormulaNode {
    /// A reference to this node's embedded Result record, regardless
    /// of variant — the "common header" contract, implemented without
    /// any unsafe pointer reinterpretation.
    pub fn result(&self) -> &EvalResult {
        match self {
            FormulaNode::Atomic(Atomic::Structural(n)) => &n.result,
            FormulaNode::Atomic(Atomic::Ap(n)) => &n.result,
            FormulaNode::UnaryBool(n) => &n.result,
            FormulaNode::BinaryBool(n) => &n.result,
            FormulaNode::Comparator(n) => &n.result,
        }
    }

    pub fn result_mut(&mut self) -> &mut EvalResult {
        match self {
            FormulaNode::Atomic(Atomic::Structural(n)) => &mut n.result,
            FormulaNode::Atomic(Atomic::Ap(n)) => &mut n.result,
            FormulaNode::UnaryBool(n) => &mut n.result,
            FormulaNode::BinaryBool(n) => &mut n.result,
            FormulaNode::Comparator(n) => &mut n.result,
        }
    }

    pub fn tt() -> Self {
        FormulaNode::Atomic(Atomic::Structural(AtomicNode {
            result: EvalResult::new(),
            kind: AtomicKind::Tt,
        }))
    }

    pub fn ff() -> Self {
        FormulaNode::Atomic(Atomic::Structural(AtomicNode {
            result: EvalResult::new(),
            kind: AtomicKind::Ff,
        }))
    }

    pub fn ap(label: impl Into<String>) -> Self {
        FormulaNode::Atomic(Atomic::Ap(ApNode {
            result: EvalResult::new(),
            label: label.into(),
        }))
    }

    pub fn neg(child: FormulaNode) -> Self {
        FormulaNode::UnaryBool(UnaryBoolNode {
            result: EvalResult::new(),
            kind: UnaryBoolKind::Neg,
            child: Box::new(child),
        })
    }

    pub fn paren(child: FormulaNode) -> Self {
        FormulaNode::UnaryBool(UnaryBoolNode {
            result: EvalResult::new(),
            kind: UnaryBoolKind::Paren,
            child: Box::new(child),
        })
    }

    pub fn and(left: FormulaNode, right: FormulaNode) -> Self {
        FormulaNode::BinaryBool(BinaryBoolNode {
            result: EvalResult::new(),
            kind: BinaryBoolKind::And,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn or(left: FormulaNode, right: FormulaNode) -> Self {
        FormulaNode::BinaryBool(BinaryBoolNode {
            result: EvalResult::new(),
            kind: BinaryBoolKind::Or,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn implies(left: FormulaNode, right: FormulaNode) -> Self {
        FormulaNode::BinaryBool(BinaryBoolNode {
            result: EvalResult::new(),
            kind: BinaryBoolKind::Implies,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}
