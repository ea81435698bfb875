//! Tree walker (C7): single post-order pass invoking the atomic
//! evaluator, Boolean combinator, comparator folder, and probabilistic
//! dispatcher at the matching node types (`spec.md` §4.6).
//!
//! The walker threads `sim_here`/`sim_below` upward as it ascends so
//! parents can pick the two-set or one-set Boolean path without
//! re-inspecting descendants (`spec.md` §3 invariant 4).

use mc_config::EvalContext;
use tracing::instrument;

use crate::atomic;
use crate::boolean;
use crate::comparator;
use crate::dispatch::{self, StatContext};
use crate::error::Result;
use crate::node::{Atomic, BinaryBoolNode, ComparatorNode, FormulaNode, ProbabilisticNode, UnaryBoolNode};
use crate::traits::{Kernels, Labeling, StatisticalEngine};

/// The external collaborators a full evaluation needs, bundled so
/// [`evaluate`] doesn't take four separate trait-object parameters at
/// every call site.
pub struct Collaborators<'a> {
    pub labeling: &'a dyn Labeling,
    pub kernels: &'a dyn Kernels,
    pub stats: &'a dyn StatisticalEngine,
}

/// Evaluates `node` and its entire subtree in a single post-order
/// pass, using `ctx` for run-mode/error-bound/confidence and `collab`
/// for the labeling/kernel/statistical-engine collaborators.
#[instrument(skip_all, fields(n = ctx.n()))]
pub fn evaluate(node: &mut FormulaNode, ctx: &EvalContext, collab: &Collaborators<'_>) -> Result<()> {
    match node {
        FormulaNode::Atomic(atomic) => evaluate_atomic(atomic, collab.labeling),
        FormulaNode::UnaryBool(n) => evaluate_unary(n, ctx, collab),
        FormulaNode::BinaryBool(n) => evaluate_binary(n, ctx, collab),
        FormulaNode::Comparator(n) => evaluate_comparator(n, ctx, collab),
    }
}

fn evaluate_atomic(atomic: &mut Atomic, labeling: &dyn Labeling) -> Result<()> {
    let yes = self::atomic::evaluate(atomic, labeling);
    let result = match atomic {
        Atomic::Structural(n) => &mut n.result,
        Atomic::Ap(n) => &mut n.result,
    };
    result.size = yes.size();
    result.yes_set = Some(yes);
    result.sim_here = false;
    result.sim_below = false;
    Ok(())
}

fn evaluate_unary(node: &mut UnaryBoolNode, ctx: &EvalContext, collab: &Collaborators<'_>) -> Result<()> {
    evaluate(&mut node.child, ctx, collab)?;
    let combined = boolean::evaluate_unary(node.kind, node.child.result())?;
    node.result.size = combined.yes.size();
    node.result.yes_set = Some(combined.yes);
    node.result.no_set = combined.no;
    node.result.sim_here = false;
    node.result.sim_below = combined.sim_below;
    node.result.adopt_diagnostics(node.child.result());
    Ok(())
}

fn evaluate_binary(node: &mut BinaryBoolNode, ctx: &EvalContext, collab: &Collaborators<'_>) -> Result<()> {
    evaluate(&mut node.left, ctx, collab)?;
    evaluate(&mut node.right, ctx, collab)?;
    let combined = boolean::evaluate_binary(node.kind, node.left.result(), node.right.result())?;
    node.result.size = combined.yes.size();
    node.result.yes_set = Some(combined.yes);
    node.result.no_set = combined.no;
    node.result.sim_here = false;
    node.result.sim_below = combined.sim_below;
    node.result.adopt_diagnostics(node.left.result());
    node.result.adopt_diagnostics(node.right.result());
    Ok(())
}

fn evaluate_probabilistic(
    inner: &mut ProbabilisticNode,
    ctx: &EvalContext,
    collab: &Collaborators<'_>,
    stat_ctx: StatContext,
    want_statistical: bool,
) -> Result<()> {
    match inner {
        ProbabilisticNode::Next(n) => {
            evaluate(&mut n.child, ctx, collab)?;
            n.result.yes_set = n.child.result().yes_set.clone();
            n.result.adopt_diagnostics(n.child.result());
            dispatch::dispatch_next(n, ctx, collab.kernels)
        }
        ProbabilisticNode::Until(n) => {
            evaluate(&mut n.phi, ctx, collab)?;
            evaluate(&mut n.psi, ctx, collab)?;
            n.result.adopt_diagnostics(n.phi.result());
            n.result.adopt_diagnostics(n.psi.result());
            dispatch::dispatch_until(n, ctx, collab.kernels, collab.stats, stat_ctx, want_statistical)
        }
        ProbabilisticNode::LongSteady(n) => {
            evaluate(&mut n.child, ctx, collab)?;
            n.result.yes_set = n.child.result().yes_set.clone();
            n.result.adopt_diagnostics(n.child.result());
            dispatch::dispatch_long_steady(n, ctx, collab.kernels, collab.stats, stat_ctx, want_statistical)
        }
        ProbabilisticNode::PureReward(n) => {
            evaluate(&mut n.child, ctx, collab)?;
            n.result.yes_set = n.child.result().yes_set.clone();
            n.result.adopt_diagnostics(n.child.result());
            dispatch::dispatch_pure_reward(n, ctx, collab.kernels)
        }
    }
}

fn evaluate_comparator(node: &mut ComparatorNode, ctx: &EvalContext, collab: &Collaborators<'_>) -> Result<()> {
    let stat_ctx = StatContext {
        op: node.op,
        bound_left: node.bound_left,
        bound_right: node.bound_right,
        initial_state: node.initial_state,
        one_init_state: node.one_init_state,
    };
    evaluate_probabilistic(&mut node.inner, ctx, collab, stat_ctx, node.want_statistical)?;
    comparator::evaluate(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::StateSet;
    use crate::node::{Bounds, EvalResult, NextKind, NextNode, UntilKind, UntilNode};
    use crate::traits::KernelError;
    use mc_common::{ComparatorOp, RunMode, SteadyStateMode};

    struct FakeLabeling {
        n: usize,
        labels: Vec<(&'static str, Vec<usize>)>,
    }
    impl Labeling for FakeLabeling {
        fn n(&self) -> usize {
            self.n
        }
        fn label_bitset(&self, name: &str) -> Option<StateSet> {
            self.labels
                .iter()
                .find(|(l, _)| *l == name)
                .map(|(_, s)| StateSet::from_indices(self.n, s.iter().copied()))
        }
    }

    struct FakeKernels;
    impl Kernels for FakeKernels {
        fn until(&self, phi: &StateSet, _psi: &StateSet, _t1: Option<f64>, _t2: Option<f64>, _extra_lump: bool) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn until_rewards(&self, phi: &StateSet, _psi: &StateSet, _t1: Option<f64>, _t2: Option<f64>, _r1: f64, _r2: f64) -> std::result::Result<(Vec<f64>, Vec<f64>), KernelError> {
            Ok((vec![0.5; phi.size()], vec![0.0; phi.size()]))
        }
        fn next(&self, phi: &StateSet, _t1: Option<f64>, _t2: Option<f64>) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn next_rewards(&self, phi: &StateSet, _t1: Option<f64>, _t2: Option<f64>, _r1: f64, _r2: f64) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn steady(&self, phi: &StateSet) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn ef(&self, _epoch: u64, phi: &StateSet) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn cf(&self, _epoch: u64, phi: &StateSet) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
        fn yf(&self, _epoch: u64, phi: &StateSet) -> std::result::Result<Vec<f64>, KernelError> {
            Ok(vec![0.5; phi.size()])
        }
    }

    struct FakeStats;
    impl StatisticalEngine for FakeStats {
        fn model_check_unbounded_until(&self, phi: &StateSet, _psi: &StateSet, _confidence: f64, _op: ComparatorOp, _bl: f64, _br: Option<f64>, _init: usize, _one: bool) -> std::result::Result<crate::traits::StatisticalOutcome, KernelError> {
            Ok(crate::traits::StatisticalOutcome {
                yes: StateSet::from_indices(phi.size(), [0]),
                no: StateSet::from_indices(phi.size(), [2]),
                ci_left: vec![0.1; phi.size()],
                ci_right: vec![0.2; phi.size()],
                max_obs: 50,
            })
        }
        fn model_check_time_interval_until(&self, phi: &StateSet, _psi: &StateSet, _t1: f64, _t2: f64, _confidence: f64, _op: ComparatorOp, _bl: f64, _br: Option<f64>, _init: usize, _one: bool) -> std::result::Result<crate::traits::StatisticalOutcome, KernelError> {
            Ok(crate::traits::StatisticalOutcome { yes: StateSet::new_zero(phi.size()), no: StateSet::new_zero(phi.size()), ci_left: vec![], ci_right: vec![], max_obs: 0 })
        }
        fn model_check_steady_state_hybrid(&self, phi: &StateSet, _confidence: f64, _op: ComparatorOp, _bl: f64, _br: Option<f64>, _init: usize, _one: bool) -> std::result::Result<crate::traits::StatisticalOutcome, KernelError> {
            Ok(crate::traits::StatisticalOutcome { yes: StateSet::new_zero(phi.size()), no: StateSet::new_zero(phi.size()), ci_left: vec![], ci_right: vec![], max_obs: 0 })
        }
        fn model_check_steady_state_pure(&self, phi: &StateSet, _confidence: f64, _op: ComparatorOp, _bl: f64, _br: Option<f64>, _init: usize, _one: bool) -> std::result::Result<crate::traits::StatisticalOutcome, KernelError> {
            Ok(crate::traits::StatisticalOutcome { yes: StateSet::new_zero(phi.size()), no: StateSet::new_zero(phi.size()), ci_left: vec![], ci_right: vec![], max_obs: 0 })
        }
    }

    fn ctx(run_mode: RunMode) -> EvalContext {
        EvalContext::new(run_mode, 4, 1e-6, 0.95, SteadyStateMode::Hybrid, None).unwrap()
    }

    // Scenario 1 (spec.md §8), through the full walker.
    #[test]
    fn walks_boolean_tree_over_labels() {
        let labeling = FakeLabeling {
            n: 4,
            labels: vec![("a", vec![0, 2]), ("b", vec![2, 3])],
        };
        let collab = Collaborators {
            labeling: &labeling,
            kernels: &FakeKernels,
            stats: &FakeStats,
        };
        let context = ctx(RunMode::Dtmc);

        let mut and_formula = FormulaNode::and(FormulaNode::ap("a"), FormulaNode::ap("b"));
        evaluate(&mut and_formula, &context, &collab).unwrap();
        assert_eq!(and_formula.result().yes_set.as_ref().unwrap().ones().collect::<Vec<_>>(), vec![2]);

        let mut implies_formula = FormulaNode::implies(FormulaNode::ap("a"), FormulaNode::ap("b"));
        evaluate(&mut implies_formula, &context, &collab).unwrap();
        assert_eq!(
            implies_formula.result().yes_set.as_ref().unwrap().ones().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    // Scenario 5 (spec.md §8): comparator adoption end to end.
    #[test]
    fn comparator_adopts_statistical_until_result() {
        let labeling = FakeLabeling { n: 3, labels: vec![] };
        let collab = Collaborators {
            labeling: &labeling,
            kernels: &FakeKernels,
            stats: &FakeStats,
        };
        let context = EvalContext::new(RunMode::Ctmc, 3, 1e-6, 0.95, SteadyStateMode::Hybrid, None).unwrap();

        let until = UntilNode {
            result: EvalResult::new(),
            kind: UntilKind::Unb,
            phi: Box::new(FormulaNode::tt()),
            psi: Box::new(FormulaNode::tt()),
            bounds: Bounds::default(),
        };
        let mut comparator_node = ComparatorNode {
            result: EvalResult::new(),
            op: ComparatorOp::GreaterOrEqual,
            bound_left: 0.5,
            bound_right: None,
            inner: Box::new(ProbabilisticNode::Until(until)),
            want_statistical: true,
            initial_state: 0,
            one_init_state: false,
        };
        evaluate_comparator(&mut comparator_node, &context, &collab).unwrap();

        assert_eq!(comparator_node.result.yes_set.unwrap().ones().collect::<Vec<_>>(), vec![0]);
        assert_eq!(comparator_node.result.no_set.unwrap().ones().collect::<Vec<_>>(), vec![2]);
        assert!(comparator_node.inner.result().yes_set.is_none());
        assert!(comparator_node.inner.result().no_set.is_none());
    }

    // Scenario 6 (spec.md §8): mode mismatch degrades, then the
    // wrapping comparator still produces a well-formed yes-set.
    #[test]
    fn mode_mismatch_then_threshold_on_degraded_zero_vector() {
        let labeling = FakeLabeling { n: 4, labels: vec![] };
        let collab = Collaborators {
            labeling: &labeling,
            kernels: &FakeKernels,
            stats: &FakeStats,
        };
        let context = ctx(RunMode::Ctmc);

        let pure_reward = crate::node::PureRewardNode {
            result: EvalResult::new(),
            kind: crate::node::PureRewardKind::ExpectedRr,
            child: Box::new(FormulaNode::tt()),
            epoch: 1,
        };
        let mut comparator_node = ComparatorNode {
            result: EvalResult::new(),
            op: ComparatorOp::Greater,
            bound_left: 0.0,
            bound_right: None,
            inner: Box::new(ProbabilisticNode::PureReward(pure_reward)),
            want_statistical: false,
            initial_state: 0,
            one_init_state: false,
        };
        evaluate_comparator(&mut comparator_node, &context, &collab).unwrap();
        assert_eq!(comparator_node.result.yes_set.unwrap().count(), 0);
    }

    #[test]
    fn next_operator_through_the_walker() {
        let labeling = FakeLabeling { n: 4, labels: vec![] };
        let collab = Collaborators {
            labeling: &labeling,
            kernels: &FakeKernels,
            stats: &FakeStats,
        };
        let context = ctx(RunMode::Dtmc);

        let next = NextNode {
            result: EvalResult::new(),
            kind: NextKind::Unb,
            child: Box::new(FormulaNode::tt()),
            bounds: Bounds::default(),
        };
        let mut comparator_node = ComparatorNode {
            result: EvalResult::new(),
            op: ComparatorOp::GreaterOrEqual,
            bound_left: 0.5,
            bound_right: None,
            inner: Box::new(ProbabilisticNode::Next(next)),
            want_statistical: false,
            initial_state: 0,
            one_init_state: false,
        };
        evaluate_comparator(&mut comparator_node, &context, &collab).unwrap();
        assert_eq!(comparator_node.result.yes_set.unwrap().count(), 4);
    }
}
