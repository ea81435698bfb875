//! Comparator / threshold folder (C3): turns a probability or reward
//! vector plus a threshold (or interval) and an error bound into a
//! yes-set (`spec.md` §4.4).

use mc_common::ComparatorOp;
use mc_math::{is_exact_probability_endpoint, shift_lower, shift_upper, widen_interval};

use crate::bitset::StateSet;
use crate::error::{EvalError, Result};
use crate::node::ComparatorNode;

/// The error source a fold operates under.
pub enum ErrorSpec<'a> {
    /// A single error bound applied to every state, with the
    /// exact-endpoint exception (`spec.md` §4.4 single-error mode).
    Scalar(f64),
    /// A per-state error vector, no exact-endpoint exception
    /// (`spec.md` §4.4 per-state-error mode).
    PerState(&'a [f64]),
}

fn accepts(value: f64, op: ComparatorOp, bound_left: f64, bound_right: Option<f64>, eps: f64) -> bool {
    match op {
        ComparatorOp::Greater => value > shift_lower(bound_left, eps),
        ComparatorOp::GreaterOrEqual => value >= shift_lower(bound_left, eps),
        ComparatorOp::Less => value < shift_upper(bound_left, eps),
        ComparatorOp::LessOrEqual => value <= shift_upper(bound_left, eps),
        ComparatorOp::Interval => {
            let right = bound_right.unwrap_or(bound_left);
            let (lo, hi) = widen_interval(bound_left, right, eps);
            value >= lo && value <= hi
        }
    }
}

fn accepts_exact(value: f64, op: ComparatorOp, bound_left: f64, bound_right: Option<f64>) -> bool {
    match op {
        ComparatorOp::Greater => value > bound_left,
        ComparatorOp::GreaterOrEqual => value >= bound_left,
        ComparatorOp::Less => value < bound_left,
        ComparatorOp::LessOrEqual => value <= bound_left,
        ComparatorOp::Interval => {
            let right = bound_right.unwrap_or(bound_left);
            value >= bound_left && value <= right
        }
    }
}

/// Folds `values` against `op`/`bound_left`/`bound_right` under the
/// given error model, producing a yes-set of length `values.len()`.
///
/// `is_probability` gates the exact-endpoint exception (`spec.md` §4.4):
/// it only ever applies to probability vectors, never to rewards.
pub fn fold(
    values: &[f64],
    op: ComparatorOp,
    bound_left: f64,
    bound_right: Option<f64>,
    error: ErrorSpec<'_>,
    is_probability: bool,
) -> StateSet {
    debug_assert!(
        op.is_single_bound() || bound_right.is_some(),
        "an interval comparator must carry a right bound"
    );
    let mut yes = StateSet::new_zero(values.len());
    for (i, &v) in values.iter().enumerate() {
        let accepted = match error {
            ErrorSpec::Scalar(eps) => {
                if eps > 0.0 && !(is_probability && is_exact_probability_endpoint(v)) {
                    accepts(v, op, bound_left, bound_right, eps)
                } else {
                    accepts_exact(v, op, bound_left, bound_right)
                }
            }
            ErrorSpec::PerState(eps) => accepts(v, op, bound_left, bound_right, eps[i]),
        };
        if accepted {
            yes.set_bit(i);
        }
    }
    yes
}

/// Evaluates a [`ComparatorNode`] from its already-evaluated inner
/// probabilistic node.
///
/// Short-circuits via adoption (`spec.md` §4.4) when the inner node
/// was evaluated statistically: the comparator takes ownership of the
/// inner node's `yes_set`/`no_set` by move, nulling them in the child,
/// and the folding rule below is skipped entirely — the statistical
/// engine has already performed the thresholded decision.
pub fn evaluate(node: &mut ComparatorNode) -> Result<()> {
    let is_probability = node.inner.is_probability();
    let inner = node.inner.result_mut();
    node.result.diagnostics.extend(inner.diagnostics.iter().cloned());

    if inner.sim_here {
        let yes = inner
            .yes_set
            .take()
            .ok_or(EvalError::NullChild { node: "Comparator" })?;
        let no = inner
            .no_set
            .take()
            .ok_or(EvalError::NullChild { node: "Comparator" })?;

        node.result.yes_set = Some(yes);
        node.result.no_set = Some(no);
        node.result.size = inner.size;
        node.result.sim_here = true;
        node.result.sim_below = true;
        node.result.confidence = inner.confidence;
        node.result.ci_left = inner.ci_left.take();
        node.result.ci_right = inner.ci_right.take();
        node.result.max_obs = inner.max_obs;
        return Ok(());
    }

    let values = inner
        .prob_reward
        .as_ref()
        .ok_or(EvalError::NullChild { node: "Comparator" })?;

    let yes = match inner.error_per_state.as_deref() {
        Some(eps) => fold(
            values,
            node.op,
            node.bound_left,
            node.bound_right,
            ErrorSpec::PerState(eps),
            is_probability,
        ),
        None => fold(
            values,
            node.op,
            node.bound_left,
            node.bound_right,
            ErrorSpec::Scalar(inner.error_scalar),
            is_probability,
        ),
    };

    node.result.yes_set = Some(yes);
    node.result.size = inner.size;
    node.result.sim_here = false;
    node.result.sim_below = inner.is_two_set();
    Ok(())
}
