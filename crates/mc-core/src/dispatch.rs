//! Probabilistic-operator dispatcher (C6): for Next, Until,
//! Steady/Long-run, and E/C/Y, selects numerical vs. statistical
//! evaluation, selects the kernel variant by model class, calls the
//! chosen collaborator, and stores the result (`spec.md` §4.5).
//!
//! Next and the pure-reward operators have no statistical variant in
//! this system (only Until and Steady/Long-run simulate); their
//! dispatch is always numerical.

use mc_common::{ComparatorOp, RunMode, SteadyStateMode};
use mc_config::EvalContext;
use tracing::warn;

use crate::bitset::StateSet;
use crate::error::{EvalError, Result};
use crate::node::{
    LongSteadyKind, LongSteadyNode, NextKind, NextNode, PureRewardKind, PureRewardNode, UntilKind,
    UntilNode,
};
use crate::traits::{Kernels, StatisticalEngine};

/// The comparator information a statistical Until/Steady-state
/// invocation needs — threaded down from the enclosing
/// [`crate::node::ComparatorNode`] rather than kept as a back-pointer
/// on the probabilistic node itself.
#[derive(Debug, Clone, Copy)]
pub struct StatContext {
    pub op: ComparatorOp,
    pub bound_left: f64,
    pub bound_right: Option<f64>,
    pub initial_state: usize,
    pub one_init_state: bool,
}

fn installs_degraded_zero(result: &mut crate::node::EvalResult, size: usize, operator: &'static str, run_mode: RunMode) {
    let err = EvalError::ModeMismatch { operator, run_mode };
    debug_assert!(err.is_recoverable(), "mode-mismatch diagnostics must be recoverable");
    warn!(target: "mc_core::dispatch", operator, %run_mode, "operator not valid in run mode, installing degraded zero vector");
    result.diagnostics.push(err);
    result.prob_reward = Some(vec![0.0; size]);
    result.size = size;
    result.error_scalar = 0.0;
    result.sim_here = false;
}

fn kernel_err(operator: &'static str, e: crate::traits::KernelError) -> EvalError {
    EvalError::KernelFailure {
        operator,
        size: e.size,
        bounds: e.bounds,
    }
}

/// Next (`X`), one child (`spec.md` §4.5 table, §4.5 "Until variants"
/// analogue for Next).
pub fn dispatch_next(node: &mut NextNode, ctx: &EvalContext, kernels: &dyn Kernels) -> Result<()> {
    let phi = node
        .result
        .yes_set
        .clone()
        .ok_or(EvalError::NullChild { node: "Next" })?;
    let size = ctx.n();
    let run_mode = ctx.run_mode();
    let operator = "next";

    let valid = match node.kind {
        NextKind::Unb => run_mode != RunMode::Ctmdpi,
        NextKind::Time => run_mode.is_continuous_time() && run_mode != RunMode::Ctmdpi,
        NextKind::TimeReward => run_mode.is_reward_model() && run_mode.is_continuous_time(),
    };

    if !valid {
        installs_degraded_zero(&mut node.result, size, operator, run_mode);
        return Ok(());
    }

    let vec = match node.kind {
        NextKind::Unb | NextKind::Time => kernels
            .next(&phi, node.bounds.t1, node.bounds.t2)
            .map_err(|e| kernel_err(operator, e))?,
        NextKind::TimeReward => kernels
            .next_rewards(
                &phi,
                node.bounds.t1,
                node.bounds.t2,
                node.bounds.r1.unwrap_or(0.0),
                node.bounds.r2.unwrap_or(0.0),
            )
            .map_err(|e| kernel_err(operator, e))?,
    };

    node.result.prob_reward = Some(vec);
    node.result.size = size;
    node.result.error_scalar = ctx.error_bound();
    node.result.sim_here = false;
    Ok(())
}

/// Until (`Φ U Ψ`), two children. Statistical evaluation requires a
/// [`StatContext`] from the enclosing comparator.
pub fn dispatch_until(
    node: &mut UntilNode,
    ctx: &EvalContext,
    kernels: &dyn Kernels,
    stats: &dyn StatisticalEngine,
    stat_ctx: StatContext,
    want_statistical: bool,
) -> Result<()> {
    let phi = node
        .phi
        .result()
        .yes_set
        .clone()
        .ok_or(EvalError::NullChild { node: "Until" })?;
    let psi = node
        .psi
        .result()
        .yes_set
        .clone()
        .ok_or(EvalError::NullChild { node: "Until" })?;
    let run_mode = ctx.run_mode();
    let operator = "until";
    let size = ctx.result_size();

    let valid = match node.kind {
        UntilKind::Unb => run_mode != RunMode::Ctmdpi,
        // Every run mode supports Until(TIME), including CTMDPI (subject
        // to the CTMDPI-specific TT-left restriction checked below).
        UntilKind::Time => true,
        UntilKind::TimeReward => run_mode.is_reward_model(),
    };

    if !valid {
        installs_degraded_zero(&mut node.result, size, operator, run_mode);
        return Ok(());
    }

    // CTMDPI restriction (spec.md §4.5): Until(TIME) is only called
    // when the left subformula is the atomic TT; otherwise a zero
    // vector of length MDPI N is installed with error_scalar = 0.
    if run_mode == RunMode::Ctmdpi {
        let phi_is_tt = matches!(
            node.phi.as_ref(),
            crate::node::FormulaNode::Atomic(crate::node::Atomic::Structural(a))
                if a.kind == crate::node::AtomicKind::Tt
        );
        if !phi_is_tt {
            node.result.prob_reward = Some(vec![0.0; size]);
            node.result.size = size;
            node.result.error_scalar = 0.0;
            node.result.sim_here = false;
            return Ok(());
        }
    }

    if want_statistical && matches!(node.kind, UntilKind::Unb | UntilKind::Time) {
        let outcome = match node.kind {
            UntilKind::Unb => stats
                .model_check_unbounded_until(
                    &phi,
                    &psi,
                    ctx.confidence(),
                    stat_ctx.op,
                    stat_ctx.bound_left,
                    stat_ctx.bound_right,
                    stat_ctx.initial_state,
                    stat_ctx.one_init_state,
                )
                .map_err(|e| kernel_err(operator, e))?,
            UntilKind::Time => stats
                .model_check_time_interval_until(
                    &phi,
                    &psi,
                    node.bounds.t1.unwrap_or(0.0),
                    node.bounds.t2.unwrap_or(0.0),
                    ctx.confidence(),
                    stat_ctx.op,
                    stat_ctx.bound_left,
                    stat_ctx.bound_right,
                    stat_ctx.initial_state,
                    stat_ctx.one_init_state,
                )
                .map_err(|e| kernel_err(operator, e))?,
            UntilKind::TimeReward => unreachable!("statistical TimeReward is not a valid Until variant"),
        };
        node.result.yes_set = Some(outcome.yes);
        node.result.no_set = Some(outcome.no);
        node.result.ci_left = Some(outcome.ci_left);
        node.result.ci_right = Some(outcome.ci_right);
        node.result.size = size;
        node.result.max_obs = Some(outcome.max_obs);
        node.result.confidence = Some(ctx.confidence());
        node.result.sim_here = true;
        return Ok(());
    }

    match node.kind {
        UntilKind::Unb => {
            let vec = kernels
                .until(&phi, &psi, None, None, false)
                .map_err(|e| kernel_err(operator, e))?;
            node.result.prob_reward = Some(vec);
            node.result.error_scalar = ctx.error_bound();
        }
        UntilKind::Time => {
            let vec = kernels
                .until(&phi, &psi, node.bounds.t1, node.bounds.t2, false)
                .map_err(|e| kernel_err(operator, e))?;
            node.result.prob_reward = Some(vec);
            node.result.error_scalar = ctx.error_bound();
        }
        UntilKind::TimeReward => {
            let (vec, err_per_state) = kernels
                .until_rewards(
                    &phi,
                    &psi,
                    node.bounds.t1,
                    node.bounds.t2,
                    node.bounds.r1.unwrap_or(0.0),
                    node.bounds.r2.unwrap_or(0.0),
                )
                .map_err(|e| kernel_err(operator, e))?;
            node.result.prob_reward = Some(vec);
            node.result.error_per_state = Some(err_per_state);
            node.result.error_scalar = ctx.error_bound();
        }
    }
    node.result.size = size;
    node.result.sim_here = false;
    Ok(())
}

/// Steady-state / Long-run (`spec.md` §4.5 "Steady-state mode
/// selection"). When evaluated statistically, `sim_steady_state_mode`
/// picks between the hybrid and pure statistical engine entry points;
/// in either statistical case `error_scalar` is left untouched since
/// the engine's confidence intervals already absorb the internally
/// used numerical error.
pub fn dispatch_long_steady(
    node: &mut LongSteadyNode,
    ctx: &EvalContext,
    kernels: &dyn Kernels,
    stats: &dyn StatisticalEngine,
    stat_ctx: StatContext,
    want_statistical: bool,
) -> Result<()> {
    let phi = node
        .result
        .yes_set
        .clone()
        .ok_or(EvalError::NullChild { node: "LongSteady" })?;
    let run_mode = ctx.run_mode();
    let size = ctx.n();
    let operator = match node.kind {
        LongSteadyKind::SteadyState => "steady_state",
        LongSteadyKind::LongRun => "long_run",
    };

    let valid = match node.kind {
        LongSteadyKind::SteadyState => run_mode.is_continuous_time() && run_mode != RunMode::Ctmdpi,
        LongSteadyKind::LongRun => run_mode != RunMode::Ctmdpi,
    };
    if !valid {
        installs_degraded_zero(&mut node.result, size, operator, run_mode);
        return Ok(());
    }

    // Statistical evaluation is only offered for CTMC/CMRM
    // steady-state nodes (spec.md §4.5); LongRun on DTMC/DMRM is
    // always numerical.
    let statistical_eligible = want_statistical
        && matches!(node.kind, LongSteadyKind::SteadyState)
        && matches!(run_mode, RunMode::Ctmc | RunMode::Cmrm);

    if statistical_eligible {
        let outcome = match ctx.sim_steady_state_mode() {
            SteadyStateMode::Hybrid => stats
                .model_check_steady_state_hybrid(
                    &phi,
                    ctx.confidence(),
                    stat_ctx.op,
                    stat_ctx.bound_left,
                    stat_ctx.bound_right,
                    stat_ctx.initial_state,
                    stat_ctx.one_init_state,
                )
                .map_err(|e| kernel_err(operator, e))?,
            SteadyStateMode::Pure => stats
                .model_check_steady_state_pure(
                    &phi,
                    ctx.confidence(),
                    stat_ctx.op,
                    stat_ctx.bound_left,
                    stat_ctx.bound_right,
                    stat_ctx.initial_state,
                    stat_ctx.one_init_state,
                )
                .map_err(|e| kernel_err(operator, e))?,
        };
        node.result.yes_set = Some(outcome.yes);
        node.result.no_set = Some(outcome.no);
        node.result.ci_left = Some(outcome.ci_left);
        node.result.ci_right = Some(outcome.ci_right);
        node.result.size = size;
        node.result.max_obs = Some(outcome.max_obs);
        node.result.confidence = Some(ctx.confidence());
        node.result.sim_here = true;
        return Ok(());
    }

    let vec = kernels.steady(&phi).map_err(|e| kernel_err(operator, e))?;
    node.result.prob_reward = Some(vec);
    node.result.size = size;
    node.result.error_scalar = ctx.error_bound();
    node.result.sim_here = false;
    Ok(())
}

/// `E`/`C`/`Y`, always numerical, valid only in `DMRM`
/// (`spec.md` §4.5's "Pure-reward operators").
pub fn dispatch_pure_reward(node: &mut PureRewardNode, ctx: &EvalContext, kernels: &dyn Kernels) -> Result<()> {
    let phi = node
        .result
        .yes_set
        .clone()
        .ok_or(EvalError::NullChild { node: "PureReward" })?;
    let run_mode = ctx.run_mode();
    let size = ctx.n();
    let operator = match node.kind {
        PureRewardKind::ExpectedRr => "E",
        PureRewardKind::InstantR => "C",
        PureRewardKind::ExpectedAr => "Y",
    };

    if run_mode != RunMode::Dmrm {
        installs_degraded_zero(&mut node.result, size, operator, run_mode);
        return Ok(());
    }

    let vec = match node.kind {
        PureRewardKind::ExpectedRr => kernels.ef(node.epoch, &phi),
        PureRewardKind::InstantR => kernels.cf(node.epoch, &phi),
        PureRewardKind::ExpectedAr => kernels.yf(node.epoch, &phi),
    }
    .map_err(|e| kernel_err(operator, e))?;

    node.result.prob_reward = Some(vec);
    node.result.size = size;
    node.result.error_scalar = ctx.error_bound();
    node.result.sim_here = false;
    Ok(())
}
