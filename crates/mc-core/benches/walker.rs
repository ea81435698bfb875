//! Criterion benchmarks for the formula-tree walker.
//!
//! Benchmarks how evaluation time scales with formula depth
//! (nested Boolean connectives) and with state-space size (`N`), the
//! two dimensions that matter for the post-order walker's cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mc_common::{RunMode, SteadyStateMode};
use mc_config::EvalContext;
use mc_core::bitset::StateSet;
use mc_core::node::FormulaNode;
use mc_core::traits::{KernelError, Kernels, Labeling, StatisticalEngine};
use mc_core::{evaluate, Collaborators};

struct BenchLabeling {
    n: usize,
}

impl Labeling for BenchLabeling {
    fn n(&self) -> usize {
        self.n
    }

    fn label_bitset(&self, name: &str) -> Option<StateSet> {
        let stride = name.len().max(1);
        Some(StateSet::from_indices(
            self.n,
            (0..self.n).filter(move |i| i % stride == 0),
        ))
    }
}

struct NullKernels;
impl Kernels for NullKernels {
    fn until(&self, phi: &StateSet, _: &StateSet, _: Option<f64>, _: Option<f64>, _: bool) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn until_rewards(&self, phi: &StateSet, _: &StateSet, _: Option<f64>, _: Option<f64>, _: f64, _: f64) -> Result<(Vec<f64>, Vec<f64>), KernelError> {
        Ok((vec![0.5; phi.size()], vec![0.0; phi.size()]))
    }
    fn next(&self, phi: &StateSet, _: Option<f64>, _: Option<f64>) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn next_rewards(&self, phi: &StateSet, _: Option<f64>, _: Option<f64>, _: f64, _: f64) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn steady(&self, phi: &StateSet) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn ef(&self, _: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn cf(&self, _: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
    fn yf(&self, _: u64, phi: &StateSet) -> Result<Vec<f64>, KernelError> {
        Ok(vec![0.5; phi.size()])
    }
}

struct NullStats;
impl StatisticalEngine for NullStats {
    fn model_check_unbounded_until(&self, phi: &StateSet, _: &StateSet, _: f64, _: mc_common::ComparatorOp, _: f64, _: Option<f64>, _: usize, _: bool) -> Result<mc_core::traits::StatisticalOutcome, KernelError> {
        Ok(mc_core::traits::StatisticalOutcome {
            yes: StateSet::new_zero(phi.size()),
            no: StateSet::new_zero(phi.size()),
            ci_left: vec![],
            ci_right: vec![],
            max_obs: 0,
        })
    }
    fn model_check_time_interval_until(&self, phi: &StateSet, _: &StateSet, _: f64, _: f64, _: f64, _: mc_common::ComparatorOp, _: f64, _: Option<f64>, _: usize, _: bool) -> Result<mc_core::traits::StatisticalOutcome, KernelError> {
        Ok(mc_core::traits::StatisticalOutcome {
            yes: StateSet::new_zero(phi.size()),
            no: StateSet::new_zero(phi.size()),
            ci_left: vec![],
            ci_right: vec![],
            max_obs: 0,
        })
    }
    fn model_check_steady_state_hybrid(&self, phi: &StateSet, _: f64, _: mc_common::ComparatorOp, _: f64, _: Option<f64>, _: usize, _: bool) -> Result<mc_core::traits::StatisticalOutcome, KernelError> {
        Ok(mc_core::traits::StatisticalOutcome {
            yes: StateSet::new_zero(phi.size()),
            no: StateSet::new_zero(phi.size()),
            ci_left: vec![],
            ci_right: vec![],
            max_obs: 0,
        })
    }
    fn model_check_steady_state_pure(&self, phi: &StateSet, _: f64, _: mc_common::ComparatorOp, _: f64, _: Option<f64>, _: usize, _: bool) -> Result<mc_core::traits::StatisticalOutcome, KernelError> {
        Ok(mc_core::traits::StatisticalOutcome {
            yes: StateSet::new_zero(phi.size()),
            no: StateSet::new_zero(phi.size()),
            ci_left: vec![],
            ci_right: vec![],
            max_obs: 0,
        })
    }
}

fn nested_boolean_formula(depth: usize) -> FormulaNode {
    let mut f = FormulaNode::ap("a");
    for i in 0..depth {
        f = if i % 2 == 0 {
            FormulaNode::and(f, FormulaNode::ap("b"))
        } else {
            FormulaNode::or(f, FormulaNode::ap("a"))
        };
    }
    f
}

fn bench_boolean_depth(c: &mut Criterion) {
    let labeling = BenchLabeling { n: 1_000 };
    let collab = Collaborators {
        labeling: &labeling,
        kernels: &NullKernels,
        stats: &NullStats,
    };
    let ctx = EvalContext::new(RunMode::Dtmc, 1_000, 1e-6, 0.95, SteadyStateMode::Hybrid, None).unwrap();

    let mut group = c.benchmark_group("walker/boolean_depth");
    for depth in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut formula = nested_boolean_formula(depth);
                evaluate(&mut formula, &ctx, &collab).unwrap();
                black_box(formula.result().yes_set.as_ref().unwrap().count());
            })
        });
    }
    group.finish();
}

fn bench_state_space_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("walker/state_space_size");
    for n in [100usize, 1_000, 10_000] {
        let labeling = BenchLabeling { n };
        let collab = Collaborators {
            labeling: &labeling,
            kernels: &NullKernels,
            stats: &NullStats,
        };
        let ctx = EvalContext::new(RunMode::Dtmc, n, 1e-6, 0.95, SteadyStateMode::Hybrid, None).unwrap();

        group.bench_with_input(BenchmarkId::new("n", n), &n, |b, _| {
            b.iter(|| {
                let mut formula = nested_boolean_formula(8);
                evaluate(&mut formula, &ctx, &collab).unwrap();
                black_box(formula.result().yes_set.as_ref().unwrap().count());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_boolean_depth, bench_state_space_size);
criterion_main!(benches);
