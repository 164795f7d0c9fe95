//! Criterion benchmarks for clubfin_core
//!
//! Run with: cargo bench -p clubfin_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use clubfin_core::evaluate::recompute;
use clubfin_core::formula::Formula;
use clubfin_core::model::{Category, FinancialVariable, Unit};
use clubfin_core::sensitivity::sensitivity_analysis;
use clubfin_core::store::VariableStore;

/// A store with one input and a dependency chain of `depth` derived
/// variables, each scaling its predecessor.
fn chain_store(depth: usize) -> VariableStore {
    let mut variables = vec![FinancialVariable::input(
        "base",
        "Base revenue",
        10_000.0,
        Category::Revenue,
        Unit::Currency,
    )];
    let mut prev = "base".to_owned();
    for i in 0..depth {
        let id = format!("derived_{i}");
        variables.push(FinancialVariable::derived(
            id.clone(),
            id.clone(),
            Formula::var(prev.as_str()).mul(Formula::constant(1.01)),
            vec![prev.as_str().into()],
            Category::Metric,
            Unit::Currency,
        ));
        prev = id;
    }
    VariableStore::from_variables(variables).unwrap()
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");
    for depth in [10, 100, 1000] {
        let store = chain_store(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &store, |b, store| {
            b.iter(|| {
                let mut working = store.clone();
                black_box(recompute(&mut working).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_sensitivity(c: &mut Criterion) {
    let store = chain_store(200);
    let deltas = [-20.0, -10.0, -5.0, 5.0, 10.0, 20.0];
    c.bench_function("sensitivity_chain_200", |b| {
        b.iter(|| {
            black_box(sensitivity_analysis(&store, &"base".into(), &deltas).unwrap());
        });
    });
}

criterion_group!(benches, bench_recompute, bench_sensitivity);
criterion_main!(benches);
