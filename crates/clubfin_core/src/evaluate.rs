//! The recompute pass
//!
//! Walks the topological order and rewrites every formula-bearing variable
//! from its resolved dependency values. Formulas only see values for their
//! declared dependencies; anything else resolves to zero with a warning, so
//! an undeclared reference can never smuggle in a stale read.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{NumericWarning, Result};
use crate::model::VariableId;
use crate::resolve::evaluation_order;
use crate::store::VariableStore;

/// Outcome of a recompute pass.
#[derive(Debug, Clone)]
pub struct RecomputeReport {
    /// The evaluation order that was used.
    pub order: Vec<VariableId>,
    /// Numeric degeneracies recovered during evaluation.
    pub warnings: Vec<NumericWarning>,
}

/// Resolve the full store: topological sort, then evaluate every formula in
/// order. Structural failures (cycles, dangling references) abort; numeric
/// edge cases recover to `0.0` and are reported in the result.
pub fn recompute(store: &mut VariableStore) -> Result<RecomputeReport> {
    let order = evaluation_order(store)?;
    let warnings = evaluate_in_order(store, &order, None);
    debug!(
        variables = order.len(),
        warnings = warnings.len(),
        "recompute finished"
    );
    Ok(RecomputeReport { order, warnings })
}

/// Evaluate every formula along a precomputed order.
///
/// For callers that already hold the order from
/// [`evaluation_order`](crate::resolve::evaluation_order) and want the
/// resolve and evaluate stages observable separately.
pub fn evaluate_ordered(store: &mut VariableStore, order: &[VariableId]) -> Vec<NumericWarning> {
    evaluate_in_order(store, order, None)
}

/// Evaluate formulas along `order`, optionally restricted to a subset.
///
/// With `only` set, variables outside the subset keep their stored values
/// (they still feed dependents as inputs). The order must come from
/// [`evaluation_order`] over the same store.
pub(crate) fn evaluate_in_order(
    store: &mut VariableStore,
    order: &[VariableId],
    only: Option<&FxHashSet<VariableId>>,
) -> Vec<NumericWarning> {
    let mut warnings = Vec::new();
    for id in order {
        let skip = only.is_some_and(|subset| !subset.contains(id));
        if skip {
            continue;
        }
        let Some(variable) = store.get(id) else {
            continue;
        };
        let Some(formula) = variable.formula.clone() else {
            continue;
        };
        // Restrict visible values to the declared dependency list.
        let scope: FxHashMap<VariableId, f64> = variable
            .dependencies
            .iter()
            .filter_map(|dep| store.value(dep).map(|v| (dep.clone(), v)))
            .collect();
        let value = formula.evaluate(id, &scope, &mut warnings);
        store.set_resolved_value(id, value);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::model::{Category, FinancialVariable, Unit};

    #[test]
    fn test_chain_resolves_in_dependency_order() {
        let mut store = VariableStore::from_variables([
            FinancialVariable::derived(
                "profit",
                "Profit",
                Formula::var("rev").sub(Formula::var("cost")),
                vec!["rev".into(), "cost".into()],
                Category::Metric,
                Unit::Currency,
            ),
            FinancialVariable::input("rev", "Revenue", 5000.0, Category::Revenue, Unit::Currency),
            FinancialVariable::input("cost", "Cost", 1000.0, Category::Cost, Unit::Currency),
        ])
        .unwrap();

        let report = recompute(&mut store).unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(store.value(&"profit".into()), Some(4000.0));
    }

    #[test]
    fn test_undeclared_reference_reads_zero_not_store() {
        // Formula references `cost`, but only `rev` is declared.
        let mut store = VariableStore::from_variables([
            FinancialVariable::input("rev", "Revenue", 100.0, Category::Revenue, Unit::Currency),
            FinancialVariable::input("cost", "Cost", 40.0, Category::Cost, Unit::Currency),
            FinancialVariable::derived(
                "leaky",
                "Leaky",
                Formula::var("rev").sub(Formula::var("cost")),
                vec!["rev".into()],
                Category::Metric,
                Unit::Currency,
            ),
        ])
        .unwrap();

        let report = recompute(&mut store).unwrap();
        assert_eq!(store.value(&"leaky".into()), Some(100.0));
        assert_eq!(report.warnings.len(), 1);
        assert!(matches!(
            &report.warnings[0],
            NumericWarning::UnresolvedReference { missing, .. } if missing.as_str() == "cost"
        ));
    }

    #[test]
    fn test_degenerate_division_does_not_abort_the_pass() {
        let mut store = VariableStore::from_variables([
            FinancialVariable::input("zero", "Zero", 0.0, Category::Metric, Unit::Number),
            FinancialVariable::derived(
                "ratio",
                "Ratio",
                Formula::constant(1.0).div(Formula::var("zero")),
                vec!["zero".into()],
                Category::Metric,
                Unit::Percentage,
            ),
            FinancialVariable::derived(
                "after",
                "After",
                Formula::constant(7.0),
                vec![],
                Category::Metric,
                Unit::Number,
            ),
        ])
        .unwrap();

        let report = recompute(&mut store).unwrap();
        assert_eq!(store.value(&"ratio".into()), Some(0.0));
        // The variable after the bad one still resolves.
        assert_eq!(store.value(&"after".into()), Some(7.0));
        assert_eq!(report.warnings.len(), 1);
    }
}
