//! Sensitivity analysis
//!
//! Sweeps one variable across percentage deltas and reports the resulting
//! aggregate metrics. Works on a clone of the store, so the base variable
//! set is never mutated by an analysis call, and only the transitive
//! dependents of the target are re-evaluated per delta.

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::evaluate::evaluate_in_order;
use crate::metrics::aggregate_metrics;
use crate::model::{SensitivityPoint, SensitivityResult, VariableId};
use crate::resolve::{evaluation_order, transitive_dependents};
use crate::store::VariableStore;

/// Sweep `target` across `variations` (percent deltas, e.g. `[-20, -10, 5]`).
///
/// Each point scales the target's value by `(1 + delta/100)` on a fresh
/// clone, re-resolves the affected subgraph, and aggregates metrics.
pub fn sensitivity_analysis(
    store: &VariableStore,
    target: &VariableId,
    variations: &[f64],
) -> Result<SensitivityResult> {
    let base_value = store
        .value(target)
        .ok_or_else(|| EngineError::NotFound(target.clone()))?;

    // Sort once for the whole sweep; this also surfaces structural errors
    // before any point is computed.
    let order = evaluation_order(store)?;
    let mut affected = transitive_dependents(store, target);
    // The target's own formula must not overwrite the perturbed value.
    affected.remove(target);

    debug!(
        target = %target,
        points = variations.len(),
        affected = affected.len(),
        "sensitivity sweep"
    );

    let mut points = Vec::with_capacity(variations.len());
    for &delta in variations {
        let mut working = store.clone();
        working.update(target, base_value * (1.0 + delta / 100.0))?;
        evaluate_in_order(&mut working, &order, Some(&affected));
        let metrics = aggregate_metrics(working.iter());
        points.push(SensitivityPoint {
            variation_percent: delta,
            net_profit: metrics.net_profit,
            profit_margin: metrics.profit_margin,
            roi: metrics.roi,
        });
    }

    Ok(SensitivityResult {
        variable_id: target.clone(),
        base_value,
        points,
    })
}
