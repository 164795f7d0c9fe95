//! Engine output types
//!
//! Everything here is derived data: recomputed fresh per request, never
//! mutated in place. Field names serialize in the camelCase spelling the
//! dashboard consumes.

use serde::{Deserialize, Serialize};

use super::ids::VariableId;
use super::variables::FinancialVariable;

/// Summary metrics aggregated from the variable set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_revenue: f64,
    pub total_costs: f64,
    pub net_profit: f64,
    /// `net_profit / total_revenue`, 0 when there is no revenue. Never NaN.
    pub profit_margin: f64,
    /// Revenue required to cover costs. See `aggregate_metrics` for the
    /// derivation rules.
    pub break_even_point: f64,
    pub roi: f64,
}

/// One month of a financial projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProjection {
    /// 1-based month index.
    pub month: u32,
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    /// Running sum of `profit` up to and including this month.
    pub cumulative_profit: f64,
}

/// Three parallel projections under different growth assumptions.
///
/// All three sequences have the same length and the same month indices, so
/// entries compare pairwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub optimistic: Vec<MonthlyProjection>,
    pub realistic: Vec<MonthlyProjection>,
    pub pessimistic: Vec<MonthlyProjection>,
}

impl ScenarioSet {
    /// Number of months in each scenario.
    #[must_use]
    pub fn months(&self) -> usize {
        self.realistic.len()
    }
}

/// One swept point of a sensitivity analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub variation_percent: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
    pub roi: f64,
}

/// Result of sweeping one variable across percentage deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityResult {
    pub variable_id: VariableId,
    pub base_value: f64,
    /// One point per requested delta, in request order.
    pub points: Vec<SensitivityPoint>,
}

/// Distribution summary from randomized projection runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloSummary {
    pub iterations: usize,
    /// Mean final cumulative profit across runs.
    pub mean_final_profit: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
    /// Fraction of runs ending with positive cumulative profit.
    pub success_rate: f64,
}

/// Validation report. A report, never an exception: structural and business
/// violations land in `errors`, advisories and recovered numeric
/// degeneracies in `warnings`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A passing report with no findings.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Full recompute payload: the resolved variables plus everything derived
/// from them in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateResult {
    pub variables: Vec<FinancialVariable>,
    pub metrics: FinancialMetrics,
    pub projections: Vec<MonthlyProjection>,
    pub validation: ValidationResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_wire_spelling() {
        let metrics = FinancialMetrics {
            total_revenue: 5000.0,
            total_costs: 1000.0,
            net_profit: 4000.0,
            profit_margin: 0.8,
            break_even_point: 1000.0,
            roi: 4.0,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["totalRevenue"], 5000.0);
        assert_eq!(json["profitMargin"], 0.8);
        assert_eq!(json["breakEvenPoint"], 1000.0);
    }

    #[test]
    fn test_validation_result_validity_tracks_errors() {
        let ok = ValidationResult::new(Vec::new(), vec!["advisory".into()]);
        assert!(ok.is_valid);
        let bad = ValidationResult::new(vec!["boom".into()], Vec::new());
        assert!(!bad.is_valid);
    }
}
