//! Metrics aggregation
//!
//! Reduces the variable set, grouped by category, into summary metrics.
//! Metrics are derived data only: recomputed from the current values on
//! every call, never stored back into the variable set.

use crate::model::{Category, FinancialMetrics, FinancialVariable, VariableId};

/// Metric-category variable supplying an explicit investment base for ROI.
pub const INITIAL_INVESTMENT: &str = "initial_investment";
/// Metric-category variable supplying fixed costs for unit break-even.
pub const FIXED_COSTS: &str = "fixed_costs";
/// Metric-category variable supplying per-unit contribution margin.
pub const CONTRIBUTION_MARGIN: &str = "contribution_margin";

/// Aggregate the variable set into [`FinancialMetrics`].
///
/// - `total_revenue` / `total_costs`: sums over the respective categories.
/// - `profit_margin`: `net_profit / total_revenue`, `0` when there is no
///   revenue; never NaN or infinite.
/// - `roi`: `net_profit / initial_investment` when an `initial_investment`
///   metric variable exists, else `net_profit / total_costs`.
/// - `break_even_point`: `fixed_costs / contribution_margin` in units when
///   both driver variables exist with a positive margin; otherwise all
///   current costs are treated as fixed and break-even revenue equals
///   `total_costs`.
#[must_use]
pub fn aggregate_metrics<'a>(
    variables: impl IntoIterator<Item = &'a FinancialVariable>,
) -> FinancialMetrics {
    let mut total_revenue = 0.0;
    let mut total_costs = 0.0;
    let mut initial_investment = None;
    let mut fixed_costs = None;
    let mut contribution_margin = None;

    for variable in variables {
        match variable.category {
            Category::Revenue => total_revenue += variable.value,
            Category::Cost => total_costs += variable.value,
            Category::Metric => match variable.id.as_str() {
                INITIAL_INVESTMENT => initial_investment = Some(variable.value),
                FIXED_COSTS => fixed_costs = Some(variable.value),
                CONTRIBUTION_MARGIN => contribution_margin = Some(variable.value),
                _ => {}
            },
            Category::Projection => {}
        }
    }

    let net_profit = total_revenue - total_costs;
    let profit_margin = if total_revenue > 0.0 {
        net_profit / total_revenue
    } else {
        0.0
    };

    let roi = match initial_investment {
        Some(investment) if investment != 0.0 => net_profit / investment,
        _ if total_costs > 0.0 => net_profit / total_costs,
        _ => 0.0,
    };

    let break_even_point = match (fixed_costs, contribution_margin) {
        (Some(fixed), Some(margin)) if margin > 0.0 => fixed / margin,
        _ => total_costs,
    };

    FinancialMetrics {
        total_revenue,
        total_costs,
        net_profit,
        profit_margin,
        break_even_point,
        roi,
    }
}

/// True when the id is one of the well-known metric drivers.
#[must_use]
pub fn is_metric_driver(id: &VariableId) -> bool {
    matches!(
        id.as_str(),
        INITIAL_INVESTMENT | FIXED_COSTS | CONTRIBUTION_MARGIN
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;

    fn var(id: &str, value: f64, category: Category) -> FinancialVariable {
        FinancialVariable::input(id, id, value, category, Unit::Currency)
    }

    #[test]
    fn test_rent_and_revenue_scenario() {
        let variables = [
            var("rent", 1000.0, Category::Cost),
            var("rev", 5000.0, Category::Revenue),
        ];
        let metrics = aggregate_metrics(&variables);
        assert_eq!(metrics.total_revenue, 5000.0);
        assert_eq!(metrics.total_costs, 1000.0);
        assert_eq!(metrics.net_profit, 4000.0);
        assert_eq!(metrics.profit_margin, 0.8);
        // No explicit drivers: roi falls back to profit over costs and
        // break-even revenue to total costs.
        assert_eq!(metrics.roi, 4.0);
        assert_eq!(metrics.break_even_point, 1000.0);
    }

    #[test]
    fn test_margin_is_zero_without_revenue() {
        let variables = [var("rent", 1000.0, Category::Cost)];
        let metrics = aggregate_metrics(&variables);
        assert_eq!(metrics.profit_margin, 0.0);
        assert!(metrics.profit_margin.is_finite());
    }

    #[test]
    fn test_margin_never_exceeds_one_with_nonnegative_costs() {
        let variables = [
            var("rev", 100.0, Category::Revenue),
            var("cost", 0.0, Category::Cost),
        ];
        let metrics = aggregate_metrics(&variables);
        assert!(metrics.profit_margin <= 1.0);
    }

    #[test]
    fn test_explicit_drivers_take_over() {
        let variables = [
            var("rev", 10_000.0, Category::Revenue),
            var("cost", 6_000.0, Category::Cost),
            var(INITIAL_INVESTMENT, 50_000.0, Category::Metric),
            var(FIXED_COSTS, 4_000.0, Category::Metric),
            var(CONTRIBUTION_MARGIN, 40.0, Category::Metric),
        ];
        let metrics = aggregate_metrics(&variables);
        assert_eq!(metrics.roi, 4_000.0 / 50_000.0);
        assert_eq!(metrics.break_even_point, 100.0);
        // Driver variables do not pollute the category sums.
        assert_eq!(metrics.total_revenue, 10_000.0);
        assert_eq!(metrics.total_costs, 6_000.0);
    }
}
