//! Scenario generation
//!
//! Re-runs the projection generator three times with identical horizon and
//! seasonality; only the growth assumptions differ, scaled by bounded
//! percentage multipliers. The parallel sequences share month indices, so
//! scenario entries compare pairwise.

use serde::{Deserialize, Serialize};

use crate::model::{FinancialMetrics, ScenarioSet};
use crate::projection::{ProjectionConfig, generate_projections};

/// Growth-rate multipliers for one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub revenue_growth_multiplier: f64,
    pub cost_growth_multiplier: f64,
}

impl ScenarioAdjustment {
    /// No adjustment: the realistic scenario.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            revenue_growth_multiplier: 1.0,
            cost_growth_multiplier: 1.0,
        }
    }

    fn apply(&self, config: &ProjectionConfig) -> ProjectionConfig {
        ProjectionConfig {
            revenue_growth: config.revenue_growth * self.revenue_growth_multiplier,
            cost_growth: config.cost_growth * self.cost_growth_multiplier,
            seasonality: config.seasonality.clone(),
        }
    }
}

/// Multipliers for the optimistic and pessimistic scenarios; realistic is
/// always the unadjusted base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub optimistic: ScenarioAdjustment,
    pub pessimistic: ScenarioAdjustment,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            optimistic: ScenarioAdjustment {
                revenue_growth_multiplier: 1.15,
                cost_growth_multiplier: 0.95,
            },
            pessimistic: ScenarioAdjustment {
                revenue_growth_multiplier: 0.85,
                cost_growth_multiplier: 1.05,
            },
        }
    }
}

/// Generate optimistic/realistic/pessimistic projections over the same
/// horizon and seasonality.
#[must_use]
pub fn generate_scenarios(
    base: &FinancialMetrics,
    months: u32,
    projection: &ProjectionConfig,
    scenarios: &ScenarioConfig,
) -> ScenarioSet {
    ScenarioSet {
        optimistic: generate_projections(base, months, &scenarios.optimistic.apply(projection)),
        realistic: generate_projections(base, months, projection),
        pessimistic: generate_projections(base, months, &scenarios.pessimistic.apply(projection)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FinancialMetrics {
        FinancialMetrics {
            total_revenue: 20_000.0,
            total_costs: 14_000.0,
            net_profit: 6_000.0,
            ..Default::default()
        }
    }

    fn growing() -> ProjectionConfig {
        ProjectionConfig {
            revenue_growth: 0.0125,
            cost_growth: 0.01,
            seasonality: vec![0.9, 1.1, 1.0, 1.0, 0.95, 1.05],
        }
    }

    #[test]
    fn test_scenarios_share_length_and_month_indices() {
        let set = generate_scenarios(&base(), 18, &growing(), &ScenarioConfig::default());
        assert_eq!(set.optimistic.len(), 18);
        assert_eq!(set.realistic.len(), 18);
        assert_eq!(set.pessimistic.len(), 18);
        for k in 0..18 {
            assert_eq!(set.optimistic[k].month, set.realistic[k].month);
            assert_eq!(set.pessimistic[k].month, set.realistic[k].month);
        }
    }

    #[test]
    fn test_profit_ordering_under_monotonic_multipliers() {
        let set = generate_scenarios(&base(), 24, &growing(), &ScenarioConfig::default());
        for k in 0..24 {
            assert!(
                set.pessimistic[k].profit <= set.realistic[k].profit,
                "month {}: pessimistic above realistic",
                k + 1
            );
            assert!(
                set.realistic[k].profit <= set.optimistic[k].profit,
                "month {}: realistic above optimistic",
                k + 1
            );
        }
    }

    #[test]
    fn test_only_growth_assumptions_differ() {
        let set = generate_scenarios(&base(), 12, &growing(), &ScenarioConfig::default());
        // Month 1 has no compounding yet, so all three scenarios agree.
        assert_eq!(set.optimistic[0].revenue, set.realistic[0].revenue);
        assert_eq!(set.pessimistic[0].costs, set.realistic[0].costs);
    }
}
