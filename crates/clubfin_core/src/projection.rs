//! Multi-period projection generation
//!
//! Projects aggregated base metrics across a month-indexed horizon.
//! Revenue compounds at a monthly growth rate shaped by per-month seasonal
//! factors; costs compound at their own, independent rate, since a club's
//! fixed costs do not follow revenue growth.

use serde::{Deserialize, Serialize};

use crate::model::{FinancialMetrics, MarketDataSource, MarketId, MarketProfile, MonthlyProjection};

/// Costs grow at this fraction of revenue growth when a market default is
/// used.
pub const DEFAULT_COST_GROWTH_RATIO: f64 = 0.8;

/// Growth and seasonality assumptions for a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Monthly revenue growth rate.
    pub revenue_growth: f64,
    /// Monthly cost growth rate, independent of revenue growth.
    pub cost_growth: f64,
    /// Per-month seasonal factors, cycled across the horizon.
    /// Empty means flat (`1.0` everywhere).
    pub seasonality: Vec<f64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::flat()
    }
}

impl ProjectionConfig {
    /// No growth, no seasonality.
    #[must_use]
    pub fn flat() -> Self {
        Self {
            revenue_growth: 0.0,
            cost_growth: 0.0,
            seasonality: Vec::new(),
        }
    }

    /// Market defaults: the market's monthly revenue growth, costs at
    /// [`DEFAULT_COST_GROWTH_RATIO`] of it, seasonal factors from `source`.
    #[must_use]
    pub fn for_market(market: MarketId, source: &dyn MarketDataSource) -> Self {
        let monthly = MarketProfile::for_market(market).monthly_growth_rate();
        Self {
            revenue_growth: monthly,
            cost_growth: monthly * DEFAULT_COST_GROWTH_RATIO,
            seasonality: source.seasonal_factors(market),
        }
    }

    /// Seasonal factor for a 1-based month index.
    #[must_use]
    pub fn seasonal_factor(&self, month: u32) -> f64 {
        if self.seasonality.is_empty() {
            1.0
        } else {
            let zero_based = month.saturating_sub(1) as usize;
            self.seasonality[zero_based % self.seasonality.len()]
        }
    }
}

/// Generate an N-month projection from aggregated base metrics.
///
/// For month `k` (1-based):
/// `revenue = base_revenue × seasonal_factor(k) × (1+revenue_growth)^(k-1)`,
/// `costs = base_costs × (1+cost_growth)^(k-1)`,
/// `profit = revenue - costs`, and `cumulative_profit` is the running sum of
/// profits seeded at zero.
#[must_use]
pub fn generate_projections(
    base: &FinancialMetrics,
    months: u32,
    config: &ProjectionConfig,
) -> Vec<MonthlyProjection> {
    let mut projections = Vec::with_capacity(months as usize);
    let mut cumulative_profit = 0.0;

    for month in 1..=months {
        let compound = (month - 1) as i32;
        let revenue = base.total_revenue
            * config.seasonal_factor(month)
            * (1.0 + config.revenue_growth).powi(compound);
        let costs = base.total_costs * (1.0 + config.cost_growth).powi(compound);
        let profit = revenue - costs;
        cumulative_profit += profit;

        projections.push(MonthlyProjection {
            month,
            revenue,
            costs,
            profit,
            cumulative_profit,
        });
    }
    projections
}
