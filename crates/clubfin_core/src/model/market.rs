//! Market profiles and the external market-data seam
//!
//! Growth and seasonality are market facts, not engine output. The engine
//! consumes them through [`MarketDataSource`]; [`StaticMarketData`] carries
//! the built-in per-market table (club pricing research for Brazil, Europe,
//! and the United Arab Emirates).

use serde::{Deserialize, Serialize};

/// Supported target markets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketId {
    Brazil,
    Europe,
    UnitedArabEmirates,
}

/// Per-market financial assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    pub market: MarketId,
    pub currency: String,
    /// Composite sales-tax burden on revenue.
    pub tax_rate: f64,
    pub inflation_rate: f64,
    /// Discount rate for present-value style metrics.
    pub discount_rate: f64,
    /// Expected annual revenue growth for a club in this market.
    pub annual_growth_rate: f64,
}

impl MarketProfile {
    /// Built-in profile for a market.
    #[must_use]
    pub fn for_market(market: MarketId) -> Self {
        match market {
            MarketId::Brazil => Self {
                market,
                currency: "R$".to_owned(),
                tax_rate: 0.163,
                inflation_rate: 0.065,
                discount_rate: 0.12,
                annual_growth_rate: 0.15,
            },
            MarketId::Europe => Self {
                market,
                currency: "€".to_owned(),
                tax_rate: 0.25,
                inflation_rate: 0.03,
                discount_rate: 0.08,
                annual_growth_rate: 0.08,
            },
            MarketId::UnitedArabEmirates => Self {
                market,
                currency: "AED".to_owned(),
                tax_rate: 0.05,
                inflation_rate: 0.02,
                discount_rate: 0.06,
                annual_growth_rate: 0.12,
            },
        }
    }

    /// Annual growth compounded monthly.
    #[must_use]
    pub fn monthly_growth_rate(&self) -> f64 {
        self.annual_growth_rate / 12.0
    }
}

/// External source of per-market seasonal factors and growth defaults.
///
/// The presentation layer may plug in live market feeds; the engine only
/// ever reads through this trait.
pub trait MarketDataSource {
    /// Twelve monthly seasonal factors, 1.0 = no seasonal effect.
    fn seasonal_factors(&self, market: MarketId) -> Vec<f64>;

    /// Default annual revenue growth rate for the market.
    fn annual_growth_rate(&self, market: MarketId) -> f64;
}

/// The built-in static market table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMarketData;

impl MarketDataSource for StaticMarketData {
    fn seasonal_factors(&self, _market: MarketId) -> Vec<f64> {
        // No observed monthly pattern in the source data; flat until a
        // market feed supplies a real curve.
        vec![1.0; 12]
    }

    fn annual_growth_rate(&self, market: MarketId) -> f64 {
        MarketProfile::for_market(market).annual_growth_rate
    }
}
