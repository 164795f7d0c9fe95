//! Engine configuration
//!
//! Growth, seasonality, and scenario assumptions are parameters owned by
//! the caller's composition root, not constants baked into the engine.

use serde::{Deserialize, Serialize};

use clubfin_core::model::{MarketId, StaticMarketData};
use clubfin_core::projection::ProjectionConfig;
use clubfin_core::scenario::ScenarioConfig;

/// Assumptions the worker applies to projection-shaped requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub market: MarketId,
    /// Growth and seasonality for projections. Defaults to the market's
    /// profile from the static market table.
    pub projection: ProjectionConfig,
    pub scenarios: ScenarioConfig,
    /// Horizon used for the projections embedded in `recalculate` results.
    pub default_projection_months: u32,
    /// Perturbation width for Monte Carlo requests.
    pub monte_carlo_uncertainty: f64,
    /// Base seed for Monte Carlo requests; same seed, same summary.
    pub monte_carlo_seed: u64,
}

impl EngineConfig {
    /// Market defaults from the built-in table.
    #[must_use]
    pub fn for_market(market: MarketId) -> Self {
        Self {
            market,
            projection: ProjectionConfig::for_market(market, &StaticMarketData),
            scenarios: ScenarioConfig::default(),
            default_projection_months: 12,
            monte_carlo_uncertainty: 0.1,
            monte_carlo_seed: 0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_market(MarketId::Brazil)
    }
}
