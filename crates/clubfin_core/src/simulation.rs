//! Randomized projection sampling
//!
//! Monte Carlo perturbation of the base revenue/cost assumptions: each run
//! scales the aggregated base by normally distributed factors and replays
//! the projection, and the final cumulative profits are summarized as a
//! distribution. Runs are seeded per iteration, so a given seed reproduces
//! the same summary whether or not the `parallel` feature fans the work out.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::model::{FinancialMetrics, MonteCarloSummary};
use crate::projection::{ProjectionConfig, generate_projections};

/// Perturbation factors below this are clamped; a club cannot lose more
/// than 90% of revenue to sampling noise in one draw.
const MIN_FACTOR: f64 = 0.1;

/// Parameters for a Monte Carlo run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub iterations: usize,
    /// Standard deviation of the perturbation factors around 1.0.
    pub uncertainty: f64,
    pub months: u32,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            uncertainty: 0.1,
            months: 12,
        }
    }
}

/// Sample `iterations` perturbed projections and summarize the final
/// cumulative profit distribution.
#[must_use]
pub fn monte_carlo(
    base: &FinancialMetrics,
    projection: &ProjectionConfig,
    config: &MonteCarloConfig,
    seed: u64,
) -> MonteCarloSummary {
    if config.iterations == 0 {
        return MonteCarloSummary {
            iterations: 0,
            mean_final_profit: 0.0,
            p5: 0.0,
            p50: 0.0,
            p95: 0.0,
            success_rate: 0.0,
        };
    }

    let normal = Normal::new(1.0, config.uncertainty.max(0.0)).ok();

    #[cfg(feature = "parallel")]
    let mut outcomes: Vec<f64> = (0..config.iterations)
        .into_par_iter()
        .map(|i| run_once(i as u64, seed, base, projection, config, normal.as_ref()))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut outcomes: Vec<f64> = (0..config.iterations)
        .map(|i| run_once(i as u64, seed, base, projection, config, normal.as_ref()))
        .collect();

    outcomes.sort_by(|a, b| a.total_cmp(b));
    let successes = outcomes.iter().filter(|&&profit| profit > 0.0).count();
    let mean = outcomes.iter().sum::<f64>() / outcomes.len() as f64;

    MonteCarloSummary {
        iterations: config.iterations,
        mean_final_profit: mean,
        p5: percentile(&outcomes, 0.05),
        p50: percentile(&outcomes, 0.50),
        p95: percentile(&outcomes, 0.95),
        success_rate: successes as f64 / outcomes.len() as f64,
    }
}

fn run_once(
    iteration: u64,
    seed: u64,
    base: &FinancialMetrics,
    projection: &ProjectionConfig,
    config: &MonteCarloConfig,
    normal: Option<&Normal<f64>>,
) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(iteration));
    let mut draw = || match normal {
        Some(dist) => dist.sample(&mut rng).max(MIN_FACTOR),
        None => 1.0,
    };
    let revenue_factor = draw();
    let cost_factor = draw();

    let perturbed = FinancialMetrics {
        total_revenue: base.total_revenue * revenue_factor,
        total_costs: base.total_costs * cost_factor,
        ..*base
    };
    generate_projections(&perturbed, config.months, projection)
        .last()
        .map_or(0.0, |p| p.cumulative_profit)
}

/// Sorted-sample percentile, index-based as in the source analytics.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[idx]
}
