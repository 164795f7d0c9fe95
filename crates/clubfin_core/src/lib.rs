//! Financial-variable computation library
//!
//! This crate provides the computation core for club viability analysis.
//! It supports:
//! - A named, dependency-linked variable set (revenues, costs, derived metrics)
//! - Deterministic dependency resolution with full-chain cycle reporting
//! - Safe formula evaluation over a closed expression AST
//! - Category aggregation into summary metrics (totals, margin, ROI, break-even)
//! - Month-indexed projections with market growth and seasonality
//! - Optimistic/realistic/pessimistic scenario sets
//! - Single-variable sensitivity sweeps over the affected subgraph
//! - Seeded Monte Carlo perturbation of the projection assumptions
//! - Exhaustive structural and business validation
//!
//! The crate is pure computation: no threads, no channels. The isolated
//! execution context and its message protocol live in `clubfin_engine`.
//!
//! ```ignore
//! use clubfin_core::model::{Category, FinancialVariable, Unit};
//! use clubfin_core::store::VariableStore;
//! use clubfin_core::{evaluate, metrics};
//!
//! let mut store = VariableStore::from_variables([
//!     FinancialVariable::input("rev", "Court revenue", 5000.0, Category::Revenue, Unit::Currency),
//!     FinancialVariable::input("rent", "Rent", 1000.0, Category::Cost, Unit::Currency),
//! ])?;
//! evaluate::recompute(&mut store)?;
//! let metrics = metrics::aggregate_metrics(store.iter());
//! assert_eq!(metrics.net_profit, 4000.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod evaluate;
pub mod formula;
pub mod metrics;
pub mod projection;
pub mod resolve;
pub mod scenario;
pub mod sensitivity;
pub mod simulation;
pub mod store;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{EngineError, NumericWarning};
pub use formula::Formula;
pub use projection::ProjectionConfig;
pub use scenario::ScenarioConfig;
pub use simulation::MonteCarloConfig;
pub use store::VariableStore;
