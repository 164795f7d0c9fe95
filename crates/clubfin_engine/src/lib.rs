//! Execution boundary for the clubfin computation core
//!
//! The engine runs in a dedicated single-threaded computation context,
//! fully isolated from the caller. Every public operation is a tagged
//! request that suspends the caller until its own correlated response
//! arrives; responses never correlate by issue order. The variable store
//! is owned and mutated only inside the context; callers exchange copies.
//!
//! ```ignore
//! use clubfin_core::model::{Category, FinancialVariable, Unit};
//! use clubfin_engine::FinancialEngine;
//!
//! let engine = FinancialEngine::new();
//! engine.add_variable(FinancialVariable::input(
//!     "rev", "Court revenue", 5000.0, Category::Revenue, Unit::Currency,
//! ));
//! engine.add_variable(FinancialVariable::input(
//!     "rent", "Rent", 1000.0, Category::Cost, Unit::Currency,
//! ));
//! let result = engine.recalculate(true)?;
//! assert_eq!(result.metrics.net_profit, 4000.0);
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod protocol;

mod worker;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use engine::FinancialEngine;
pub use error::EngineCallError;
pub use protocol::{EngineRequest, EngineResponse, RequestTag};
