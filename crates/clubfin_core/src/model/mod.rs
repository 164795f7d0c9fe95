mod ids;
mod market;
mod results;
mod variables;

pub use ids::VariableId;
pub use market::{MarketDataSource, MarketId, MarketProfile, StaticMarketData};
pub use results::{
    FinancialMetrics, MonteCarloSummary, MonthlyProjection, RecalculateResult, ScenarioSet,
    SensitivityPoint, SensitivityResult, ValidationResult,
};
pub use variables::{Category, FinancialVariable, Unit};
