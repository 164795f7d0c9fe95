//! The tagged message protocol
//!
//! Every public operation crosses the execution boundary as a tagged
//! request and comes back as exactly one matching response. Payloads are
//! plain serializable values; no memory is shared between caller and
//! worker beyond the copies in these messages.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use clubfin_core::error::EngineError;
use clubfin_core::model::{
    FinancialMetrics, FinancialVariable, MonteCarloSummary, MonthlyProjection, RecalculateResult,
    ScenarioSet, SensitivityResult, ValidationResult, VariableId,
};

/// Correlation tag, unique per call. Responses correlate by tag, never by
/// issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTag(pub u64);

/// Requests accepted by the computation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "payload",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum EngineRequest {
    Recalculate {
        force: bool,
    },
    AddVariable(FinancialVariable),
    UpdateVariable {
        id: VariableId,
        value: f64,
    },
    GetAllVariables,
    CalculateAggregatedMetrics,
    GenerateProjections {
        months: u32,
    },
    ValidateData,
    GenerateScenarios {
        months: u32,
    },
    SensitivityAnalysis {
        variable_id: VariableId,
        variations: Vec<f64>,
    },
    MonteCarlo {
        months: u32,
        iterations: usize,
    },
    /// Graceful worker exit.
    Shutdown,
}

impl EngineRequest {
    /// Whether this request kind gets a correlated response at all.
    /// `add_variable` and `update_variable` are fire-and-forget.
    #[must_use]
    pub fn expects_response(&self) -> bool {
        !matches!(
            self,
            Self::AddVariable(_) | Self::UpdateVariable { .. } | Self::Shutdown
        )
    }
}

/// Responses produced by the computation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum EngineResponse {
    RecalculateResult(RecalculateResult),
    GetAllVariablesResult(Vec<FinancialVariable>),
    CalculateAggregatedMetricsResult(FinancialMetrics),
    GenerateProjectionsResult(Vec<MonthlyProjection>),
    ValidateDataResult(ValidationResult),
    ScenariosResult(ScenarioSet),
    SensitivityResult(SensitivityResult),
    MonteCarloResult(MonteCarloSummary),
}

impl EngineResponse {
    /// Wire name of the response kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecalculateResult(_) => "recalculate_result",
            Self::GetAllVariablesResult(_) => "get_all_variables_result",
            Self::CalculateAggregatedMetricsResult(_) => "calculate_aggregated_metrics_result",
            Self::GenerateProjectionsResult(_) => "generate_projections_result",
            Self::ValidateDataResult(_) => "validate_data_result",
            Self::ScenariosResult(_) => "scenarios_result",
            Self::SensitivityResult(_) => "sensitivity_result",
            Self::MonteCarloResult(_) => "monte_carlo_result",
        }
    }
}

/// A tagged request on its way into the worker, carrying the private reply
/// channel for the calling side. `reply` is `None` for fire-and-forget
/// requests.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub tag: RequestTag,
    pub request: EngineRequest,
    pub reply: Option<Sender<Result<EngineResponse, EngineError>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_actions_match_protocol() {
        let json = serde_json::to_value(&EngineRequest::Recalculate { force: true }).unwrap();
        assert_eq!(json["action"], "recalculate");
        assert_eq!(json["payload"]["force"], true);

        let json = serde_json::to_value(&EngineRequest::GenerateProjections { months: 12 }).unwrap();
        assert_eq!(json["action"], "generate_projections");
        assert_eq!(json["payload"]["months"], 12);

        let json = serde_json::to_value(&EngineRequest::SensitivityAnalysis {
            variable_id: "rent".into(),
            variations: vec![-10.0, 10.0],
        })
        .unwrap();
        assert_eq!(json["action"], "sensitivity_analysis");
        assert_eq!(json["payload"]["variableId"], "rent");
    }

    #[test]
    fn test_response_wire_actions_match_protocol() {
        let resp = EngineResponse::ValidateDataResult(ValidationResult::valid());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["action"], "validate_data_result");
        assert_eq!(resp.kind(), "validate_data_result");

        let resp = EngineResponse::ScenariosResult(ScenarioSet {
            optimistic: Vec::new(),
            realistic: Vec::new(),
            pessimistic: Vec::new(),
        });
        assert_eq!(resp.kind(), "scenarios_result");
    }

    #[test]
    fn test_write_requests_are_fire_and_forget() {
        assert!(!EngineRequest::UpdateVariable { id: "x".into(), value: 1.0 }.expects_response());
        assert!(EngineRequest::GetAllVariables.expects_response());
        assert!(EngineRequest::Recalculate { force: false }.expects_response());
    }
}
