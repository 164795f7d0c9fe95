//! The caller-side engine handle
//!
//! [`FinancialEngine`] owns the worker thread and is the only way in: every
//! operation allocates a unique tag and a private reply channel, sends a
//! tagged envelope, and blocks until its own response arrives. The handle
//! is created and torn down explicitly by the caller's composition root;
//! there is no global instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Sender, channel};
use std::thread::{self, JoinHandle};

use tracing::debug;

use clubfin_core::model::{
    FinancialMetrics, FinancialVariable, MonteCarloSummary, MonthlyProjection, RecalculateResult,
    ScenarioSet, SensitivityResult, ValidationResult, VariableId,
};

use crate::config::EngineConfig;
use crate::error::EngineCallError;
use crate::protocol::{EngineRequest, EngineResponse, Envelope, RequestTag};
use crate::worker::WorkerContext;

/// Handle to an isolated financial computation context.
pub struct FinancialEngine {
    request_tx: Sender<Envelope>,
    thread: Option<JoinHandle<()>>,
    next_tag: AtomicU64,
}

impl FinancialEngine {
    /// Start an engine with market defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Start an engine with explicit assumptions.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let (request_tx, request_rx) = channel();
        let ctx = WorkerContext::new(config);
        let thread = thread::spawn(move || ctx.run(request_rx));
        Self {
            request_tx,
            thread: Some(thread),
            next_tag: AtomicU64::new(0),
        }
    }

    /// Full recompute. With `force` false the last known good result is
    /// returned when no variable changed since it was computed.
    pub fn recalculate(&self, force: bool) -> Result<RecalculateResult, EngineCallError> {
        match self.call(EngineRequest::Recalculate { force })? {
            EngineResponse::RecalculateResult(result) => Ok(result),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Add a variable. Fire-and-forget: a duplicate id is rejected inside
    /// the computation context and logged, the store left unchanged.
    pub fn add_variable(&self, variable: FinancialVariable) {
        self.cast(EngineRequest::AddVariable(variable));
    }

    /// Set an existing variable's value. Fire-and-forget; never
    /// auto-creates.
    pub fn update_variable(&self, id: impl Into<VariableId>, value: f64) {
        self.cast(EngineRequest::UpdateVariable {
            id: id.into(),
            value,
        });
    }

    /// Insertion-ordered snapshot of the variable set.
    pub fn get_all_variables(&self) -> Result<Vec<FinancialVariable>, EngineCallError> {
        match self.call(EngineRequest::GetAllVariables)? {
            EngineResponse::GetAllVariablesResult(variables) => Ok(variables),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Aggregate the current values into summary metrics.
    pub fn calculate_aggregated_metrics(&self) -> Result<FinancialMetrics, EngineCallError> {
        match self.call(EngineRequest::CalculateAggregatedMetrics)? {
            EngineResponse::CalculateAggregatedMetricsResult(metrics) => Ok(metrics),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Project the current aggregates across `months`.
    pub fn generate_projections(
        &self,
        months: u32,
    ) -> Result<Vec<MonthlyProjection>, EngineCallError> {
        match self.call(EngineRequest::GenerateProjections { months })? {
            EngineResponse::GenerateProjectionsResult(projections) => Ok(projections),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Exhaustive structural and business validation of the variable set.
    pub fn validate_data(&self) -> Result<ValidationResult, EngineCallError> {
        match self.call(EngineRequest::ValidateData)? {
            EngineResponse::ValidateDataResult(result) => Ok(result),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Optimistic/realistic/pessimistic projections over the same horizon.
    pub fn generate_scenarios(&self, months: u32) -> Result<ScenarioSet, EngineCallError> {
        match self.call(EngineRequest::GenerateScenarios { months })? {
            EngineResponse::ScenariosResult(set) => Ok(set),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Sweep one variable across percentage deltas.
    pub fn sensitivity_analysis(
        &self,
        variable_id: impl Into<VariableId>,
        variations: Vec<f64>,
    ) -> Result<SensitivityResult, EngineCallError> {
        match self.call(EngineRequest::SensitivityAnalysis {
            variable_id: variable_id.into(),
            variations,
        })? {
            EngineResponse::SensitivityResult(result) => Ok(result),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Randomized projection sampling of the current aggregates.
    pub fn monte_carlo(
        &self,
        months: u32,
        iterations: usize,
    ) -> Result<MonteCarloSummary, EngineCallError> {
        match self.call(EngineRequest::MonteCarlo { months, iterations })? {
            EngineResponse::MonteCarloResult(summary) => Ok(summary),
            other => Err(EngineCallError::UnexpectedResponse(other.kind())),
        }
    }

    /// Ask the worker to exit after draining already-queued requests.
    pub fn shutdown(&self) {
        self.cast(EngineRequest::Shutdown);
    }

    fn next_tag(&self) -> RequestTag {
        RequestTag(self.next_tag.fetch_add(1, Ordering::Relaxed))
    }

    /// Correlated call: block until the response for this tag arrives.
    fn call(&self, request: EngineRequest) -> Result<EngineResponse, EngineCallError> {
        let tag = self.next_tag();
        let (reply_tx, reply_rx) = channel();
        self.request_tx
            .send(Envelope {
                tag,
                request,
                reply: Some(reply_tx),
            })
            .map_err(|_| EngineCallError::Disconnected)?;

        match reply_rx.recv() {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(EngineCallError::Engine(e)),
            // The worker dropped our reply channel: either a newer request
            // superseded this one, or the context died mid-flight.
            Err(_) => {
                if self.worker_alive() {
                    debug!(tag = tag.0, "call superseded");
                    Err(EngineCallError::Superseded)
                } else {
                    Err(EngineCallError::Disconnected)
                }
            }
        }
    }

    fn cast(&self, request: EngineRequest) {
        let tag = self.next_tag();
        let _ = self.request_tx.send(Envelope {
            tag,
            request,
            reply: None,
        });
    }

    fn worker_alive(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Default for FinancialEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FinancialEngine {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
