//! The computation context
//!
//! A dedicated single-threaded worker exclusively owns the variable store
//! and services one request at a time; nothing yields mid-recompute. When
//! the inbox holds several `recalculate` requests, older ones are
//! superseded: their reply channels are dropped and only the newest is
//! answered, so callers never see partial or duplicate responses.

use std::sync::mpsc::Receiver;

use tracing::{debug, warn};

use clubfin_core::error::EngineError;
use clubfin_core::evaluate::evaluate_ordered;
use clubfin_core::metrics::aggregate_metrics;
use clubfin_core::model::RecalculateResult;
use clubfin_core::projection::generate_projections;
use clubfin_core::resolve::evaluation_order;
use clubfin_core::scenario::generate_scenarios;
use clubfin_core::sensitivity::sensitivity_analysis;
use clubfin_core::simulation::{MonteCarloConfig, monte_carlo};
use clubfin_core::store::VariableStore;
use clubfin_core::validation::validate;

use crate::config::EngineConfig;
use crate::protocol::{EngineRequest, EngineResponse, Envelope};

/// Stage of an in-flight recompute. The `Error` terminal state is reachable
/// from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecomputePhase {
    Idle,
    Resolving,
    Evaluating,
    Aggregating,
    Done,
    Error,
}

/// Worker-side engine state. Lives entirely on the worker thread; the
/// store's internal mapping is never shared with callers.
pub(crate) struct WorkerContext {
    config: EngineConfig,
    store: VariableStore,
    /// Last successful recompute, returned for `recalculate{force: false}`
    /// while no variable has changed since.
    cache: Option<RecalculateResult>,
    dirty: bool,
}

impl WorkerContext {
    pub(crate) fn new(config: EngineConfig) -> Self {
        Self {
            config,
            store: VariableStore::new(),
            cache: None,
            dirty: false,
        }
    }

    /// Main loop: drain the inbox into a batch, supersede stale
    /// recalculates, service the rest in order. Returns when a `Shutdown`
    /// request arrives or every handle is gone.
    pub(crate) fn run(mut self, request_rx: Receiver<Envelope>) {
        debug!(market = ?self.config.market, "computation context started");
        while let Ok(first) = request_rx.recv() {
            let mut batch = vec![first];
            while let Ok(next) = request_rx.try_recv() {
                batch.push(next);
            }
            for envelope in coalesce_recalculates(batch) {
                if matches!(envelope.request, EngineRequest::Shutdown) {
                    debug!("computation context shutting down");
                    return;
                }
                self.handle(envelope);
            }
        }
        debug!("all handles dropped; computation context exiting");
    }

    fn handle(&mut self, envelope: Envelope) {
        let Envelope { tag, request, reply } = envelope;
        debug!(tag = tag.0, request = request_name(&request), "request");

        let result = match request {
            EngineRequest::Recalculate { force } => self.recalculate(force).map(EngineResponse::RecalculateResult),
            EngineRequest::AddVariable(variable) => {
                let id = variable.id.clone();
                match self.store.add(variable) {
                    Ok(()) => self.dirty = true,
                    Err(e) => warn!(variable = %id, error = %e, "add_variable rejected"),
                }
                return;
            }
            EngineRequest::UpdateVariable { id, value } => {
                match self.store.update(&id, value) {
                    Ok(()) => self.dirty = true,
                    Err(e) => warn!(variable = %id, error = %e, "update_variable rejected"),
                }
                return;
            }
            EngineRequest::GetAllVariables => {
                Ok(EngineResponse::GetAllVariablesResult(self.store.snapshot()))
            }
            EngineRequest::CalculateAggregatedMetrics => Ok(
                EngineResponse::CalculateAggregatedMetricsResult(aggregate_metrics(self.store.iter())),
            ),
            EngineRequest::GenerateProjections { months } => {
                let metrics = aggregate_metrics(self.store.iter());
                Ok(EngineResponse::GenerateProjectionsResult(generate_projections(
                    &metrics,
                    months,
                    &self.config.projection,
                )))
            }
            EngineRequest::ValidateData => Ok(EngineResponse::ValidateDataResult(validate(
                &self.store.snapshot(),
            ))),
            EngineRequest::GenerateScenarios { months } => {
                let metrics = aggregate_metrics(self.store.iter());
                Ok(EngineResponse::ScenariosResult(generate_scenarios(
                    &metrics,
                    months,
                    &self.config.projection,
                    &self.config.scenarios,
                )))
            }
            EngineRequest::SensitivityAnalysis { variable_id, variations } => {
                sensitivity_analysis(&self.store, &variable_id, &variations)
                    .map(EngineResponse::SensitivityResult)
            }
            EngineRequest::MonteCarlo { months, iterations } => {
                let metrics = aggregate_metrics(self.store.iter());
                let mc = MonteCarloConfig {
                    iterations,
                    uncertainty: self.config.monte_carlo_uncertainty,
                    months,
                };
                Ok(EngineResponse::MonteCarloResult(monte_carlo(
                    &metrics,
                    &self.config.projection,
                    &mc,
                    self.config.monte_carlo_seed,
                )))
            }
            EngineRequest::Shutdown => return,
        };

        if let Some(reply) = reply {
            // A send error means the caller gave up on a stale tag; drop
            // the response rather than deliver it out of band.
            let _ = reply.send(result);
        }
    }

    /// One full recompute: `Idle → Resolving → Evaluating → Aggregating →
    /// Done`, with `Error` cutting out of any stage. Exactly one recompute
    /// runs at a time; the loop in [`WorkerContext::run`] never re-enters.
    fn recalculate(&mut self, force: bool) -> Result<RecalculateResult, EngineError> {
        if !force && !self.dirty {
            if let Some(cached) = &self.cache {
                debug!("recalculate served from last known good result");
                return Ok(cached.clone());
            }
        }

        let mut phase = RecomputePhase::Idle;
        debug!(?phase, force, "recompute requested");

        phase = RecomputePhase::Resolving;
        debug!(?phase, "recompute");
        let order = match evaluation_order(&self.store) {
            Ok(order) => order,
            Err(e) => {
                phase = RecomputePhase::Error;
                warn!(?phase, error = %e, "recompute aborted");
                return Err(e);
            }
        };

        phase = RecomputePhase::Evaluating;
        debug!(?phase, variables = order.len(), "recompute");
        let numeric_warnings = evaluate_ordered(&mut self.store, &order);

        phase = RecomputePhase::Aggregating;
        debug!(?phase, "recompute");
        let variables = self.store.snapshot();
        let metrics = aggregate_metrics(&variables);
        let projections = generate_projections(
            &metrics,
            self.config.default_projection_months,
            &self.config.projection,
        );
        let mut validation = validate(&variables);
        validation
            .warnings
            .extend(numeric_warnings.iter().map(ToString::to_string));

        phase = RecomputePhase::Done;
        debug!(?phase, warnings = validation.warnings.len(), "recompute");

        let result = RecalculateResult {
            variables,
            metrics,
            projections,
            validation,
        };
        self.cache = Some(result.clone());
        self.dirty = false;
        Ok(result)
    }
}

/// Keep only the newest `recalculate` in a drained batch; everything else
/// stays in arrival order. Dropped envelopes take their reply channels with
/// them, which is what supersedes the stale callers.
fn coalesce_recalculates(batch: Vec<Envelope>) -> Vec<Envelope> {
    let newest = batch
        .iter()
        .rposition(|e| matches!(e.request, EngineRequest::Recalculate { .. }));
    let Some(newest) = newest else {
        return batch;
    };

    let before = batch.len();
    let kept: Vec<Envelope> = batch
        .into_iter()
        .enumerate()
        .filter(|(i, e)| !matches!(e.request, EngineRequest::Recalculate { .. }) || *i == newest)
        .map(|(_, e)| e)
        .collect();
    if kept.len() < before {
        debug!(superseded = before - kept.len(), "stale recalculate requests dropped");
    }
    kept
}

fn request_name(request: &EngineRequest) -> &'static str {
    match request {
        EngineRequest::Recalculate { .. } => "recalculate",
        EngineRequest::AddVariable(_) => "add_variable",
        EngineRequest::UpdateVariable { .. } => "update_variable",
        EngineRequest::GetAllVariables => "get_all_variables",
        EngineRequest::CalculateAggregatedMetrics => "calculate_aggregated_metrics",
        EngineRequest::GenerateProjections { .. } => "generate_projections",
        EngineRequest::ValidateData => "validate_data",
        EngineRequest::GenerateScenarios { .. } => "generate_scenarios",
        EngineRequest::SensitivityAnalysis { .. } => "sensitivity_analysis",
        EngineRequest::MonteCarlo { .. } => "monte_carlo",
        EngineRequest::Shutdown => "shutdown",
    }
}
