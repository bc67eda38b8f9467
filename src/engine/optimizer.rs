// src/engine/optimizer.rs

use crate::engine::config::OptimizerConfig;
use crate::error::{OptimizeError, PersistenceError};
use crate::io::recorder::RunRecorder;
use crate::model::run::{OptimizationRequest, Run, RunId, RunSummary};
use crate::model::supplier::{AllocationResult, Supplier};
use crate::strategy::implementations::GreedyByScore;
use crate::strategy::topsis::score_suppliers;
use crate::strategy::traits::AllocationPolicy;
use log::{error, info, warn};
use serde::Serialize;

/// Tolerance used when checking that weights add up to 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Allocation rows (best score first) and their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationOutcome {
    pub results: Vec<AllocationResult>,
    pub summary: RunSummary,
}

/// Outcome of an optimisation followed by a recording attempt.
///
/// The computed outcome is always present; `run_id` carries the recorder's verdict.
#[derive(Debug)]
pub struct RecordedOutcome {
    pub outcome: OptimizationOutcome,
    pub run_id: Result<RunId, PersistenceError>,
}

/// Scores a catalog snapshot and allocates demand using an allocation policy.
#[derive(Debug, Clone)]
pub struct Optimizer<P: AllocationPolicy = GreedyByScore> {
    policy: P,
}

impl Optimizer<GreedyByScore> {
    pub fn new() -> Self {
        Self::with_policy(GreedyByScore::default())
    }

    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::with_policy(GreedyByScore::new(config.tie_break))
    }
}

impl Default for Optimizer<GreedyByScore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: AllocationPolicy> Optimizer<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Runs scoring and allocation over `suppliers`.
    ///
    /// The slice is the catalog snapshot for this call; it is read but never mutated or
    /// reloaded, so concurrent catalog edits cannot affect the result.
    pub fn optimize(
        &self,
        suppliers: &[Supplier],
        request: &OptimizationRequest,
    ) -> Result<OptimizationOutcome, OptimizeError> {
        if suppliers.is_empty() {
            return Err(OptimizeError::EmptySupplierSet);
        }
        let total_demand = request.validate()?;
        for supplier in suppliers {
            supplier.validate()?;
        }

        let weight_sum = request.weights.sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!("weights sum to {weight_sum:.4}, expected 1");
        }

        let scored = score_suppliers(suppliers, &request.weights)?;
        let results = self.policy.allocate(&scored, total_demand)?;
        let summary = RunSummary::from_results(&results, total_demand, request.min_avg_score);

        info!(
            "optimized {} suppliers for demand {}: cost={:.2} avg_score={:.4} status={}",
            suppliers.len(),
            total_demand,
            summary.total_cost,
            summary.final_avg_score,
            summary.status()
        );
        if !summary.is_supply_met {
            warn!(
                "aggregate capacity short of demand by {} units",
                summary.unmet_demand
            );
        }
        if !summary.is_quality_met {
            warn!(
                "average score {:.4} below threshold {:.4}",
                summary.final_avg_score, request.min_avg_score
            );
        }

        Ok(OptimizationOutcome { results, summary })
    }

    /// Optimises and then hands the run to `recorder`.
    ///
    /// Input errors abort before anything is recorded. A recording failure is reported in
    /// `run_id` and leaves the computed outcome intact.
    pub fn optimize_and_record<R: RunRecorder + ?Sized>(
        &self,
        suppliers: &[Supplier],
        request: &OptimizationRequest,
        recorder: &mut R,
    ) -> Result<RecordedOutcome, OptimizeError> {
        let outcome = self.optimize(suppliers, request)?;
        let run = Run::new(*request, outcome.results.clone(), outcome.summary);

        let run_id = recorder.record_run(&run);
        match &run_id {
            Ok(id) => info!("recorded run {id} ({})", run.name),
            Err(e) => error!("failed to record run: {e}"),
        }

        Ok(RecordedOutcome { outcome, run_id })
    }
}

/// Scores and allocates with the default greedy policy (ties kept in input order).
pub fn optimize(
    suppliers: &[Supplier],
    total_demand: i64,
    min_avg_score: f64,
    weights: (f64, f64, f64),
) -> Result<OptimizationOutcome, OptimizeError> {
    let request = OptimizationRequest::new(total_demand, min_avg_score, weights);
    Optimizer::new().optimize(suppliers, &request)
}
