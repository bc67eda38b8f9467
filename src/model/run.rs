// src/model/run.rs

use crate::error::OptimizeError;
use crate::model::supplier::AllocationResult;
use crate::model::weights::WeightVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Parameters of a single optimisation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub total_demand: i64,
    pub min_avg_score: f64,
    pub weights: WeightVector,
}

impl OptimizationRequest {
    pub fn new(total_demand: i64, min_avg_score: f64, weights: impl Into<WeightVector>) -> Self {
        Self {
            total_demand,
            min_avg_score,
            weights: weights.into(),
        }
    }

    /// Checks demand, score threshold and weights, returning the demand as a unit count.
    pub fn validate(&self) -> Result<u64, OptimizeError> {
        let demand = u64::try_from(self.total_demand)
            .ok()
            .filter(|d| *d > 0)
            .ok_or(OptimizeError::NonPositiveDemand(self.total_demand))?;
        if !self.min_avg_score.is_finite() {
            return Err(OptimizeError::InvalidScore(self.min_avg_score));
        }
        self.weights.validate()?;
        Ok(demand)
    }
}

/// Overall verdict of a run. Supply shortfall takes precedence over low quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    InsufficientSupply,
    LowQuality,
    Optimal,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStatus::InsufficientSupply => "Insufficient Supply",
            RunStatus::LowQuality => "Low Quality",
            RunStatus::Optimal => "Optimal",
        };
        f.write_str(label)
    }
}

/// Aggregate cost and quality of an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_cost: f64,
    pub final_avg_score: f64,
    pub is_supply_met: bool,
    pub is_quality_met: bool,
    pub allocated_units: u64,
    pub unmet_demand: u64,
}

impl RunSummary {
    /// Folds allocation rows into a summary.
    ///
    /// The average score is weighted by allocated units and divided by the full demand,
    /// so unmet demand pulls it down. A zero demand yields an average of 0.
    pub fn from_results(results: &[AllocationResult], total_demand: u64, min_avg_score: f64) -> Self {
        let mut total_cost = 0.0;
        let mut weighted_score_sum = 0.0;
        let mut allocated_units = 0u64;

        for result in results {
            total_cost += result.item_cost;
            weighted_score_sum += result.allocated_units as f64 * result.topsis_score;
            allocated_units += result.allocated_units;
        }

        let final_avg_score = if total_demand == 0 {
            0.0
        } else {
            weighted_score_sum / total_demand as f64
        };
        let unmet_demand = total_demand.saturating_sub(allocated_units);

        Self {
            total_cost,
            final_avg_score,
            is_supply_met: unmet_demand == 0,
            is_quality_met: final_avg_score >= min_avg_score,
            allocated_units,
            unmet_demand,
        }
    }

    pub fn status(&self) -> RunStatus {
        if !self.is_supply_met {
            RunStatus::InsufficientSupply
        } else if !self.is_quality_met {
            RunStatus::LowQuality
        } else {
            RunStatus::Optimal
        }
    }
}

/// Identifier handed out by a run recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable historical record of one optimisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub name: String,
    pub created_at_ms: u64,
    pub request: OptimizationRequest,
    pub results: Vec<AllocationResult>,
    pub summary: RunSummary,
}

impl Run {
    pub fn new(
        request: OptimizationRequest,
        results: Vec<AllocationResult>,
        summary: RunSummary,
    ) -> Self {
        let created_at_ms = now_ms();
        Self {
            name: format!("Run {created_at_ms}"),
            created_at_ms,
            request,
            results,
            summary,
        }
    }

    pub fn weights(&self) -> WeightVector {
        self.request.weights
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
