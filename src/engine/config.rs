// src/engine/config.rs

use crate::model::run::OptimizationRequest;
use crate::model::weights::WeightVector;
use crate::strategy::implementations::TieBreak;

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub total_demand: i64,
    pub min_avg_score: f64,
    pub weights: WeightVector,
    pub tie_break: TieBreak,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            total_demand: 1000,
            min_avg_score: 0.5,
            weights: WeightVector::default(), // price 0.3, quality 0.5, time 0.2
            tie_break: TieBreak::InputOrder,
        }
    }
}

impl OptimizerConfig {
    pub fn request(&self) -> OptimizationRequest {
        OptimizationRequest::new(self.total_demand, self.min_avg_score, self.weights)
    }
}
