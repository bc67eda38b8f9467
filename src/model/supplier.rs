// src/model/supplier.rs

use crate::error::OptimizeError;
use crate::model::weights::Criterion;
use serde::{Deserialize, Serialize};

/// Highest quality rating a supplier can carry.
pub const MAX_QUALITY: f64 = 10.0;

/// A row of the supplier catalog. Immutable input to a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub quality: f64, // 0..=10, higher is better
    pub time: f64,    // lead time, lower is better
    pub capacity: u64,
}

impl Supplier {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        price: f64,
        quality: f64,
        time: f64,
        capacity: u64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quality,
            time,
            capacity,
        }
    }

    /// Raw attribute value for one criterion.
    pub fn value(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Price => self.price,
            Criterion::Quality => self.quality,
            Criterion::Time => self.time,
        }
    }

    pub fn validate(&self) -> Result<(), OptimizeError> {
        let invalid = |field: &'static str, value: f64| OptimizeError::InvalidSupplier {
            id: self.id,
            field,
            value,
        };

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid("price", self.price));
        }
        if !self.quality.is_finite() || !(0.0..=MAX_QUALITY).contains(&self.quality) {
            return Err(invalid("quality", self.quality));
        }
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(invalid("time", self.time));
        }
        Ok(())
    }
}

/// A supplier together with its closeness to the ideal solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSupplier {
    pub supplier: Supplier,
    pub topsis_score: f64,
}

/// Units assigned to one supplier in a run, with their cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub supplier: Supplier,
    pub topsis_score: f64,
    pub allocated_units: u64,
    pub item_cost: f64,
}

impl AllocationResult {
    pub fn new(scored: ScoredSupplier, allocated_units: u64) -> Self {
        let item_cost = allocated_units as f64 * scored.supplier.price;
        Self {
            supplier: scored.supplier,
            topsis_score: scored.topsis_score,
            allocated_units,
            item_cost,
        }
    }

    /// Fraction of the total demand served by this supplier (0 for zero demand).
    pub fn demand_share(&self, total_demand: u64) -> f64 {
        if total_demand == 0 {
            return 0.0;
        }
        self.allocated_units as f64 / total_demand as f64
    }
}
