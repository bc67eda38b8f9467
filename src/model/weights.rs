// src/model/weights.rs

use crate::error::OptimizeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a lower or a higher raw value is preferable for a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionKind {
    Cost,
    Benefit,
}

/// The three fixed evaluation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    Price,
    Quality,
    Time,
}

impl Criterion {
    /// Canonical order used for weights, matrices and persisted rows.
    pub const ALL: [Criterion; 3] = [Criterion::Price, Criterion::Quality, Criterion::Time];

    pub fn kind(self) -> CriterionKind {
        match self {
            Criterion::Price | Criterion::Time => CriterionKind::Cost,
            Criterion::Quality => CriterionKind::Benefit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Criterion::Price => "Price",
            Criterion::Quality => "Quality",
            Criterion::Time => "Time",
        }
    }

    fn index(self) -> usize {
        match self {
            Criterion::Price => 0,
            Criterion::Quality => 1,
            Criterion::Time => 2,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-criterion importance, ordered (price, quality, time).
///
/// Each weight must lie in `[0, 1]`. The weights are expected to sum to 1 but this
/// is only logged, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub price: f64,
    pub quality: f64,
    pub time: f64,
}

impl WeightVector {
    pub fn new(price: f64, quality: f64, time: f64) -> Self {
        Self {
            price,
            quality,
            time,
        }
    }

    /// Builds a vector from whole-number percentages, as entered on the weight sliders.
    pub fn from_percentages(price: u32, quality: u32, time: u32) -> Self {
        Self::new(
            f64::from(price) / 100.0,
            f64::from(quality) / 100.0,
            f64::from(time) / 100.0,
        )
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.as_array()[criterion.index()]
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.price, self.quality, self.time]
    }

    pub fn sum(&self) -> f64 {
        self.price + self.quality + self.time
    }

    /// Rejects negative, non-finite or greater-than-one weights.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        for criterion in Criterion::ALL {
            let value = self.get(criterion);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(OptimizeError::InvalidWeight { criterion, value });
            }
        }
        Ok(())
    }

    /// Sets one weight and spreads the remainder over the other two criteria in
    /// proportion to their current values, so the result sums to 1.
    ///
    /// When the other two weights are both zero the remainder is split evenly.
    /// `value` is clamped to `[0, 1]`.
    pub fn rebalance(&self, criterion: Criterion, value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let remainder = 1.0 - value;

        let (first, second) = match criterion {
            Criterion::Price => (Criterion::Quality, Criterion::Time),
            Criterion::Quality => (Criterion::Price, Criterion::Time),
            Criterion::Time => (Criterion::Price, Criterion::Quality),
        };
        let other_sum = self.get(first) + self.get(second);

        let first_value = if other_sum > 0.0 {
            remainder * (self.get(first) / other_sum)
        } else {
            remainder / 2.0
        };
        let second_value = remainder - first_value;

        let mut weights = [0.0; 3];
        weights[criterion.index()] = value;
        weights[first.index()] = first_value;
        weights[second.index()] = second_value;
        Self::new(weights[0], weights[1], weights[2])
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::new(0.3, 0.5, 0.2)
    }
}

impl From<(f64, f64, f64)> for WeightVector {
    fn from((price, quality, time): (f64, f64, f64)) -> Self {
        Self::new(price, quality, time)
    }
}
