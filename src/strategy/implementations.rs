// src/strategy/implementations.rs

use crate::error::OptimizeError;
use crate::model::supplier::{AllocationResult, ScoredSupplier};
use crate::strategy::traits::AllocationPolicy;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How suppliers with equal scores are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Keep catalog order.
    #[default]
    InputOrder,
    /// Cheaper supplier first, then catalog order.
    LowestPrice,
}

// =========================================================================
// Greedy best-score-first allocation
// =========================================================================

/// Fills demand from the highest-scored supplier down, each up to its capacity.
///
/// This is a heuristic: a cheaper supplier with a lower score and spare capacity can be
/// skipped, so the total cost is not guaranteed to be minimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyByScore {
    tie_break: TieBreak,
}

impl GreedyByScore {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Stable sort by descending score, applying the tie-break on equal scores.
    pub fn rank(&self, scored: &[ScoredSupplier]) -> Vec<ScoredSupplier> {
        let mut ranked = scored.to_vec();
        let tie_break = self.tie_break;
        ranked.sort_by(|a, b| {
            let by_score = b.topsis_score.total_cmp(&a.topsis_score);
            match (by_score, tie_break) {
                (Ordering::Equal, TieBreak::LowestPrice) => {
                    a.supplier.price.total_cmp(&b.supplier.price)
                }
                (ordering, _) => ordering,
            }
        });
        ranked
    }
}

impl AllocationPolicy for GreedyByScore {
    fn allocate(
        &self,
        scored: &[ScoredSupplier],
        total_demand: u64,
    ) -> Result<Vec<AllocationResult>, OptimizeError> {
        if total_demand == 0 {
            return Err(OptimizeError::NonPositiveDemand(0));
        }

        let mut remaining = total_demand;
        let results = self
            .rank(scored)
            .into_iter()
            .map(|supplier| {
                let allocated = remaining.min(supplier.supplier.capacity);
                remaining -= allocated;
                AllocationResult::new(supplier, allocated)
            })
            .collect();

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::supplier::Supplier;

    fn scored(id: u32, price: f64, capacity: u64, score: f64) -> ScoredSupplier {
        ScoredSupplier {
            supplier: Supplier::new(id, format!("S{id}"), price, 5.0, 5.0, capacity),
            topsis_score: score,
        }
    }

    fn ids(results: &[AllocationResult]) -> Vec<u32> {
        results.iter().map(|r| r.supplier.id).collect()
    }

    #[test]
    fn test_fills_highest_score_first() {
        let input = vec![
            scored(1, 10.0, 50, 0.2),
            scored(2, 12.0, 30, 0.9),
            scored(3, 8.0, 40, 0.5),
        ];
        let results = GreedyByScore::default().allocate(&input, 60).unwrap();

        assert_eq!(ids(&results), vec![2, 3, 1]);
        let units: Vec<u64> = results.iter().map(|r| r.allocated_units).collect();
        assert_eq!(units, vec![30, 30, 0]);
        assert_eq!(results[0].item_cost, 360.0);
        assert_eq!(results[2].item_cost, 0.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![
            scored(1, 20.0, 10, 0.5),
            scored(2, 5.0, 10, 0.5),
            scored(3, 1.0, 10, 0.5),
        ];
        let results = GreedyByScore::default().allocate(&input, 15).unwrap();
        assert_eq!(ids(&results), vec![1, 2, 3]);
        assert_eq!(results[0].allocated_units, 10);
        assert_eq!(results[1].allocated_units, 5);
    }

    #[test]
    fn test_ties_by_lowest_price() {
        let input = vec![
            scored(1, 20.0, 10, 0.5),
            scored(2, 5.0, 10, 0.5),
            scored(3, 5.0, 10, 0.5),
            scored(4, 1.0, 10, 0.1),
        ];
        let results = GreedyByScore::new(TieBreak::LowestPrice)
            .allocate(&input, 15)
            .unwrap();
        assert_eq!(ids(&results), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_insufficient_capacity_allocates_everything() {
        let input = vec![scored(1, 10.0, 20, 0.7), scored(2, 10.0, 15, 0.3)];
        let results = GreedyByScore::default().allocate(&input, 100).unwrap();
        let total: u64 = results.iter().map(|r| r.allocated_units).sum();
        assert_eq!(total, 35);
    }

    #[test]
    fn test_zero_demand_is_rejected() {
        let input = vec![scored(1, 10.0, 20, 0.7)];
        let result = GreedyByScore::default().allocate(&input, 0);
        assert_eq!(result, Err(OptimizeError::NonPositiveDemand(0)));
    }
}
