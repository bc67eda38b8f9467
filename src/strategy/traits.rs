// src/strategy/traits.rs

use crate::error::OptimizeError;
use crate::model::supplier::{AllocationResult, ScoredSupplier};
use std::fmt::Debug;

/// Decides how a demand is spread over scored suppliers.
///
/// Implementations must be pure: they read the scored list and return fresh rows, so a
/// single policy can serve concurrent requests. `Send` + `Sync` let it be shared across
/// threads.
pub trait AllocationPolicy: Debug + Send + Sync {
    /// Returns one row per supplier, in the order the policy ranks them.
    ///
    /// # Arguments
    /// * `scored` - Suppliers with their TOPSIS scores, in catalog order.
    /// * `total_demand` - Units to place. Must be positive.
    fn allocate(
        &self,
        scored: &[ScoredSupplier],
        total_demand: u64,
    ) -> Result<Vec<AllocationResult>, OptimizeError>;
}
