//! Supplier ranking and demand allocation.
//!
//! Suppliers are scored with TOPSIS over price, quality and lead time, then demand is
//! filled greedily from the best-scored supplier down, within each supplier's capacity.
//! Scoring and allocation are pure; recording a run is a separate, atomic step behind
//! the [`RunRecorder`] trait.

pub mod engine;
pub mod error;
pub mod io;
pub mod model;
pub mod strategy;

pub use engine::config::OptimizerConfig;
pub use engine::optimizer::{optimize, OptimizationOutcome, Optimizer, RecordedOutcome};
pub use error::{CatalogError, OptimizeError, PersistenceError};
pub use io::recorder::{CsvRunRecorder, InMemoryRecorder, RunRecorder};
pub use model::run::{OptimizationRequest, Run, RunId, RunStatus, RunSummary};
pub use model::supplier::{AllocationResult, ScoredSupplier, Supplier};
pub use model::weights::{Criterion, CriterionKind, WeightVector};
pub use strategy::implementations::{GreedyByScore, TieBreak};
pub use strategy::topsis::score_suppliers;
pub use strategy::traits::AllocationPolicy;
