// src/error.rs

use crate::model::weights::Criterion;
use thiserror::Error;

/// Rejections raised before any scoring or allocation happens.
///
/// Every variant belongs to the invalid-input kind: no partial state is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("invalid input: supplier list is empty")]
    EmptySupplierSet,

    #[error("invalid input: total demand must be positive, got {0}")]
    NonPositiveDemand(i64),

    #[error("invalid input: weight for {criterion} must be within [0, 1], got {value}")]
    InvalidWeight { criterion: Criterion, value: f64 },

    #[error("invalid input: supplier {id} has invalid {field}: {value}")]
    InvalidSupplier {
        id: u32,
        field: &'static str,
        value: f64,
    },

    #[error("invalid input: minimum average score must be finite, got {0}")]
    InvalidScore(f64),
}

impl OptimizeError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            OptimizeError::EmptySupplierSet
                | OptimizeError::NonPositiveDemand(_)
                | OptimizeError::InvalidWeight { .. }
                | OptimizeError::InvalidSupplier { .. }
                | OptimizeError::InvalidScore(_)
        )
    }
}

/// Failure to write or read the run history. Never produced by the computation itself.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("persistence failure: io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("persistence failure: csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("persistence failure: corrupt history: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog lists supplier id {0} more than once")]
    DuplicateId(u32),

    #[error("catalog row rejected: {0}")]
    Invalid(#[from] OptimizeError),

    #[error("invalid distribution parameters: {0}")]
    Distribution(String),
}
