// src/strategy/topsis.rs

//! TOPSIS scoring over the price, quality and time criteria.
//!
//! Each criterion column is vector-normalised (divided by its Euclidean norm) and
//! multiplied by its weight. Suppliers are then scored by their relative closeness
//! to the ideal-best point versus the ideal-worst point:
//!
//! score = d- / (d+ + d-)
//!
//! Normalisation makes scores independent of the unit of each criterion, but it is
//! relative to the supplier set being scored.

use crate::error::OptimizeError;
use crate::model::supplier::{ScoredSupplier, Supplier};
use crate::model::weights::{Criterion, CriterionKind, WeightVector};
use log::debug;

type Point = [f64; 3];

/// Scores every supplier. The output has the same length and order as the input.
pub fn score_suppliers(
    suppliers: &[Supplier],
    weights: &WeightVector,
) -> Result<Vec<ScoredSupplier>, OptimizeError> {
    if suppliers.is_empty() {
        return Err(OptimizeError::EmptySupplierSet);
    }
    weights.validate()?;

    let norms = criterion_norms(suppliers);
    let matrix: Vec<Point> = suppliers
        .iter()
        .map(|s| weighted_normalized(s, &norms, weights))
        .collect();
    let (ideal_best, ideal_worst) = ideal_points(&matrix);
    debug!(
        "topsis norms={:?} ideal_best={:?} ideal_worst={:?}",
        norms, ideal_best, ideal_worst
    );

    let scored = suppliers
        .iter()
        .zip(&matrix)
        .map(|(supplier, point)| {
            let d_plus = euclidean_distance(point, &ideal_best);
            let d_minus = euclidean_distance(point, &ideal_worst);
            ScoredSupplier {
                supplier: supplier.clone(),
                topsis_score: closeness(d_plus, d_minus),
            }
        })
        .collect();

    Ok(scored)
}

/// Euclidean norm of each criterion column. A zero norm becomes 1 so that an
/// all-zero column normalises to zeros instead of NaN.
///
/// Values are divided by the column's largest magnitude before squaring, so very large
/// or very small (but finite) attributes neither overflow nor underflow the sum.
fn criterion_norms(suppliers: &[Supplier]) -> Point {
    Criterion::ALL.map(|criterion| {
        let largest = suppliers
            .iter()
            .map(|s| s.value(criterion).abs())
            .fold(0.0, f64::max);
        if largest == 0.0 {
            return 1.0;
        }
        let scaled_sum = suppliers
            .iter()
            .map(|s| (s.value(criterion) / largest).powi(2))
            .sum::<f64>();
        largest * scaled_sum.sqrt()
    })
}

fn weighted_normalized(supplier: &Supplier, norms: &Point, weights: &WeightVector) -> Point {
    let mut point = [0.0; 3];
    for ((slot, criterion), norm) in point.iter_mut().zip(Criterion::ALL).zip(norms) {
        *slot = supplier.value(criterion) / norm * weights.get(criterion);
    }
    point
}

/// Component-wise best and worst values. Best is the minimum for cost criteria and
/// the maximum for benefit criteria; worst is the opposite.
fn ideal_points(matrix: &[Point]) -> (Point, Point) {
    let mut best = [0.0; 3];
    let mut worst = [0.0; 3];

    for (i, criterion) in Criterion::ALL.into_iter().enumerate() {
        let column = matrix.iter().map(|p| p[i]);
        let min = column.clone().fold(f64::INFINITY, f64::min);
        let max = column.fold(f64::NEG_INFINITY, f64::max);

        (best[i], worst[i]) = match criterion.kind() {
            CriterionKind::Cost => (min, max),
            CriterionKind::Benefit => (max, min),
        };
    }

    (best, worst)
}

fn euclidean_distance(a: &Point, b: &Point) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Relative closeness to the ideal. A supplier sitting on both ideals scores 0.
fn closeness(d_plus: f64, d_minus: f64) -> f64 {
    let total = d_plus + d_minus;
    if total == 0.0 {
        return 0.0;
    }
    (d_minus / total).clamp(0.0, 1.0)
}
