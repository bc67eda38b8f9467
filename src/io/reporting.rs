// src/io/reporting.rs

use crate::engine::optimizer::OptimizationOutcome;
use crate::model::run::OptimizationRequest;
use crate::model::supplier::AllocationResult;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One flat CSV line per supplier of a run, in allocation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub rank: usize,
    pub supplier_id: u32,
    pub name: String,
    pub price: f64,
    pub quality: f64,
    pub time: f64,
    pub capacity: u64,
    pub topsis_score: f64,
    pub allocated_units: u64,
    pub item_cost: f64,
    pub demand_share: f64,
}

impl AllocationRow {
    pub fn from_results(results: &[AllocationResult], total_demand: u64) -> Vec<Self> {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| Self {
                rank: i + 1,
                supplier_id: r.supplier.id,
                name: r.supplier.name.clone(),
                price: r.supplier.price,
                quality: r.supplier.quality,
                time: r.supplier.time,
                capacity: r.supplier.capacity,
                topsis_score: r.topsis_score,
                allocated_units: r.allocated_units,
                item_cost: r.item_cost,
                demand_share: r.demand_share(total_demand),
            })
            .collect()
    }
}

/// Writes the allocation table of a run to a CSV file.
///
/// # Arguments
/// * `file_path` - Destination, e.g. "reports/allocation.csv".
/// * `results` - Allocation rows, best score first.
/// * `total_demand` - Demand of the run, used for the share column.
pub fn write_allocation_report(
    file_path: impl AsRef<Path>,
    results: &[AllocationResult],
    total_demand: u64,
) -> Result<(), csv::Error> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for row in AllocationRow::from_results(results, total_demand) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    info!("exported {} rows to '{}'", results.len(), path.display());
    Ok(())
}

/// Console table of an allocation and its summary.
pub struct AllocationReport<'a> {
    outcome: &'a OptimizationOutcome,
    request: &'a OptimizationRequest,
}

impl<'a> AllocationReport<'a> {
    pub fn new(outcome: &'a OptimizationOutcome, request: &'a OptimizationRequest) -> Self {
        Self { outcome, request }
    }
}

impl fmt::Display for AllocationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = self.request;
        let summary = &self.outcome.summary;
        let demand = u64::try_from(request.total_demand).unwrap_or(0);

        writeln!(f, "╔══════════════════════════════════════════════════════════════════════════════╗")?;
        writeln!(f, "║                         SUPPLIER ALLOCATION (TOPSIS)                         ║")?;
        writeln!(f, "╚══════════════════════════════════════════════════════════════════════════════╝")?;
        writeln!(
            f,
            "Demand: {} | Min avg score: {:.3} | Weights (price/quality/time): {:.2}/{:.2}/{:.2}\n",
            request.total_demand,
            request.min_avg_score,
            request.weights.price,
            request.weights.quality,
            request.weights.time
        )?;

        writeln!(
            f,
            "{:<4} {:<20} {:>7} {:>10} {:>10} {:>10} {:>14} {:>6}",
            "#", "Supplier", "Score", "Price", "Capacity", "Allocated", "Cost", "Share"
        )?;
        for row in AllocationRow::from_results(&self.outcome.results, demand) {
            writeln!(
                f,
                "{:<4} {:<20} {:>7.3} {:>10.2} {:>10} {:>10} {:>14.2} {:>5.0}%",
                row.rank,
                row.name,
                row.topsis_score,
                row.price,
                row.capacity,
                row.allocated_units,
                row.item_cost,
                row.demand_share * 100.0
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Total Cost:        ${:.2}", summary.total_cost)?;
        writeln!(f, "Average Score:     {:.3}", summary.final_avg_score)?;
        writeln!(
            f,
            "Allocated:         {} of {} (unmet {})",
            summary.allocated_units, request.total_demand, summary.unmet_demand
        )?;
        write!(f, "Status:            {}", summary.status())
    }
}
