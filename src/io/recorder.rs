// src/io/recorder.rs

//! Run history sinks.
//!
//! A recorder receives a finished [`Run`] and either stores every row of it or none.

use crate::error::PersistenceError;
use crate::io::reporting::AllocationRow;
use crate::model::run::{Run, RunId, RunStatus};
use crate::model::weights::{Criterion, CriterionKind};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const RUN_DIR_PREFIX: &str = "run-";
const STAGING_PREFIX: &str = ".staging-";
const RUN_FILE: &str = "run.csv";
const WEIGHTS_FILE: &str = "weights.csv";
const ALLOCATIONS_FILE: &str = "allocations.csv";

/// Transactional sink for optimisation runs.
pub trait RunRecorder {
    /// Persists the whole run atomically and returns its identifier.
    fn record_run(&mut self, run: &Run) -> Result<RunId, PersistenceError>;
}

/// Lets several threads share one recorder; each record holds the lock for its duration.
impl<R: RunRecorder> RunRecorder for &Mutex<R> {
    fn record_run(&mut self, run: &Run) -> Result<RunId, PersistenceError> {
        let mut guard = self
            .lock()
            .map_err(|_| PersistenceError::Corrupt("recorder lock poisoned".to_string()))?;
        guard.record_run(run)
    }
}

// =========================================================================
// In-memory history
// =========================================================================

#[derive(Debug, Default)]
pub struct InMemoryRecorder {
    runs: Vec<(RunId, Run)>,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RunId) -> Option<&Run> {
        self.runs
            .iter()
            .find(|(run_id, _)| *run_id == id)
            .map(|(_, run)| run)
    }

    pub fn runs(&self) -> impl Iterator<Item = (RunId, &Run)> {
        self.runs.iter().map(|(id, run)| (*id, run))
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl RunRecorder for InMemoryRecorder {
    fn record_run(&mut self, run: &Run) -> Result<RunId, PersistenceError> {
        let next = self.runs.last().map_or(0, |(id, _)| id.0) + 1;
        let id = RunId(next);
        self.runs.push((id, run.clone()));
        Ok(id)
    }
}

// =========================================================================
// CSV history directory
// =========================================================================

/// Header row of a recorded run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRow {
    pub id: u64,
    pub name: String,
    pub created_at_ms: u64,
    pub total_demand: i64,
    pub min_avg_score: f64,
    pub total_cost: f64,
    pub final_avg_score: f64,
    pub is_supply_met: bool,
    pub is_quality_met: bool,
    pub status: RunStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    pub criterion: Criterion,
    pub kind: CriterionKind,
    pub weight: f64,
}

/// Stores each run as a `run-<id>/` directory of CSV files under a history root.
///
/// Files are first written to a `.staging-<id>/` directory which is renamed into place
/// once every file is flushed. A failed write removes the staging directory, so a
/// partially written run is never visible under a `run-<id>` name.
#[derive(Debug, Clone)]
pub struct CsvRunRecorder {
    root: PathBuf,
}

impl CsvRunRecorder {
    /// Opens (and creates if needed) a history directory, discarding leftovers of
    /// interrupted writes.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            let is_staging = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(STAGING_PREFIX));
            if is_staging {
                warn!("removing incomplete run at '{}'", path.display());
                fs::remove_dir_all(&path)?;
            }
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recorded run ids in ascending order.
    pub fn list_runs(&self) -> Result<Vec<RunId>, PersistenceError> {
        self.scan_run_ids(true)
    }

    /// Ids parsed from `run-<id>` entries, optionally restricted to directories.
    fn scan_run_ids(&self, dirs_only: bool) -> Result<Vec<RunId>, PersistenceError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if dirs_only && !entry.file_type()?.is_dir() {
                continue;
            }
            let id = entry
                .file_name()
                .to_str()
                .and_then(|n| n.strip_prefix(RUN_DIR_PREFIX))
                .and_then(|n| n.parse::<u64>().ok());
            if let Some(id) = id {
                ids.push(RunId(id));
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn load_summary(&self, id: RunId) -> Result<RunRow, PersistenceError> {
        let rows: Vec<RunRow> = read_rows(&self.run_dir(id).join(RUN_FILE))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| PersistenceError::Corrupt(format!("run {id} has no header row")))
    }

    pub fn load_weights(&self, id: RunId) -> Result<Vec<WeightRow>, PersistenceError> {
        read_rows(&self.run_dir(id).join(WEIGHTS_FILE))
    }

    pub fn load_allocations(&self, id: RunId) -> Result<Vec<AllocationRow>, PersistenceError> {
        read_rows(&self.run_dir(id).join(ALLOCATIONS_FILE))
    }

    fn run_dir(&self, id: RunId) -> PathBuf {
        self.root.join(format!("{RUN_DIR_PREFIX}{:06}", id.0))
    }

    /// One past the highest `run-<id>` name in use, whatever kind of entry holds it.
    fn next_id(&self) -> Result<RunId, PersistenceError> {
        let last = self.scan_run_ids(false)?.last().map_or(0, |id| id.0);
        Ok(RunId(last + 1))
    }

    /// Writes `run` into a fresh staging directory and renames it to `run-<id>`.
    /// On failure the staging directory is removed.
    fn stage_and_commit(&self, id: RunId, run: &Run) -> Result<(), PersistenceError> {
        let staging = self.root.join(format!("{STAGING_PREFIX}{}", id.0));
        fs::create_dir(&staging)?;

        if let Err(e) = self.commit(&staging, id, run) {
            debug!("rolling back run {id}: {e}");
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                warn!(
                    "could not remove staging directory '{}': {cleanup}",
                    staging.display()
                );
            }
            return Err(e);
        }
        Ok(())
    }

    fn commit(&self, staging: &Path, id: RunId, run: &Run) -> Result<(), PersistenceError> {
        write_run_files(staging, id, run)?;

        let target = self.run_dir(id);
        if target.exists() {
            return Err(PersistenceError::Corrupt(format!(
                "run directory '{}' already exists",
                target.display()
            )));
        }
        fs::rename(staging, &target)?;
        Ok(())
    }
}

impl RunRecorder for CsvRunRecorder {
    fn record_run(&mut self, run: &Run) -> Result<RunId, PersistenceError> {
        let id = self.next_id()?;
        self.stage_and_commit(id, run)?;
        Ok(id)
    }
}

fn write_run_files(dir: &Path, id: RunId, run: &Run) -> Result<(), PersistenceError> {
    let summary = &run.summary;
    write_rows(
        &dir.join(RUN_FILE),
        [RunRow {
            id: id.0,
            name: run.name.clone(),
            created_at_ms: run.created_at_ms,
            total_demand: run.request.total_demand,
            min_avg_score: run.request.min_avg_score,
            total_cost: summary.total_cost,
            final_avg_score: summary.final_avg_score,
            is_supply_met: summary.is_supply_met,
            is_quality_met: summary.is_quality_met,
            status: summary.status(),
        }],
    )?;

    let weights = run.weights();
    write_rows(
        &dir.join(WEIGHTS_FILE),
        Criterion::ALL.map(|criterion| WeightRow {
            criterion,
            kind: criterion.kind(),
            weight: weights.get(criterion),
        }),
    )?;

    let demand = u64::try_from(run.request.total_demand).unwrap_or(0);
    write_rows(
        &dir.join(ALLOCATIONS_FILE),
        AllocationRow::from_results(&run.results, demand),
    )?;
    Ok(())
}

fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), PersistenceError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, PersistenceError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
