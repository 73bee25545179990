//! Run Journal
//!
//! Durable sled-backed history of summarization runs: when each run started and
//! ended, what it was configured with, and how it finished. The journal is a
//! local convenience; callers log its failures and carry on.

use crate::batch::{RunReport, RunTermination};
use crate::error::JournalError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use std::path::Path;

const TREE_RUNS: &str = "runs";

/// Lifecycle of a journaled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
    /// The process died before recording an outcome.
    Interrupted,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RunStatus::Running => "running",
            RunStatus::Finished => "finished",
            RunStatus::Failed => "failed",
            RunStatus::Interrupted => "interrupted",
        };
        f.write_str(label)
    }
}

/// Settings a run was started with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub model: String,
    pub batch_size: usize,
    pub cutoff: NaiveDate,
    pub credentials: usize,
    pub max_batches: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub settings: RunSettings,
    pub batches: usize,
    pub success: usize,
    pub error: usize,
    pub skipped: usize,
    pub termination: Option<RunTermination>,
    pub failure: Option<String>,
}

impl RunRecord {
    /// A new running record stamped with the current time.
    pub fn start(settings: RunSettings) -> Self {
        let started_at = Utc::now();
        Self {
            run_id: started_at.format("%Y%m%dT%H%M%S%.6fZ").to_string(),
            started_at,
            ended_at: None,
            status: RunStatus::Running,
            settings,
            batches: 0,
            success: 0,
            error: 0,
            skipped: 0,
            termination: None,
            failure: None,
        }
    }

    pub fn finish(&mut self, report: &RunReport) {
        self.ended_at = Some(Utc::now());
        self.status = RunStatus::Finished;
        self.batches = report.batches.len();
        self.success = report.success();
        self.error = report.error();
        self.skipped = report.skipped();
        self.termination = Some(report.termination);
    }

    pub fn fail(&mut self, failure: impl Into<String>) {
        self.ended_at = Some(Utc::now());
        self.status = RunStatus::Failed;
        self.failure = Some(failure.into());
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.ended_at
            .map(|ended| (ended - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

#[derive(Clone)]
pub struct RunJournal {
    db: Db,
    runs: Tree,
}

impl RunJournal {
    /// Open (or create) the journal database at `path`.
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        std::fs::create_dir_all(path).map_err(|e| {
            JournalError::Path(format!("Failed to create {}: {}", path.display(), e))
        })?;
        let db = sled::open(path)?;
        Self::new(db)
    }

    pub fn new(db: Db) -> Result<Self, JournalError> {
        let runs = db.open_tree(TREE_RUNS)?;
        Ok(Self { db, runs })
    }

    pub fn put_run(&self, record: &RunRecord) -> Result<(), JournalError> {
        let value = serde_json::to_vec(record)?;
        self.runs.insert(record.run_id.as_bytes(), value)?;
        self.runs.flush()?;
        Ok(())
    }

    pub fn get_run(&self, run_id: &str) -> Result<Option<RunRecord>, JournalError> {
        let Some(raw) = self.runs.get(run_id.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    /// Most recent runs first.
    pub fn list_runs(&self, limit: usize) -> Result<Vec<RunRecord>, JournalError> {
        let mut out = Vec::new();
        for result in self.runs.iter() {
            let (_, value) = result?;
            out.push(serde_json::from_slice::<RunRecord>(&value)?);
        }
        out.sort_by_key(|r| std::cmp::Reverse(r.started_at));
        out.truncate(limit);
        Ok(out)
    }

    /// Flag runs left in `Running` by a previous process.
    pub fn mark_interrupted_runs(&self) -> Result<usize, JournalError> {
        let mut changed = 0usize;
        for mut record in self.list_runs(usize::MAX)? {
            if record.status == RunStatus::Running {
                record.status = RunStatus::Interrupted;
                self.put_run(&record)?;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Keep only the newest `max_runs` records.
    pub fn prune(&self, max_runs: usize) -> Result<usize, JournalError> {
        let mut removed = 0usize;
        for record in self.list_runs(usize::MAX)?.iter().skip(max_runs) {
            self.runs.remove(record.run_id.as_bytes())?;
            removed += 1;
        }
        if removed > 0 {
            self.db.flush()?;
        }
        Ok(removed)
    }
}
