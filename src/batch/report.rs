//! Batch and run reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a single batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchTermination {
    /// The selector returned no records.
    Complete,
    /// Every selected record was visited.
    Drained,
    /// The credential pool ran out mid-batch.
    Aborted,
}

impl fmt::Display for BatchTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchTermination::Complete => "complete",
            BatchTermination::Drained => "drained",
            BatchTermination::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

/// Counters for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_number: u32,
    /// Records returned by the selector
    pub fetched: usize,
    pub success: usize,
    pub error: usize,
    /// Records with neither title nor body
    pub skipped: usize,
    pub termination: BatchTermination,
    pub elapsed_secs: f64,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.success + self.error
    }

    pub fn is_aborted(&self) -> bool {
        self.termination == BatchTermination::Aborted
    }

    /// No record succeeded or failed.
    pub fn is_idle(&self) -> bool {
        self.success == 0 && self.error == 0
    }
}

/// Why the outer loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTermination {
    /// A batch produced no successes and no errors.
    Complete,
    /// The credential pool was exhausted.
    Aborted,
    /// The configured batch limit was reached.
    BatchLimit,
    /// Auto-continue is off; one batch ran.
    SingleBatch,
}

impl fmt::Display for RunTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunTermination::Complete => "complete",
            RunTermination::Aborted => "aborted (credential pool exhausted)",
            RunTermination::BatchLimit => "batch limit reached",
            RunTermination::SingleBatch => "single batch",
        };
        f.write_str(label)
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub batches: Vec<BatchReport>,
    pub termination: RunTermination,
    pub elapsed_secs: f64,
}

impl RunReport {
    pub fn success(&self) -> usize {
        self.batches.iter().map(|b| b.success).sum()
    }

    pub fn error(&self) -> usize {
        self.batches.iter().map(|b| b.error).sum()
    }

    pub fn skipped(&self) -> usize {
        self.batches.iter().map(|b| b.skipped).sum()
    }

    pub fn processed(&self) -> usize {
        self.success() + self.error()
    }

    pub fn is_aborted(&self) -> bool {
        self.termination == RunTermination::Aborted
    }

    /// Average wall time per processed record.
    pub fn seconds_per_record(&self) -> Option<f64> {
        match self.processed() {
            0 => None,
            n => Some(self.elapsed_secs / n as f64),
        }
    }

    /// Processed records per minute.
    pub fn records_per_minute(&self) -> Option<f64> {
        if self.elapsed_secs <= 0.0 {
            return None;
        }
        Some(self.processed() as f64 * 60.0 / self.elapsed_secs)
    }
}
