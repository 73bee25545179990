//! Bill Store
//!
//! Access to the shared bill table. The batch job only ever reads eligible
//! candidates, loads their rows, probes the schema once, and writes generated
//! fields back. Backends: PostgreSQL for real runs, in-memory for tests and
//! local experiments.

pub mod memory;
pub mod postgres;
pub mod selector;
pub mod writer;

pub use memory::MemoryStore;
pub use postgres::PgBillStore;
pub use selector::RecordSelector;
pub use writer::SummaryWriter;

use crate::bill::{AxisWeights, BillRecord, CandidateKey};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where the headline lands when a summary is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineLayout {
    /// The table has a `headline` column.
    Dedicated,
    /// No headline column: `headline + "\n\n" + summary` goes into `summary`.
    Combined,
}

/// Column values written for one bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSummary {
    /// `None` leaves the headline column untouched (combined layout).
    pub headline: Option<String>,
    pub summary: String,
    pub categories: Vec<String>,
    pub vote_for: AxisWeights,
    pub vote_against: AxisWeights,
}

/// Backlog counters for bills proposed on or after a cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total: u64,
    /// Summary present
    pub processed: u64,
    /// Summary missing
    pub unprocessed: u64,
    /// Summary missing, body present, bill number present
    pub eligible: u64,
}

impl ProgressStats {
    /// Share of processed bills in percent, 0 when there are none.
    pub fn processed_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Bill storage interface
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Keys of every eligible record: summary null or empty, proposed on or after
    /// `cutoff`, body non-empty, bill number present. Order is unspecified.
    async fn eligible_candidates(&self, cutoff: NaiveDate) -> Result<Vec<CandidateKey>, StoreError>;

    /// Full rows for the given ids. Missing ids are skipped; order is unspecified.
    async fn load_records(&self, bill_ids: &[String]) -> Result<Vec<BillRecord>, StoreError>;

    /// Whether the table carries a dedicated headline column.
    async fn has_headline_field(&self) -> Result<bool, StoreError>;

    /// Write generated fields for one bill in a single transaction.
    async fn write_summary(&self, bill_id: &str, row: &StoredSummary) -> Result<(), StoreError>;

    /// Backlog counters since `cutoff`.
    async fn progress(&self, cutoff: NaiveDate) -> Result<ProgressStats, StoreError>;

    /// Backend name for logs and reports.
    fn backend_name(&self) -> &str;
}
