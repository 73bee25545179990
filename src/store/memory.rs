//! In-memory bill store.
//!
//! Mirrors the PostgreSQL filters exactly. Used by tests and by dry runs against
//! fixture data; supports simulating a table without a headline column and
//! rejecting writes for chosen bills.

use crate::bill::{AxisWeights, BillRecord, CandidateKey};
use crate::error::StoreError;
use crate::store::{BillStore, ProgressStats, StoredSummary};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

/// One row of the bill table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub bill_id: String,
    pub bill_no: Option<String>,
    pub title: String,
    pub body: String,
    pub proposal_date: NaiveDate,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub categories: Option<Vec<String>>,
    pub vote_for: Option<AxisWeights>,
    pub vote_against: Option<AxisWeights>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MemoryRow {
    /// A row awaiting summarization.
    pub fn pending(record: BillRecord) -> Self {
        Self {
            bill_id: record.bill_id,
            bill_no: Some(record.bill_no),
            title: record.title,
            body: record.body,
            proposal_date: record.proposal_date,
            headline: None,
            summary: None,
            categories: None,
            vote_for: None,
            vote_against: None,
            updated_at: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn without_bill_no(mut self) -> Self {
        self.bill_no = None;
        self
    }

    fn has_summary(&self) -> bool {
        self.summary.as_deref().is_some_and(|s| !s.is_empty())
    }

    fn is_eligible(&self) -> bool {
        !self.has_summary() && !self.body.trim().is_empty() && self.bill_no.is_some()
    }

    fn to_record(&self) -> BillRecord {
        BillRecord {
            bill_id: self.bill_id.clone(),
            bill_no: self.bill_no.clone().unwrap_or_default(),
            title: self.title.clone(),
            body: self.body.clone(),
            proposal_date: self.proposal_date,
        }
    }
}

/// In-memory [`BillStore`]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<String, MemoryRow>>,
    headline_column: bool,
    rejected_writes: Mutex<HashSet<String>>,
    write_count: Mutex<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty table with a headline column.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            headline_column: true,
            rejected_writes: Mutex::new(HashSet::new()),
            write_count: Mutex::new(0),
        }
    }

    /// Empty table without a headline column.
    pub fn without_headline_column() -> Self {
        Self {
            headline_column: false,
            ..Self::new()
        }
    }

    pub fn with_records(records: impl IntoIterator<Item = BillRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(MemoryRow::pending(record));
        }
        store
    }

    pub fn insert(&self, row: MemoryRow) {
        self.rows.lock().insert(row.bill_id.clone(), row);
    }

    /// Make every write for `bill_id` fail.
    pub fn reject_writes_for(&self, bill_id: impl Into<String>) {
        self.rejected_writes.lock().insert(bill_id.into());
    }

    pub fn row(&self, bill_id: &str) -> Option<MemoryRow> {
        self.rows.lock().get(bill_id).cloned()
    }

    /// Number of committed writes.
    pub fn write_count(&self) -> usize {
        *self.write_count.lock()
    }
}

#[async_trait]
impl BillStore for MemoryStore {
    async fn eligible_candidates(&self, cutoff: NaiveDate) -> Result<Vec<CandidateKey>, StoreError> {
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .filter(|row| row.proposal_date >= cutoff && row.is_eligible())
            .map(|row| CandidateKey {
                bill_id: row.bill_id.clone(),
                bill_no: row.bill_no.clone().unwrap_or_default(),
                proposal_date: row.proposal_date,
            })
            .collect())
    }

    async fn load_records(&self, bill_ids: &[String]) -> Result<Vec<BillRecord>, StoreError> {
        let rows = self.rows.lock();
        Ok(bill_ids
            .iter()
            .filter_map(|id| rows.get(id))
            .map(MemoryRow::to_record)
            .collect())
    }

    async fn has_headline_field(&self) -> Result<bool, StoreError> {
        Ok(self.headline_column)
    }

    async fn write_summary(&self, bill_id: &str, row: &StoredSummary) -> Result<(), StoreError> {
        if self.rejected_writes.lock().contains(bill_id) {
            return Err(StoreError::WriteRejected(bill_id.to_string()));
        }
        if row.headline.is_some() && !self.headline_column {
            return Err(StoreError::WriteRejected(format!(
                "{}: column \"headline\" does not exist",
                bill_id
            )));
        }

        let mut rows = self.rows.lock();
        let stored = rows
            .get_mut(bill_id)
            .ok_or_else(|| StoreError::RecordNotFound(bill_id.to_string()))?;
        if row.headline.is_some() {
            stored.headline = row.headline.clone();
        }
        stored.summary = Some(row.summary.clone());
        stored.categories = Some(row.categories.clone());
        stored.vote_for = Some(row.vote_for.clone());
        stored.vote_against = Some(row.vote_against.clone());
        stored.updated_at = Some(Utc::now());
        drop(rows);

        *self.write_count.lock() += 1;
        Ok(())
    }

    async fn progress(&self, cutoff: NaiveDate) -> Result<ProgressStats, StoreError> {
        let rows = self.rows.lock();
        let mut stats = ProgressStats::default();
        for row in rows.values().filter(|row| row.proposal_date >= cutoff) {
            stats.total += 1;
            if row.has_summary() {
                stats.processed += 1;
            } else {
                stats.unprocessed += 1;
            }
            if row.is_eligible() {
                stats.eligible += 1;
            }
        }
        Ok(stats)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
