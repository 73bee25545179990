//! Record selection in processing order.

use crate::bill::{BillRecord, CandidateKey};
use crate::error::StoreError;
use crate::ordering::compare_candidates;
use crate::store::BillStore;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Picks the next batch of records to summarize.
///
/// The store supplies every eligible candidate key; ordering happens here so it
/// does not depend on the storage engine's pattern matching.
pub struct RecordSelector<'a> {
    store: &'a dyn BillStore,
}

impl<'a> RecordSelector<'a> {
    pub fn new(store: &'a dyn BillStore) -> Self {
        Self { store }
    }

    /// Up to `limit` eligible records, ordered by ordering key, proposal date,
    /// then bill id. An empty result means the backlog is drained.
    pub async fn select(&self, limit: usize, cutoff: NaiveDate) -> Result<Vec<BillRecord>, StoreError> {
        let chosen = self.next_candidates(limit, cutoff).await?;
        if chosen.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = chosen.iter().map(|c| c.bill_id.clone()).collect();
        let mut loaded: HashMap<String, BillRecord> = self
            .store
            .load_records(&ids)
            .await?
            .into_iter()
            .map(|record| (record.bill_id.clone(), record))
            .collect();

        // Rows can vanish between the two reads; keep the computed order for the rest.
        let records: Vec<BillRecord> = ids.iter().filter_map(|id| loaded.remove(id)).collect();
        debug!(
            requested = limit,
            selected = records.len(),
            "Selected batch"
        );
        Ok(records)
    }

    /// Ordered candidate keys, truncated to `limit`.
    pub async fn next_candidates(
        &self,
        limit: usize,
        cutoff: NaiveDate,
    ) -> Result<Vec<CandidateKey>, StoreError> {
        let mut candidates: Vec<(i64, CandidateKey)> = self
            .store
            .eligible_candidates(cutoff)
            .await?
            .into_iter()
            .map(|candidate| (candidate.ordering_key(), candidate))
            .collect();

        candidates.sort_by(|(key_a, a), (key_b, b)| {
            compare_candidates(
                (*key_a, &a.proposal_date, a.bill_id.as_str()),
                (*key_b, &b.proposal_date, b.bill_id.as_str()),
            )
        });
        candidates.truncate(limit);
        Ok(candidates.into_iter().map(|(_, candidate)| candidate).collect())
    }
}
