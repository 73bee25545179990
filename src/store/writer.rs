//! Persists generated summaries.

use crate::bill::{normalize_categories, BillSummary};
use crate::error::StoreError;
use crate::store::{BillStore, HeadlineLayout, StoredSummary};
use tracing::{debug, info};

/// Writes summaries with a headline layout resolved once per run.
pub struct SummaryWriter<'a> {
    store: &'a dyn BillStore,
    layout: HeadlineLayout,
}

impl<'a> SummaryWriter<'a> {
    pub fn new(store: &'a dyn BillStore, layout: HeadlineLayout) -> Self {
        Self { store, layout }
    }

    /// Probe the store schema and build a writer for the detected layout.
    pub async fn resolve(store: &'a dyn BillStore) -> Result<Self, StoreError> {
        let layout = if store.has_headline_field().await? {
            HeadlineLayout::Dedicated
        } else {
            HeadlineLayout::Combined
        };
        info!(?layout, backend = store.backend_name(), "Resolved headline layout");
        Ok(Self::new(store, layout))
    }

    pub fn layout(&self) -> HeadlineLayout {
        self.layout
    }

    /// Column values for `summary` under this writer's layout.
    pub fn columns(&self, summary: &BillSummary) -> StoredSummary {
        let (headline, text) = match self.layout {
            HeadlineLayout::Dedicated => (Some(summary.headline.clone()), summary.summary.clone()),
            HeadlineLayout::Combined => (
                None,
                format!("{}\n\n{}", summary.headline, summary.summary),
            ),
        };
        StoredSummary {
            headline,
            summary: text,
            categories: normalize_categories(&summary.categories),
            vote_for: summary.vote_for.clone(),
            vote_against: summary.vote_against.clone(),
        }
    }

    pub async fn write(&self, bill_id: &str, summary: &BillSummary) -> Result<(), StoreError> {
        let row = self.columns(summary);
        self.store.write_summary(bill_id, &row).await?;
        debug!(bill_id, categories = ?row.categories, "Summary written");
        Ok(())
    }
}
