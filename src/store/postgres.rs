//! PostgreSQL bill store.
//!
//! The pool holds a single connection so store operations never overlap.
//! Queries are built at runtime; no compile-time database is required.

use crate::bill::{BillRecord, CandidateKey};
use crate::error::StoreError;
use crate::store::{BillStore, ProgressStats, StoredSummary};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use tracing::{debug, info, warn};

const BILLS_TABLE: &str = "bills";

// Keys only, the full eligible set on every batch. Ordering happens in the selector.
const ELIGIBLE_CANDIDATES_SQL: &str = r#"
    SELECT bill_id::text AS bill_id, bill_no::text AS bill_no, proposal_date::date AS proposal_date
    FROM bills
    WHERE (summary IS NULL OR summary = '')
      AND proposal_date >= $1
      AND (summary_raw IS NOT NULL AND btrim(summary_raw) <> '')
      AND bill_no IS NOT NULL
"#;

const LOAD_RECORDS_SQL: &str = r#"
    SELECT bill_id::text AS bill_id,
           COALESCE(bill_no::text, '') AS bill_no,
           COALESCE(title, '') AS title,
           COALESCE(summary_raw, '') AS body,
           proposal_date::date AS proposal_date
    FROM bills
    WHERE bill_id::text = ANY($1)
"#;

const HEADLINE_PROBE_SQL: &str = r#"
    SELECT EXISTS (
        SELECT 1 FROM information_schema.columns
        WHERE table_name = $1 AND column_name = 'headline'
    )
"#;

const UPDATE_WITH_HEADLINE_SQL: &str = r#"
    UPDATE bills
    SET headline = $1,
        summary = $2,
        categories = $3,
        vote_for = $4,
        vote_against = $5,
        updated_at = CURRENT_TIMESTAMP
    WHERE bill_id::text = $6
"#;

const UPDATE_SUMMARY_SQL: &str = r#"
    UPDATE bills
    SET summary = $1,
        categories = $2,
        vote_for = $3,
        vote_against = $4,
        updated_at = CURRENT_TIMESTAMP
    WHERE bill_id::text = $5
"#;

const PROGRESS_SQL: &str = r#"
    SELECT
        COUNT(*) AS total,
        COUNT(*) FILTER (WHERE summary IS NOT NULL AND summary != '') AS processed,
        COUNT(*) FILTER (
            WHERE (summary IS NULL OR summary = '')
              AND (summary_raw IS NOT NULL AND btrim(summary_raw) <> '')
              AND bill_no IS NOT NULL
        ) AS eligible
    FROM bills
    WHERE proposal_date >= $1
"#;

#[derive(Debug, FromRow)]
struct CandidateRow {
    bill_id: String,
    bill_no: String,
    proposal_date: NaiveDate,
}

#[derive(Debug, FromRow)]
struct RecordRow {
    bill_id: String,
    bill_no: String,
    title: String,
    body: String,
    proposal_date: NaiveDate,
}

impl From<CandidateRow> for CandidateKey {
    fn from(row: CandidateRow) -> Self {
        CandidateKey {
            bill_id: row.bill_id,
            bill_no: row.bill_no,
            proposal_date: row.proposal_date,
        }
    }
}

impl From<RecordRow> for BillRecord {
    fn from(row: RecordRow) -> Self {
        BillRecord {
            bill_id: row.bill_id,
            bill_no: row.bill_no,
            title: row.title,
            body: row.body,
            proposal_date: row.proposal_date,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProgressRow {
    total: i64,
    processed: i64,
    eligible: i64,
}

impl From<ProgressRow> for ProgressStats {
    fn from(row: ProgressRow) -> Self {
        let total = row.total.max(0) as u64;
        let processed = row.processed.max(0) as u64;
        ProgressStats {
            total,
            processed,
            unprocessed: total.saturating_sub(processed),
            eligible: row.eligible.max(0) as u64,
        }
    }
}

/// PostgreSQL-backed [`BillStore`]
pub struct PgBillStore {
    pool: PgPool,
}

impl PgBillStore {
    /// Connect with a single-connection pool.
    pub async fn connect(database_url: &str, connect_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(connect_timeout)
            .connect(database_url)
            .await?;
        info!("Connected to bill store");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl BillStore for PgBillStore {
    async fn eligible_candidates(&self, cutoff: NaiveDate) -> Result<Vec<CandidateKey>, StoreError> {
        let rows: Vec<CandidateRow> = sqlx::query_as(ELIGIBLE_CANDIDATES_SQL)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await?;
        debug!(count = rows.len(), %cutoff, "Fetched eligible candidates");
        Ok(rows.into_iter().map(CandidateKey::from).collect())
    }

    async fn load_records(&self, bill_ids: &[String]) -> Result<Vec<BillRecord>, StoreError> {
        if bill_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<RecordRow> = sqlx::query_as(LOAD_RECORDS_SQL)
            .bind(bill_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BillRecord::from).collect())
    }

    async fn has_headline_field(&self) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(HEADLINE_PROBE_SQL)
            .bind(BILLS_TABLE)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn write_summary(&self, bill_id: &str, row: &StoredSummary) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = match row.headline.as_deref() {
            Some(headline) => sqlx::query(UPDATE_WITH_HEADLINE_SQL)
                .bind(headline)
                .bind(row.summary.as_str()),
            None => sqlx::query(UPDATE_SUMMARY_SQL).bind(row.summary.as_str()),
        };
        let result = query
            .bind(Json(&row.categories))
            .bind(Json(&row.vote_for))
            .bind(Json(&row.vote_against))
            .bind(bill_id)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                tx.rollback().await?;
                Err(StoreError::RecordNotFound(bill_id.to_string()))
            }
            Ok(_) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(bill_id, error = %rollback_err, "Rollback failed");
                }
                Err(StoreError::Database(e))
            }
        }
    }

    async fn progress(&self, cutoff: NaiveDate) -> Result<ProgressStats, StoreError> {
        let row: ProgressRow = sqlx::query_as(PROGRESS_SQL)
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    fn backend_name(&self) -> &str {
        "postgres"
    }
}
