//! Batch Orchestrator
//!
//! Drives the summarization job: select a batch, generate and persist a summary
//! per record, rotate credentials on quota exhaustion, pace between calls, and
//! repeat batches until the backlog is drained or a stop condition fires.
//!
//! Everything runs sequentially. The credential rotator is owned by the caller
//! and threaded through by `&mut`.

pub mod pacing;
pub mod report;

pub use pacing::Pacer;
pub use report::{BatchReport, BatchTermination, RunReport, RunTermination};

use crate::bill::BillRecord;
use crate::config::{BillbriefConfig, PacingConfig};
use crate::credentials::CredentialRotator;
use crate::error::RunError;
use crate::provider::{is_quota_exhausted, GenerationRequest, SummaryGenerator};
use crate::response::parse_response;
use crate::store::{BillStore, RecordSelector, SummaryWriter};
use chrono::NaiveDate;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Loop settings for one run.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub cutoff: NaiveDate,
    pub auto_continue: bool,
    pub max_batches: Option<u32>,
    pub batch_pause: Duration,
    /// Per generation call
    pub timeout: Duration,
}

impl BatchSettings {
    pub fn from_config(config: &BillbriefConfig) -> Self {
        Self {
            batch_size: config.batch.size,
            cutoff: config.batch.cutoff_date,
            auto_continue: config.batch.auto_continue,
            max_batches: config.batch.max_batches,
            batch_pause: Duration::from_secs_f64(config.batch.pause_secs.max(0.0)),
            timeout: config.generation.timeout(),
        }
    }
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    Success,
    Error,
    /// Quota hit, next credential is active; counted as an error without pacing.
    Rotated,
    /// Nothing to summarize; no counter moves.
    Skipped,
    /// No credential left; this record is not counted.
    Abort,
}

/// Runs batches against a store with one generator.
pub struct BatchRunner<'a> {
    selector: RecordSelector<'a>,
    writer: SummaryWriter<'a>,
    generator: &'a dyn SummaryGenerator,
    instructions: &'a str,
    pacer: Pacer,
    settings: BatchSettings,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        store: &'a dyn BillStore,
        writer: SummaryWriter<'a>,
        generator: &'a dyn SummaryGenerator,
        instructions: &'a str,
        pacing: &PacingConfig,
        settings: BatchSettings,
    ) -> Self {
        Self {
            selector: RecordSelector::new(store),
            writer,
            generator,
            instructions,
            pacer: Pacer::new(pacing),
            settings,
        }
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Run batches until a stop condition fires.
    pub async fn run(&self, rotator: &mut CredentialRotator) -> Result<RunReport, RunError> {
        let started = Instant::now();
        let mut batches: Vec<BatchReport> = Vec::new();

        info!(
            provider = self.generator.provider_name(),
            model = self.generator.model_name(),
            batch_size = self.settings.batch_size,
            cutoff = %self.settings.cutoff,
            credentials = rotator.len(),
            "Starting summarization run"
        );

        let termination = loop {
            let batch_number = batches.len() as u32 + 1;
            let report = self.run_batch(batch_number, rotator).await?;
            let aborted = report.is_aborted();
            let idle = report.is_idle();
            batches.push(report);

            if aborted {
                warn!(batch = batch_number, "Credential pool exhausted, stopping");
                break RunTermination::Aborted;
            }
            if idle {
                info!(batch = batch_number, "No eligible records left");
                break RunTermination::Complete;
            }
            if self
                .settings
                .max_batches
                .is_some_and(|max| batch_number >= max)
            {
                info!(batch = batch_number, "Batch limit reached");
                break RunTermination::BatchLimit;
            }
            if !self.settings.auto_continue {
                break RunTermination::SingleBatch;
            }

            debug!(pause_ms = self.settings.batch_pause.as_millis() as u64, "Pausing between batches");
            if !self.settings.batch_pause.is_zero() {
                sleep(self.settings.batch_pause).await;
            }
        };

        let report = RunReport {
            batches,
            termination,
            elapsed_secs: started.elapsed().as_secs_f64(),
        };
        info!(
            success = report.success(),
            error = report.error(),
            skipped = report.skipped(),
            termination = %report.termination,
            elapsed_secs = report.elapsed_secs,
            "Run finished"
        );
        Ok(report)
    }

    /// Select and process one batch.
    pub async fn run_batch(
        &self,
        batch_number: u32,
        rotator: &mut CredentialRotator,
    ) -> Result<BatchReport, RunError> {
        let started = Instant::now();
        let records = self
            .selector
            .select(self.settings.batch_size, self.settings.cutoff)
            .await?;

        let mut report = BatchReport {
            batch_number,
            fetched: records.len(),
            success: 0,
            error: 0,
            skipped: 0,
            termination: BatchTermination::Complete,
            elapsed_secs: 0.0,
        };
        if records.is_empty() {
            info!(batch = batch_number, "Selector returned no records");
            report.elapsed_secs = started.elapsed().as_secs_f64();
            return Ok(report);
        }

        info!(batch = batch_number, records = records.len(), "Processing batch");
        report.termination = BatchTermination::Drained;
        let total = records.len();

        for (index, record) in records.iter().enumerate() {
            let outcome = self.process_record(record, index, total, rotator).await?;
            match outcome {
                RecordOutcome::Success => report.success += 1,
                RecordOutcome::Error | RecordOutcome::Rotated => report.error += 1,
                RecordOutcome::Skipped => report.skipped += 1,
                RecordOutcome::Abort => {
                    report.termination = BatchTermination::Aborted;
                    break;
                }
            }

            let paced = matches!(outcome, RecordOutcome::Success | RecordOutcome::Error);
            if paced && index + 1 < total {
                let delay = self.pacer.pause().await;
                debug!(delay_ms = delay.as_millis() as u64, "Paced");
            }
        }

        report.elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            batch = batch_number,
            success = report.success,
            error = report.error,
            skipped = report.skipped,
            termination = %report.termination,
            "Batch finished"
        );
        Ok(report)
    }

    async fn process_record(
        &self,
        record: &BillRecord,
        index: usize,
        total: usize,
        rotator: &mut CredentialRotator,
    ) -> Result<RecordOutcome, RunError> {
        if record.is_blank() {
            debug!(bill_id = %record.bill_id, "Skipping record without title or body");
            return Ok(RecordOutcome::Skipped);
        }

        let Some(credential) = rotator.current() else {
            warn!(bill_id = %record.bill_id, "No usable credential");
            return Ok(RecordOutcome::Abort);
        };

        info!(
            bill_id = %record.bill_id,
            bill_no = %record.bill_no,
            index = index + 1,
            total,
            credential = %rotator.describe(),
            "Summarizing"
        );

        let request = GenerationRequest {
            instructions: self.instructions,
            title: &record.title,
            body: &record.body,
            timeout: self.settings.timeout,
        };

        let generated = self.generator.generate(request, credential).await;
        let raw = match generated {
            Ok(raw) => raw,
            Err(e) if e.is_fatal() => {
                return Err(RunError::GenerationUnavailable(e.to_string()));
            }
            Err(e) => {
                let failure = e.to_string();
                if !is_quota_exhausted(&failure) {
                    warn!(bill_id = %record.bill_id, error = %failure, "Generation failed");
                    return Ok(RecordOutcome::Error);
                }
                warn!(bill_id = %record.bill_id, error = %failure, "Quota exhausted");
                return Ok(if rotator.advance() {
                    RecordOutcome::Rotated
                } else {
                    RecordOutcome::Abort
                });
            }
        };

        let parsed = parse_response(&raw);
        if !parsed.is_complete() {
            warn!(
                bill_id = %record.bill_id,
                status = ?parsed.status,
                "Response missing headline or summary"
            );
            return Ok(RecordOutcome::Error);
        }

        match self.writer.write(&record.bill_id, &parsed.summary).await {
            Ok(()) => {
                info!(bill_id = %record.bill_id, headline = %parsed.summary.headline, "Saved");
                Ok(RecordOutcome::Success)
            }
            Err(e) => {
                warn!(bill_id = %record.bill_id, error = %e, "Write failed");
                Ok(RecordOutcome::Error)
            }
        }
    }
}

/// Resolve the headline layout once, then run batches with settings from `config`.
pub async fn run_summarization(
    store: &dyn BillStore,
    generator: &dyn SummaryGenerator,
    instructions: &str,
    config: &BillbriefConfig,
    rotator: &mut CredentialRotator,
) -> Result<RunReport, RunError> {
    let writer = SummaryWriter::resolve(store).await?;
    let runner = BatchRunner::new(
        store,
        writer,
        generator,
        instructions,
        &config.pacing,
        BatchSettings::from_config(config),
    );
    runner.run(rotator).await
}
