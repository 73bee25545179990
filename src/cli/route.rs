//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::batch::run_summarization;
use crate::cli::command_name;
use crate::cli::parse::{Commands, RunArgs};
use crate::cli::presentation::{
    format_history_json, format_history_text, format_run_report_json, format_run_report_text,
    format_status_json, format_status_text, StatusReport,
};
use crate::config::{default_data_dir, BillbriefConfig, ConfigLoader};
use crate::credentials::{discover_from_process_env, CredentialRotator};
use crate::error::{ConfigError, RunError};
use crate::journal::{RunJournal, RunRecord, RunSettings};
use crate::provider::create_generator;
use crate::provider::prompt::load_instructions;
use crate::store::{BillStore, PgBillStore, RecordSelector};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{info, info_span, warn};

/// Journal entries kept after each run.
const MAX_JOURNAL_RUNS: usize = 200;

/// Runtime context for CLI execution: workspace and effective configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: BillbriefConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, RunError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: BillbriefConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &BillbriefConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, RunError> {
        let span = info_span!("command", name = command_name(command));
        let _guard = span.enter();
        let started = Instant::now();

        let result = match command {
            Commands::Run(args) => self.handle_run(args),
            Commands::Status {
                limit,
                cutoff_date,
                format,
            } => self.handle_status(*limit, *cutoff_date, format),
            Commands::History { limit, format } => self.handle_history(*limit, format),
            Commands::Config => self.handle_config(),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(elapsed_ms, "Command completed"),
            Err(e) => warn!(elapsed_ms, error = %e, "Command failed"),
        }
        result
    }

    fn handle_run(&self, args: &RunArgs) -> Result<String, RunError> {
        let config = apply_run_overrides(self.config.clone(), args);
        config.ensure_valid()?;

        let credentials =
            discover_from_process_env(args.api_keys.as_deref(), &config.credentials.keys)?;
        let instructions = load_instructions(config.generation.instructions_file.as_deref())?;
        let generator = create_generator(&config.generation)
            .map_err(|e| RunError::GenerationUnavailable(e.to_string()))?;
        let database_url = config
            .database
            .url
            .clone()
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        info!(
            workspace = %self.workspace_root.display(),
            credentials = credentials.len(),
            "Run configured"
        );

        let journal = open_journal(&config);
        let mut record = RunRecord::start(RunSettings {
            model: config.generation.model.clone(),
            batch_size: config.batch.size,
            cutoff: config.batch.cutoff_date,
            credentials: credentials.len(),
            max_batches: config.batch.max_batches,
        });
        record_run(journal.as_ref(), &record);

        let mut rotator = CredentialRotator::new(credentials);
        let runtime = build_runtime()?;
        let result = runtime.block_on(async {
            let store =
                PgBillStore::connect(&database_url, config.database.connect_timeout()).await?;
            let outcome = run_summarization(
                &store,
                generator.as_ref(),
                &instructions,
                &config,
                &mut rotator,
            )
            .await;
            store.close().await;
            outcome
        });

        match &result {
            Ok(report) => record.finish(report),
            Err(e) => record.fail(e.to_string()),
        }
        record_run(journal.as_ref(), &record);
        if let Some(journal) = journal.as_ref() {
            if let Err(e) = journal.prune(MAX_JOURNAL_RUNS) {
                warn!(error = %e, "Failed to prune run journal");
            }
        }

        let report = result?;
        if args.format == "json" {
            Ok(format_run_report_json(&report))
        } else {
            Ok(format_run_report_text(&report))
        }
    }

    fn handle_status(
        &self,
        limit: usize,
        cutoff_date: Option<NaiveDate>,
        format: &str,
    ) -> Result<String, RunError> {
        let cutoff = cutoff_date.unwrap_or(self.config.batch.cutoff_date);
        let database_url = self
            .config
            .database
            .url
            .clone()
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let runtime = build_runtime()?;
        let report = runtime.block_on(async {
            let store =
                PgBillStore::connect(&database_url, self.config.database.connect_timeout())
                    .await?;
            let report = status_report(&store, limit, cutoff).await;
            store.close().await;
            report
        })?;

        if format == "json" {
            Ok(format_status_json(&report))
        } else {
            Ok(format_status_text(&report))
        }
    }

    fn handle_history(&self, limit: usize, format: &str) -> Result<String, RunError> {
        if !self.config.journal.enabled {
            return Ok("Run journal is disabled (journal.enabled = false).".to_string());
        }
        let journal = RunJournal::open(&journal_path(&self.config))?;
        let runs = journal.list_runs(limit)?;
        if format == "json" {
            Ok(format_history_json(&runs))
        } else {
            Ok(format_history_text(&runs))
        }
    }

    fn handle_config(&self) -> Result<String, RunError> {
        toml::to_string_pretty(&self.config.redacted())
            .map_err(|e| RunError::Output(format!("Failed to render configuration: {}", e)))
    }
}

/// Counters and upcoming records for `cutoff`.
pub async fn status_report(
    store: &dyn BillStore,
    limit: usize,
    cutoff: NaiveDate,
) -> Result<StatusReport, RunError> {
    let stats = store.progress(cutoff).await?;
    let upcoming = RecordSelector::new(store).select(limit, cutoff).await?;
    Ok(StatusReport {
        cutoff,
        backend: store.backend_name().to_string(),
        stats,
        upcoming,
    })
}

/// Fold `run` flags over the loaded configuration.
pub fn apply_run_overrides(mut config: BillbriefConfig, args: &RunArgs) -> BillbriefConfig {
    if let Some(ref model) = args.model {
        config.generation.model = model.clone();
    }
    if let Some(size) = args.batch_size {
        config.batch.size = size;
    }
    if let Some(cutoff) = args.cutoff_date {
        config.batch.cutoff_date = cutoff;
    }
    if let Some(timeout) = args.timeout {
        config.generation.timeout_secs = timeout;
    }
    if let Some(sleep) = args.sleep {
        config.pacing.base_interval_secs = sleep;
    }
    if let Some(auto_continue) = args.auto_continue {
        config.batch.auto_continue = auto_continue;
    }
    if let Some(max_batches) = args.max_batches {
        config.batch.max_batches = Some(max_batches);
    }
    config
}

fn build_runtime() -> Result<Runtime, RunError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RunError::Runtime(format!("Failed to create tokio runtime: {}", e)))
}

fn journal_path(config: &BillbriefConfig) -> PathBuf {
    config
        .journal
        .path
        .clone()
        .unwrap_or_else(|| default_data_dir().join("journal"))
}

fn open_journal(config: &BillbriefConfig) -> Option<RunJournal> {
    if !config.journal.enabled {
        return None;
    }
    let path = journal_path(config);
    match RunJournal::open(&path) {
        Ok(journal) => {
            match journal.mark_interrupted_runs() {
                Ok(0) => {}
                Ok(n) => info!(count = n, "Marked interrupted runs"),
                Err(e) => warn!(error = %e, "Failed to scan run journal"),
            }
            Some(journal)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Run journal unavailable");
            None
        }
    }
}

fn record_run(journal: Option<&RunJournal>, record: &RunRecord) {
    if let Some(journal) = journal {
        if let Err(e) = journal.put_run(record) {
            warn!(run_id = %record.run_id, error = %e, "Failed to write run journal");
        }
    }
}
