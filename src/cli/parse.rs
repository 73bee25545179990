//! CLI parse: clap types for billbrief. No behavior; definitions only.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// billbrief - AI headline and summary generation for legislative bills
#[derive(Parser, Debug)]
#[command(name = "billbrief")]
#[command(version)]
#[command(about = "Generate news-style headlines, summaries, categories and vote weights for bills")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (config/ is read from here)
    #[arg(long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize pending bills in batches
    Run(RunArgs),
    /// Show backlog progress and the next bills in processing order
    Status {
        /// Number of upcoming bills to list
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Cutoff date (defaults to batch.cutoff_date)
        #[arg(long)]
        cutoff_date: Option<NaiveDate>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show recent runs from the local journal
    History {
        /// Number of runs to list
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration with secrets redacted
    Config,
}

/// Overrides for a summarization run. Unset flags keep configured values.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Generation model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Records per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Only bills proposed on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub cutoff_date: Option<NaiveDate>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Base pause between records in seconds
    #[arg(long)]
    pub sleep: Option<f64>,

    /// Keep running batches until the backlog is drained (true/false)
    #[arg(long)]
    pub auto_continue: Option<bool>,

    /// Stop after this many batches
    #[arg(long)]
    pub max_batches: Option<u32>,

    /// Comma-separated API keys (overrides configured and environment keys)
    #[arg(long)]
    pub api_keys: Option<String>,

    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,
}
