//! Error types for the billbrief summarization pipeline.

use thiserror::Error;

/// Configuration errors. Fatal before any record is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API credentials supplied. Use --api-keys or set GEMINI_API_KEY")]
    NoCredentials,

    #[error("Database URL not configured. Set database.url or DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

/// Bill store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// Errors surfaced by a generation call. The display text is what the batch
/// loop inspects for quota-exhaustion patterns.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation capability unavailable: {0}")]
    Unavailable(String),

    #[error("No credential supplied for generation call")]
    MissingCredential,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("No text returned")]
    Empty,
}

impl GenerationError {
    /// Fatal errors end the run; every other error is isolated to its record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable(_) | GenerationError::MissingCredential
        )
    }
}

/// Run journal errors
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Journal storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Journal data error: {0}")]
    Data(#[from] serde_json::Error),

    #[error("Journal path error: {0}")]
    Path(String),
}

/// Run-level errors. Anything here stops the job.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Generation capability unavailable: {0}")]
    GenerationUnavailable(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl RunError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) | RunError::GenerationUnavailable(_) => 2,
            _ => 1,
        }
    }
}
