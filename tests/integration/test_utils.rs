//! Shared test utilities for integration tests
//!
//! Provides an isolated environment helper, a scripted generator standing in for
//! the Gemini client, and bill fixtures for the in-memory store.

use async_trait::async_trait;
use billbrief::bill::BillRecord;
use billbrief::config::{BillbriefConfig, PacingConfig};
use billbrief::credentials::Credential;
use billbrief::error::GenerationError;
use billbrief::provider::{GenerationRequest, SummaryGenerator};
use chrono::NaiveDate;
use parking_lot::Mutex as PlMutex;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const TRACKED_VARS: [&str; 8] = [
    "HOME",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "BILLBRIEF_ENV",
    "BILLBRIEF__BATCH__SIZE",
    "BILLBRIEF__CREDENTIALS__KEYS",
    "DATABASE_URL",
    "GEMINI_API_KEY",
];

/// Environment variable state to restore after test
struct EnvState {
    values: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            values: TRACKED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.values {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG directories inside `test_dir` and every tracked
/// variable cleared, restoring the original environment afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    for name in TRACKED_VARS {
        std::env::remove_var(name);
    }
    let test_config_home = test_dir.path().join("config_home");
    let test_data_home = test_dir.path().join("data");
    let test_home = test_dir.path().join("home");
    for dir in [&test_config_home, &test_data_home, &test_home] {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());
    std::env::set_var("XDG_DATA_HOME", test_data_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// One scripted generation outcome.
pub type Scripted = Result<String, GenerationError>;

/// Generator that replays scripted outcomes in order and records each call.
pub struct ScriptedGenerator {
    script: PlMutex<VecDeque<Scripted>>,
    calls: PlMutex<Vec<GeneratorCall>>,
}

/// What the generator was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCall {
    pub title: String,
    pub credential: String,
}

impl ScriptedGenerator {
    pub fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            script: PlMutex::new(script.into_iter().collect()),
            calls: PlMutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SummaryGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        credential: &Credential,
    ) -> Result<String, GenerationError> {
        self.calls.lock().push(GeneratorCall {
            title: request.title.to_string(),
            credential: credential.expose().to_string(),
        });
        self.script
            .lock()
            .pop_front()
            .unwrap_or(Err(GenerationError::Empty))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Eligible bill proposed in 2025.
pub fn bill(bill_id: &str, bill_no: &str) -> BillRecord {
    BillRecord {
        bill_id: bill_id.to_string(),
        bill_no: bill_no.to_string(),
        title: format!("{} 일부개정법률안", bill_id),
        body: format!("{} 제안이유 및 주요내용", bill_id),
        proposal_date: date(2025, 3, 10),
    }
}

/// Well-formed model output.
pub fn reply(headline: &str) -> Scripted {
    Ok(format!(
        r#"{{"headline":"{}","summary":"요약입니다.","categories":["주거"],"vote":{{"for":{{"P":1}},"against":{{"M":1}}}}}}"#,
        headline
    ))
}

/// The failure Gemini returns when a key runs out of quota.
pub fn quota_exhausted() -> Scripted {
    Err(GenerationError::Http {
        status: 429,
        message: "Resource has been exhausted (e.g. check quota).".to_string(),
    })
}

/// Defaults with every sleep removed.
pub fn fast_config() -> BillbriefConfig {
    let mut config = BillbriefConfig::default();
    config.pacing = PacingConfig::immediate();
    config.batch.pause_secs = 0.0;
    config.journal.enabled = false;
    config
}

pub fn credentials(keys: &[&str]) -> Vec<Credential> {
    keys.iter().map(|k| Credential::new(*k)).collect()
}
