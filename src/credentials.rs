//! Credential Pool
//!
//! Ordered pool of API keys for the generation service. The rotator only moves
//! forward: when the active key reports quota exhaustion it is marked spent and the
//! next unspent key becomes active. Once the pool runs dry the run stops.

use crate::error::ConfigError;
use std::fmt;
use tracing::{debug, info};

/// Environment variable holding the default key (always first in the pool).
pub const DEFAULT_KEY_VAR: &str = "GEMINI_API_KEY";

const PREVIEW_CHARS: usize = 8;

/// API key material. Debug and Display only ever show a short preview.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key, for building the request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.preview())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

/// One position in the pool.
#[derive(Debug, Clone)]
pub struct CredentialSlot {
    pub position: usize,
    pub credential: Credential,
    pub exhausted: bool,
}

/// Forward-only rotation over the credential pool.
#[derive(Debug)]
pub struct CredentialRotator {
    slots: Vec<CredentialSlot>,
    index: usize,
}

impl CredentialRotator {
    pub fn new(credentials: Vec<Credential>) -> Self {
        let slots = credentials
            .into_iter()
            .enumerate()
            .map(|(position, credential)| CredentialSlot {
                position,
                credential,
                exhausted: false,
            })
            .collect();
        Self { slots, index: 0 }
    }

    /// Active credential, or `None` once the pool is exhausted.
    pub fn current(&self) -> Option<&Credential> {
        self.slots.get(self.index).map(|slot| &slot.credential)
    }

    /// Mark the active credential exhausted and move to the next unspent one.
    /// Returns `false` when no usable credential remains; that state is final.
    pub fn advance(&mut self) -> bool {
        if let Some(slot) = self.slots.get_mut(self.index) {
            slot.exhausted = true;
            debug!(position = slot.position, "Credential marked exhausted");
        }

        self.index = (self.index + 1).min(self.slots.len());
        while self.index < self.slots.len() {
            if !self.slots[self.index].exhausted {
                info!(
                    position = self.index + 1,
                    pool_size = self.slots.len(),
                    "Switched to next credential"
                );
                return true;
            }
            self.index += 1;
        }
        false
    }

    pub fn has_more(&self) -> bool {
        self.index < self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn exhausted_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.exhausted).count()
    }

    /// Human-readable position of the active credential, e.g. `2/3 (AIzaSyB1...)`.
    pub fn describe(&self) -> String {
        match self.current() {
            Some(credential) => format!(
                "{}/{} ({})",
                self.index + 1,
                self.slots.len(),
                credential.preview()
            ),
            None => "no usable credential".to_string(),
        }
    }
}

/// Build the credential pool.
///
/// An explicit comma-separated list wins, then keys listed in configuration, then
/// the environment: `GEMINI_API_KEY` followed by `GEMINI_API_KEY_1`,
/// `GEMINI_API_KEY_2`, ... up to the first missing index. Blank entries are
/// skipped and duplicates keep their first position.
pub fn discover_credentials<F>(
    explicit: Option<&str>,
    configured: &[String],
    env: F,
) -> Result<Vec<Credential>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw: Vec<String> = if let Some(list) = explicit.filter(|l| !l.trim().is_empty()) {
        list.split(',').map(str::to_string).collect()
    } else if !configured.is_empty() {
        configured.to_vec()
    } else {
        let mut keys = Vec::new();
        if let Some(default_key) = env(DEFAULT_KEY_VAR) {
            keys.push(default_key);
        }
        let mut n = 1;
        while let Some(key) = env(&format!("{}_{}", DEFAULT_KEY_VAR, n)) {
            if key.trim().is_empty() {
                break;
            }
            keys.push(key);
            n += 1;
        }
        keys
    };

    let mut pool: Vec<Credential> = Vec::new();
    for key in raw {
        let credential = Credential::new(key.trim());
        if credential.is_blank() || pool.contains(&credential) {
            continue;
        }
        pool.push(credential);
    }

    if pool.is_empty() {
        return Err(ConfigError::NoCredentials);
    }
    Ok(pool)
}

/// [`discover_credentials`] against the process environment.
pub fn discover_from_process_env(
    explicit: Option<&str>,
    configured: &[String],
) -> Result<Vec<Credential>, ConfigError> {
    discover_credentials(explicit, configured, |name| std::env::var(name).ok())
}
