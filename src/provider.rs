//! Generation Provider
//!
//! Seam between the batch loop and the external text generation service. The loop
//! only sees [`SummaryGenerator`]; the Gemini client lives in [`gemini`] and the
//! instruction text in [`prompt`]. Clients never retry: rotation and pacing policy
//! belong to the batch orchestrator.

use crate::config::GenerationConfig;
use crate::credentials::Credential;
use crate::error::GenerationError;
use async_trait::async_trait;
use std::time::Duration;

pub mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

/// Lower-cased substrings that mark a failure as quota exhaustion.
pub const QUOTA_PATTERNS: [&str; 5] = [
    "429",
    "quota",
    "exceeded",
    "resource_exhausted",
    "rate limit",
];

/// One generation call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// System instructions
    pub instructions: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    /// Upper bound for the whole call
    pub timeout: Duration,
}

/// External text generation capability.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Generate raw text for one bill using the given credential.
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        credential: &Credential,
    ) -> Result<String, GenerationError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// True when failure text indicates the active credential ran out of quota.
pub fn is_quota_exhausted(failure_text: &str) -> bool {
    let lower = failure_text.to_lowercase();
    QUOTA_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Create the configured generator. A client that cannot be built means the
/// capability is unavailable for the whole run.
pub fn create_generator(
    config: &GenerationConfig,
) -> Result<Box<dyn SummaryGenerator>, GenerationError> {
    Ok(Box::new(GeminiClient::new(
        config.model.clone(),
        config.base_url.clone(),
        config.temperature,
    )?))
}
