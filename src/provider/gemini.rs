//! Gemini `generateContent` client.

use crate::credentials::Credential;
use crate::error::GenerationError;
use crate::provider::prompt::build_user_prompt;
use crate::provider::{GenerationRequest, SummaryGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const RESPONSE_MIME_TYPE: &str = "application/json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Primary accessor: exactly one candidate whose parts are all text.
    fn text(&self) -> Option<String> {
        let [candidate] = self.candidates.as_slice() else {
            return None;
        };
        let parts = &candidate.content.as_ref()?.parts;
        if parts.is_empty() {
            return None;
        }
        let mut out = String::new();
        for part in parts {
            out.push_str(part.text.as_deref()?);
        }
        Some(out).filter(|text| !text.is_empty())
    }

    /// Fallback: first non-empty part text anywhere in the candidate list.
    fn nested_text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .find(|text| !text.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn extract_text(&self) -> Option<String> {
        self.text().or_else(|| self.nested_text())
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
    }
}

// Helper function to map transport errors to GenerationError
fn map_http_error(error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        GenerationError::Transport(format!("Connection error: {}", error))
    } else {
        GenerationError::Transport(format!("HTTP error: {}", error))
    }
}

/// Gemini provider client
pub struct GeminiClient {
    client: Client,
    model: String,
    base_url: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(
        model: String,
        base_url: Option<String>,
        temperature: f32,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                GenerationError::Unavailable(format!("Failed to create HTTP client: {}", e))
            })?;
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            model,
            base_url,
            temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl SummaryGenerator for GeminiClient {
    async fn generate(
        &self,
        request: GenerationRequest<'_>,
        credential: &Credential,
    ) -> Result<String, GenerationError> {
        if credential.is_blank() {
            return Err(GenerationError::MissingCredential);
        }

        let user_prompt = build_user_prompt(request.title, request.body);
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.instructions,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &user_prompt }],
            }],
            generation_config: GenerationSettings {
                temperature: self.temperature,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.expose())
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                404 => GenerationError::Unavailable(format!(
                    "Model {} not found: {}",
                    self.model, error_text
                )),
                code => GenerationError::Http {
                    status: code,
                    message: error_text,
                },
            });
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transport(format!("Failed to parse response: {}", e)))?;

        match completion.extract_text() {
            Some(text) => Ok(text),
            None => {
                debug!(
                    finish_reason = completion.finish_reason().unwrap_or("unknown"),
                    "Generation returned no text"
                );
                Err(GenerationError::Empty)
            }
        }
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
