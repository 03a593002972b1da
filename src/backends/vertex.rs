//! Vertex AI integration
//!
//! Calls the `countTokens` endpoint of a Gemini model and maps the reply to
//! [`TokenCounts`]. Authentication uses a bearer token, taken from the
//! configuration or from `gcloud auth print-access-token`.

use serde::{Deserialize, Serialize};
use std::process::Command;
use std::time::Duration;
use tracing::debug;

use crate::core::error::TokenizerError;
use crate::core::model::TokenCounts;
use crate::core::tokenizer::TokenCounter;
use crate::core::util::command_exists;

/// Default region for Vertex AI requests
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for Vertex AI
#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub project: Option<String>,
    pub location: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project: None,
            location: DEFAULT_LOCATION.to_string(),
            access_token: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl VertexConfig {
    /// Build the countTokens URL for a model
    pub fn endpoint(&self, model: &str) -> Result<String, TokenizerError> {
        let project = self
            .project
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(TokenizerError::MissingProject)?;

        Ok(format!(
            "https://{loc}-aiplatform.googleapis.com/v1/projects/{project}/locations/{loc}/publishers/google/models/{model}:countTokens",
            loc = self.location,
            project = project,
            model = model
        ))
    }
}

#[derive(Debug, Serialize)]
struct CountTokensRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountTokensResponse {
    #[serde(default)]
    total_tokens: u64,
    #[serde(default)]
    total_billable_characters: u64,
}

impl<'a> CountTokensRequest<'a> {
    fn for_text(text: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text }],
            }],
        }
    }
}

/// Token counter backed by the Vertex AI `countTokens` API
pub struct VertexTokenCounter {
    config: VertexConfig,
    http_client: reqwest::blocking::Client,
}

impl VertexTokenCounter {
    pub fn new(config: VertexConfig) -> Result<Self, TokenizerError> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| TokenizerError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn access_token(&self) -> Result<String, TokenizerError> {
        if let Some(token) = self.config.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(token.to_string());
        }
        gcloud_access_token()
    }
}

/// Ask the gcloud CLI for a short-lived access token
fn gcloud_access_token() -> Result<String, TokenizerError> {
    if !command_exists("gcloud") {
        return Err(TokenizerError::MissingCredentials(
            "set --access-token / GOOGLE_ACCESS_TOKEN or install the gcloud CLI".to_string(),
        ));
    }

    let output = Command::new("gcloud")
        .args(["auth", "print-access-token"])
        .output()
        .map_err(|e| TokenizerError::MissingCredentials(e.to_string()))?;

    if !output.status.success() {
        return Err(TokenizerError::MissingCredentials(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(TokenizerError::MissingCredentials(
            "gcloud returned an empty token".to_string(),
        ));
    }
    Ok(token)
}

impl TokenCounter for VertexTokenCounter {
    fn count_tokens(&self, model: &str, text: &str) -> Result<TokenCounts, TokenizerError> {
        let url = self.config.endpoint(model)?;
        let token = self.access_token()?;

        debug!("POST {} ({} bytes)", url, text.len());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&CountTokensRequest::for_text(text))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TokenizerError::Request(format!(
                        "timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else if e.is_connect() {
                    TokenizerError::Request(format!(
                        "cannot connect to {}-aiplatform.googleapis.com",
                        self.config.location
                    ))
                } else {
                    TokenizerError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TokenizerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| TokenizerError::Request(e.to_string()))?;
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<TokenCounts, TokenizerError> {
    let parsed: CountTokensResponse =
        serde_json::from_str(body).map_err(|e| TokenizerError::InvalidResponse(e.to_string()))?;

    Ok(TokenCounts {
        total_tokens: parsed.total_tokens,
        total_billable_characters: parsed.total_billable_characters,
    })
}
