//! Language-Model Backend
//!
//! The [`LanguageModel`] seam the assistant uses for free-form chat, and a
//! blocking client for a local Ollama server that implements it.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Generation on local hardware can take minutes.
const GENERATE_TIMEOUT: Duration = Duration::from_secs(180);
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures talking to the language-model backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Failed to get response from Ollama: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Ollama returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A text-completion backend the assistant falls back to for free-form chat.
#[cfg_attr(test, mockall::automock)]
pub trait LanguageModel {
    /// Generates a completion for `prompt`.
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// A blocking client for a local Ollama server.
pub struct OllamaClient {
    http: reqwest::blocking::Client,
    url: String,
    model: String,
}

impl OllamaClient {
    /// Creates a client without contacting the server.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(GENERATE_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            url: url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Creates a client and checks that the server answers on `/api/tags`.
    ///
    /// Returns `None` when the server is unreachable, so callers never hold a
    /// half-initialized backend.
    pub fn connect(url: &str, model: &str) -> Option<Self> {
        let client = match Self::new(url, model) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "Failed to build Ollama HTTP client");
                return None;
            }
        };
        match client.check_health() {
            Ok(()) => {
                info!(url = %client.url, model = %client.model, "Ollama connected successfully");
                Some(client)
            }
            Err(e) => {
                warn!(url = %client.url, error = %e, "Cannot connect to Ollama. Start it with: ollama serve");
                None
            }
        }
    }

    fn check_health(&self) -> Result<(), BackendError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.url))
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Status(response.status()))
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LanguageModel for OllamaClient {
    fn generate(&self, prompt: &str, temperature: f32) -> Result<String, BackendError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions { temperature },
        };
        let response = self
            .http
            .post(format!("{}/api/generate", self.url))
            .json(&request)
            .send()?
            .error_for_status()?;
        let body: GenerateResponse = response.json()?;
        Ok(body.response)
    }
}
