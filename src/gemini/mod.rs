//! Gemini `generateContent` client
//!
//! - `protocol`: request/response wire types
//!
//! The formatter only sees the [`GenerativeModel`] trait, so tests can swap
//! the HTTP client for a mock.

pub mod protocol;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::{Credential, Settings};
use crate::error::DispatchError;
use protocol::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// A backend that turns one prompt into one completion
#[cfg_attr(test, mockall::automock)]
pub trait GenerativeModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, DispatchError>;

    /// Model name for logging
    fn name(&self) -> String;
}

pub struct GeminiClient {
    client: Client,
    credential: Credential,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(settings: &Settings, credential: Credential) -> Result<Self, DispatchError> {
        // `None` disables reqwest's built-in 30s default
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            client,
            credential,
            model: settings.model.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl GenerativeModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, DispatchError> {
        debug!("Sending {} byte prompt to {}", prompt.len(), self.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.credential.expose())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(service_error(status, &body));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| DispatchError::MalformedResponse {
                details: e.to_string(),
            })?;

        parsed.text()
    }

    fn name(&self) -> String {
        self.model.clone()
    }
}

fn service_error(status: StatusCode, body: &str) -> DispatchError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.error.status.is_empty() => envelope.error.message,
        Ok(envelope) => format!("{} ({})", envelope.error.message, envelope.error.status),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.trim().to_string(),
    };

    DispatchError::Service {
        status: status.as_u16(),
        message,
    }
}
