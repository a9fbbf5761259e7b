//! HTTP-backed [`CopyGenerator`].
//!
//! Posts `{"prompt": ...}` to the configured endpoint and reads `{"text": ...}`
//! back. Any transport, status or decoding problem is reported as
//! [`CoreError::Internal`]; callers treat that as "no copy generated".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::copy::CopyGenerator;
use studio_core::error::CoreError;

/// Timeout for a single generation request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    text: String,
}

pub struct HttpCopyGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpCopyGenerator {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl CopyGenerator for HttpCopyGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CoreError::Internal(format!("Copy request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Internal(format!(
                "Copy endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("Invalid copy response: {e}")))?;

        if body.text.trim().is_empty() {
            return Err(CoreError::Internal("Copy endpoint returned no text".into()));
        }
        Ok(body.text)
    }
}
