//! AI copy generation collaborator.
//!
//! The studio asks an external text service for copy and writes the result
//! into one text field of a block. The service is a black box; failures
//! leave the field unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Maximum prompt length accepted from clients.
pub const MAX_PROMPT_CHARS: usize = 2_000;

/// Generates marketing copy from a prompt.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;
}

/// Generator used when no text service is configured. Always fails.
pub struct DisabledCopyGenerator;

#[async_trait]
impl CopyGenerator for DisabledCopyGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, CoreError> {
        Err(CoreError::Internal("copy generation is not configured".into()))
    }
}

/// Request to fill one block field with generated copy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CopyRequest {
    /// Data key to write, e.g. `heading` or `buttonText`.
    pub field: String,
    pub prompt: String,
}

impl CopyRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.field.trim().is_empty() || self.field == "style" {
            return Err(CoreError::Validation(format!(
                "Field '{}' cannot receive generated copy",
                self.field
            )));
        }
        let len = self.prompt.chars().count();
        if len == 0 || len > MAX_PROMPT_CHARS {
            return Err(CoreError::Validation(format!(
                "Prompt must be between 1 and {MAX_PROMPT_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// The data patch that writes `text` into the requested field.
    pub fn patch(&self, text: &str) -> Map<String, Value> {
        let mut patch = Map::new();
        patch.insert(self.field.clone(), Value::String(text.trim().to_string()));
        patch
    }
}
