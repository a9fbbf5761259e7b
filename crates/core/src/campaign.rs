//! Marketing email drafts written by the copy generator.

use serde::{Deserialize, Serialize};

use crate::copy::MAX_PROMPT_CHARS;
use crate::error::CoreError;
use crate::product::Product;
use crate::store_config::StoreConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CampaignRequest {
    /// What the email is about, in the merchant's words.
    pub brief: String,
    /// Product to feature.
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub discount_code: Option<String>,
}

impl CampaignRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        let len = self.brief.trim().chars().count();
        if len == 0 || len > MAX_PROMPT_CHARS {
            return Err(CoreError::Validation(format!(
                "Brief must be between 1 and {MAX_PROMPT_CHARS} characters"
            )));
        }
        if let Some(code) = &self.discount_code {
            if code.len() > 40 || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(CoreError::Validation(format!("Invalid discount code '{code}'")));
            }
        }
        Ok(())
    }

    /// Prompt sent to the copy generator.
    pub fn prompt(&self, config: &StoreConfig, product: Option<&Product>) -> String {
        let mut prompt = format!(
            "Write a short marketing email for the store \"{}\". Start with a line \
             \"Subject: ...\" followed by a blank line and the body.\n\nBrief: {}",
            config.name,
            self.brief.trim()
        );
        if let Some(tagline) = &config.tagline {
            prompt.push_str(&format!("\nStore tagline: {tagline}"));
        }
        if let Some(product) = product {
            prompt.push_str(&format!(
                "\nFeatured product: {} ({})",
                product.name, product.description
            ));
        }
        if let Some(code) = &self.discount_code {
            prompt.push_str(&format!("\nInclude the discount code {code}."));
        }
        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignEmail {
    pub subject: String,
    pub body: String,
}

impl CampaignEmail {
    /// Split generated text into subject and body.
    ///
    /// A leading `Subject:` line becomes the subject; otherwise
    /// `fallback_subject` is used and the whole text is the body.
    pub fn parse(text: &str, fallback_subject: &str) -> Self {
        let text = text.trim();
        let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
        match first
            .trim()
            .strip_prefix("Subject:")
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(subject) => CampaignEmail {
                subject: subject.to_string(),
                body: rest.trim().to_string(),
            },
            None => CampaignEmail {
                subject: fallback_subject.to_string(),
                body: text.to_string(),
            },
        }
    }
}
