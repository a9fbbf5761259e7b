//! Global, store-wide design settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// A payment or shipping provider binding.
///
/// Credentials are never stored here; `secret_ref` names an entry in the
/// hosting platform's secret store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
    pub provider: String,
    pub secret_ref: String,
}

/// Site-wide settings captured in history snapshots alongside blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub currency: String,
    pub header_style: String,
    pub hero_style: String,
    pub product_card_style: String,
    pub footer_style: String,
    pub scrollbar_style: String,
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_height: Option<u32>,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub seo: SeoSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_provider: Option<ProviderRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_provider: Option<ProviderRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "My Store".into(),
            tagline: None,
            currency: "USD".into(),
            header_style: "canvas".into(),
            hero_style: "impact".into(),
            product_card_style: "classic".into(),
            footer_style: "columns".into(),
            scrollbar_style: "native".into(),
            primary_color: "#000000".into(),
            accent_color: None,
            secondary_color: None,
            background_color: None,
            footer_background_color: None,
            footer_text_color: None,
            logo_url: None,
            logo_height: None,
            typography: Typography::default(),
            seo: SeoSettings::default(),
            payment_provider: None,
            shipping_provider: None,
            extra: Map::new(),
        }
    }
}

/// Returns `true` for `#rgb` and `#rrggbb` hex colors.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("Store name must not be empty".into()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CoreError::Validation(format!(
                "Invalid currency code '{}'",
                self.currency
            )));
        }

        let colors = [
            ("primaryColor", Some(&self.primary_color)),
            ("accentColor", self.accent_color.as_ref()),
            ("secondaryColor", self.secondary_color.as_ref()),
            ("backgroundColor", self.background_color.as_ref()),
            ("footerBackgroundColor", self.footer_background_color.as_ref()),
            ("footerTextColor", self.footer_text_color.as_ref()),
            ("headingColor", self.typography.heading_color.as_ref()),
            ("bodyColor", self.typography.body_color.as_ref()),
            ("linkColor", self.typography.link_color.as_ref()),
        ];
        for (field, value) in colors {
            if let Some(value) = value {
                if !is_hex_color(value) {
                    return Err(CoreError::Validation(format!(
                        "{field} must be a hex color, got '{value}'"
                    )));
                }
            }
        }
        Ok(())
    }
}
