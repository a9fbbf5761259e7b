//! Row structs and their conversions into core domain types.
//!
//! Each submodule holds a `FromRow` struct matching one table. Enum-like
//! text columns are parsed through the domain type's serde representation.

use serde::de::DeserializeOwned;
use studio_core::error::CoreError;

pub mod asset;
pub mod onboarding;
pub mod page;
pub mod product;
pub mod store_config;

/// Parse a text column into a serde enum, e.g. `"home"` into `PageType::Home`.
pub(crate) fn parse_text<T: DeserializeOwned>(column: &str, value: &str) -> Result<T, CoreError> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        CoreError::Storage(format!("Unexpected value '{value}' in column {column}"))
    })
}
