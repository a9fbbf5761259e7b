//! `assets` table rows.

use sqlx::FromRow;
use studio_core::asset::Asset;
use studio_core::error::CoreError;
use studio_core::types::{StoreId, Timestamp};

use super::parse_text;

/// Asset metadata without the bytes.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub id: String,
    pub store_id: StoreId,
    pub name: String,
    pub kind: String,
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub created_at: Timestamp,
}

impl AssetRow {
    pub fn into_asset(self) -> Result<Asset, CoreError> {
        Ok(Asset {
            id: self.id,
            name: self.name,
            kind: parse_text("kind", &self.kind)?,
            content_type: self.content_type,
            size: self.size,
            url: self.url,
            created_at: self.created_at,
        })
    }
}

/// Metadata plus bytes, for serving an asset.
#[derive(Debug, Clone, FromRow)]
pub struct AssetContentRow {
    #[sqlx(flatten)]
    pub asset: AssetRow,
    pub data: Vec<u8>,
}
