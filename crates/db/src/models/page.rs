//! `pages` table rows.

use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use studio_core::block::Block;
use studio_core::error::CoreError;
use studio_core::page::Page;
use studio_core::types::{StoreId, Timestamp};

use super::parse_text;

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow)]
pub struct PageRow {
    pub id: String,
    pub store_id: StoreId,
    pub title: String,
    pub slug: String,
    pub page_type: String,
    pub blocks: Json<Vec<Block>>,
    pub metadata: Json<Map<String, Value>>,
    pub display_order: i32,
    pub link_type: String,
    pub external_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PageRow {
    pub fn into_page(self) -> Result<Page, CoreError> {
        Ok(Page {
            id: self.id,
            title: self.title,
            slug: self.slug,
            page_type: parse_text("page_type", &self.page_type)?,
            blocks: self.blocks.0,
            metadata: self.metadata.0,
            display_order: self.display_order,
            link_type: parse_text("link_type", &self.link_type)?,
            external_url: self.external_url,
        })
    }
}
