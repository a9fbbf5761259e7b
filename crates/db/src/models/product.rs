//! `products` table rows.

use sqlx::FromRow;
use studio_core::error::CoreError;
use studio_core::product::Product;
use studio_core::types::{StoreId, Timestamp};

use super::parse_text;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub store_id: StoreId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image: String,
    pub category: String,
    pub stock: i32,
    pub status: String,
    pub created_at: Timestamp,
}

impl ProductRow {
    pub fn into_product(self) -> Result<Product, CoreError> {
        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            stock: self.stock,
            status: parse_text("status", &self.status)?,
            created_at: self.created_at,
        })
    }
}
