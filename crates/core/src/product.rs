//! Catalog products, as far as the admin panel manages them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{new_token, Timestamp};

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    #[default]
    Draft,
    Archived,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in minor currency units.
    pub price: i64,
    pub image: String,
    pub category: String,
    pub stock: i32,
    pub status: ProductStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a product. Name and a positive price are required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1))]
    pub price: i64,
    #[serde(default)]
    pub image: String,
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    pub status: Option<ProductStatus>,
}

impl NewProduct {
    pub fn into_product(self) -> Result<Product, CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        Ok(Product {
            id: new_token(),
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            image: self.image,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.into()),
            stock: self.stock.unwrap_or(0),
            status: self.status.unwrap_or_default(),
            created_at: chrono::Utc::now(),
        })
    }
}
