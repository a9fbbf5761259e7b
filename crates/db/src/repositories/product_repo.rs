//! Repository for the `products` table.

use sqlx::PgPool;
use studio_core::product::Product;

use crate::models::product::ProductRow;

const COLUMNS: &str =
    "id, store_id, name, description, price, image, category, stock, status, created_at";

pub struct ProductRepo;

impl ProductRepo {
    /// Newest first.
    pub async fn list_by_store(
        pool: &PgPool,
        store_id: &str,
    ) -> Result<Vec<ProductRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products WHERE store_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        store_id: &str,
        product: &Product,
    ) -> Result<ProductRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO products \
                 (id, store_id, name, description, price, image, category, stock, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&query)
            .bind(&product.id)
            .bind(store_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.category)
            .bind(product.stock)
            .bind(product.status.as_str())
            .bind(product.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(
        pool: &PgPool,
        store_id: &str,
        product_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE store_id = $1 AND id = $2")
            .bind(store_id)
            .bind(product_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
