//! Repository for the `assets` table.

use sqlx::PgPool;
use studio_core::asset::Asset;

use crate::models::asset::{AssetContentRow, AssetRow};

const COLUMNS: &str = "id, store_id, name, kind, content_type, size, url, created_at";

pub struct AssetRepo;

impl AssetRepo {
    pub async fn create(
        pool: &PgPool,
        store_id: &str,
        asset: &Asset,
        data: &[u8],
    ) -> Result<AssetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets \
                 (id, store_id, name, kind, content_type, size, url, data, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(&asset.id)
            .bind(store_id)
            .bind(&asset.name)
            .bind(asset.kind.as_str())
            .bind(&asset.content_type)
            .bind(asset.size)
            .bind(&asset.url)
            .bind(data)
            .bind(asset.created_at)
            .fetch_one(pool)
            .await
    }

    /// Newest first; bytes are not loaded.
    pub async fn list_by_store(pool: &PgPool, store_id: &str) -> Result<Vec<AssetRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets WHERE store_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, AssetRow>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_content(
        pool: &PgPool,
        store_id: &str,
        asset_id: &str,
    ) -> Result<Option<AssetContentRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS}, data FROM assets WHERE store_id = $1 AND id = $2");
        sqlx::query_as::<_, AssetContentRow>(&query)
            .bind(store_id)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, store_id: &str, asset_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE store_id = $1 AND id = $2")
            .bind(store_id)
            .bind(asset_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
