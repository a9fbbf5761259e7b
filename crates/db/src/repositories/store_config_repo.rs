//! Repository for the `store_configs` table.

use sqlx::types::Json;
use sqlx::PgPool;
use studio_core::store_config::StoreConfig;

use crate::models::store_config::StoreConfigRow;

const COLUMNS: &str = "store_id, config, updated_at";

pub struct StoreConfigRepo;

impl StoreConfigRepo {
    pub async fn get(pool: &PgPool, store_id: &str) -> Result<Option<StoreConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM store_configs WHERE store_id = $1");
        sqlx::query_as::<_, StoreConfigRow>(&query)
            .bind(store_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the store's config document.
    pub async fn upsert(
        pool: &PgPool,
        store_id: &str,
        config: &StoreConfig,
    ) -> Result<StoreConfigRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO store_configs (store_id, config) VALUES ($1, $2) \
             ON CONFLICT (store_id) DO UPDATE \
             SET config = EXCLUDED.config, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoreConfigRow>(&query)
            .bind(store_id)
            .bind(Json(config))
            .fetch_one(pool)
            .await
    }
}
