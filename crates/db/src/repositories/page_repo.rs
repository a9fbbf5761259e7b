//! Repository for the `pages` table.

use sqlx::types::Json;
use sqlx::PgPool;
use studio_core::page::Page;

use crate::models::page::PageRow;

/// Column list for `pages` queries.
const COLUMNS: &str = "id, store_id, title, slug, page_type, blocks, metadata, \
                       display_order, link_type, external_url, created_at, updated_at";

pub struct PageRepo;

impl PageRepo {
    /// All pages of a store in navigation order.
    pub async fn list_by_store(pool: &PgPool, store_id: &str) -> Result<Vec<PageRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages WHERE store_id = $1 ORDER BY display_order, created_at"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(store_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        store_id: &str,
        page_id: &str,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE store_id = $1 AND id = $2");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(store_id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, store_id: &str, page: &Page) -> Result<PageRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages \
                 (id, store_id, title, slug, page_type, blocks, metadata, display_order, link_type, external_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(&page.id)
            .bind(store_id)
            .bind(&page.title)
            .bind(&page.slug)
            .bind(page.page_type.as_str())
            .bind(Json(&page.blocks))
            .bind(Json(&page.metadata))
            .bind(page.display_order)
            .bind(page.link_type.as_str())
            .bind(&page.external_url)
            .fetch_one(pool)
            .await
    }

    /// Overwrite every mutable column of an existing page.
    ///
    /// Returns `None` if the page does not exist in this store.
    pub async fn replace(
        pool: &PgPool,
        store_id: &str,
        page: &Page,
    ) -> Result<Option<PageRow>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET \
                 title = $3, slug = $4, page_type = $5, blocks = $6, metadata = $7, \
                 display_order = $8, link_type = $9, external_url = $10, updated_at = NOW() \
             WHERE store_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageRow>(&query)
            .bind(store_id)
            .bind(&page.id)
            .bind(&page.title)
            .bind(&page.slug)
            .bind(page.page_type.as_str())
            .bind(Json(&page.blocks))
            .bind(Json(&page.metadata))
            .bind(page.display_order)
            .bind(page.link_type.as_str())
            .bind(&page.external_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, store_id: &str, page_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE store_id = $1 AND id = $2")
            .bind(store_id)
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
