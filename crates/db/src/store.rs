//! [`PageStore`] and [`AssetStore`] backed by Postgres.

use async_trait::async_trait;
use sqlx::PgPool;
use studio_core::asset::{Asset, AssetStore};
use studio_core::error::CoreError;
use studio_core::onboarding::{OnboardingFlag, OnboardingFlags};
use studio_core::page::{Page, PageUpdate};
use studio_core::product::Product;
use studio_core::store::PageStore;
use studio_core::store_config::StoreConfig;

use crate::repositories::{AssetRepo, OnboardingRepo, PageRepo, ProductRepo, StoreConfigRepo};

/// Map a sqlx error onto the domain error space.
///
/// Unique constraint violations (constraint names starting with `uq_`)
/// become conflicts; everything else is a storage failure.
fn map_db_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
            tracing::error!(error = %db_err, "Database error");
            CoreError::Storage(err.to_string())
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            CoreError::Storage(err.to_string())
        }
    }
}

#[derive(Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn list_pages(&self, store_id: &str) -> Result<Vec<Page>, CoreError> {
        PageRepo::list_by_store(&self.pool, store_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|row| row.into_page())
            .collect()
    }

    async fn create_page(&self, store_id: &str, page: &Page) -> Result<Page, CoreError> {
        page.check()?;
        PageRepo::create(&self.pool, store_id, page)
            .await
            .map_err(map_db_error)?
            .into_page()
    }

    async fn update_page(
        &self,
        store_id: &str,
        page_id: &str,
        update: &PageUpdate,
    ) -> Result<Page, CoreError> {
        let mut page = PageRepo::find_by_id(&self.pool, store_id, page_id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("Page", page_id))?
            .into_page()?;

        page.apply_update(update);
        page.check()?;

        PageRepo::replace(&self.pool, store_id, &page)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("Page", page_id))?
            .into_page()
    }

    async fn delete_page(&self, store_id: &str, page_id: &str) -> Result<bool, CoreError> {
        PageRepo::delete(&self.pool, store_id, page_id)
            .await
            .map_err(map_db_error)
    }

    async fn get_config(&self, store_id: &str) -> Result<Option<StoreConfig>, CoreError> {
        Ok(StoreConfigRepo::get(&self.pool, store_id)
            .await
            .map_err(map_db_error)?
            .map(|row| row.config.0))
    }

    async fn save_config(
        &self,
        store_id: &str,
        config: &StoreConfig,
    ) -> Result<StoreConfig, CoreError> {
        config.validate()?;
        let row = StoreConfigRepo::upsert(&self.pool, store_id, config)
            .await
            .map_err(map_db_error)?;
        Ok(row.config.0)
    }

    async fn list_products(&self, store_id: &str) -> Result<Vec<Product>, CoreError> {
        ProductRepo::list_by_store(&self.pool, store_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|row| row.into_product())
            .collect()
    }

    async fn create_product(
        &self,
        store_id: &str,
        product: &Product,
    ) -> Result<Product, CoreError> {
        ProductRepo::create(&self.pool, store_id, product)
            .await
            .map_err(map_db_error)?
            .into_product()
    }

    async fn delete_product(&self, store_id: &str, product_id: &str) -> Result<bool, CoreError> {
        ProductRepo::delete(&self.pool, store_id, product_id)
            .await
            .map_err(map_db_error)
    }

    async fn onboarding_flags(&self, store_id: &str) -> Result<OnboardingFlags, CoreError> {
        let rows = OnboardingRepo::list(&self.pool, store_id)
            .await
            .map_err(map_db_error)?;
        Ok(OnboardingFlags::from_keys(rows.iter().map(|r| r.flag.as_str())))
    }

    async fn dismiss_flag(
        &self,
        store_id: &str,
        flag: OnboardingFlag,
    ) -> Result<OnboardingFlags, CoreError> {
        OnboardingRepo::dismiss(&self.pool, store_id, flag.storage_key())
            .await
            .map_err(map_db_error)?;
        self.onboarding_flags(store_id).await
    }
}

#[async_trait]
impl AssetStore for PgPageStore {
    async fn upload_asset(
        &self,
        store_id: &str,
        asset: &Asset,
        data: &[u8],
    ) -> Result<Asset, CoreError> {
        AssetRepo::create(&self.pool, store_id, asset, data)
            .await
            .map_err(map_db_error)?
            .into_asset()
    }

    async fn list_assets(&self, store_id: &str) -> Result<Vec<Asset>, CoreError> {
        AssetRepo::list_by_store(&self.pool, store_id)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|row| row.into_asset())
            .collect()
    }

    async fn asset_content(
        &self,
        store_id: &str,
        asset_id: &str,
    ) -> Result<Option<(Asset, Vec<u8>)>, CoreError> {
        let Some(row) = AssetRepo::find_content(&self.pool, store_id, asset_id)
            .await
            .map_err(map_db_error)?
        else {
            return Ok(None);
        };
        Ok(Some((row.asset.into_asset()?, row.data)))
    }

    async fn delete_asset(&self, store_id: &str, asset_id: &str) -> Result<bool, CoreError> {
        AssetRepo::delete(&self.pool, store_id, asset_id)
            .await
            .map_err(map_db_error)
    }
}
