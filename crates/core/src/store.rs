//! The persistence collaborator the studio saves through.
//!
//! All operations are scoped by store (tenant) id and have replace
//! semantics: callers send the full field set they intend to persist.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::asset::{Asset, AssetStore};
use crate::error::CoreError;
use crate::onboarding::{OnboardingFlag, OnboardingFlags};
use crate::page::{Page, PageUpdate};
use crate::product::Product;
use crate::store_config::StoreConfig;
use crate::types::StoreId;

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Pages of a store ordered by `display_order`.
    async fn list_pages(&self, store_id: &str) -> Result<Vec<Page>, CoreError>;

    async fn create_page(&self, store_id: &str, page: &Page) -> Result<Page, CoreError>;

    async fn update_page(
        &self,
        store_id: &str,
        page_id: &str,
        update: &PageUpdate,
    ) -> Result<Page, CoreError>;

    /// Returns `true` if a page was removed.
    async fn delete_page(&self, store_id: &str, page_id: &str) -> Result<bool, CoreError>;

    async fn get_config(&self, store_id: &str) -> Result<Option<StoreConfig>, CoreError>;

    async fn save_config(
        &self,
        store_id: &str,
        config: &StoreConfig,
    ) -> Result<StoreConfig, CoreError>;

    async fn list_products(&self, store_id: &str) -> Result<Vec<Product>, CoreError>;

    async fn create_product(&self, store_id: &str, product: &Product)
        -> Result<Product, CoreError>;

    async fn delete_product(&self, store_id: &str, product_id: &str) -> Result<bool, CoreError>;

    async fn onboarding_flags(&self, store_id: &str) -> Result<OnboardingFlags, CoreError>;

    /// Mark a flag as dismissed. Idempotent.
    async fn dismiss_flag(
        &self,
        store_id: &str,
        flag: OnboardingFlag,
    ) -> Result<OnboardingFlags, CoreError>;
}

// ---------------------------------------------------------------------------
// MemoryPageStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Tenant {
    pages: Vec<Page>,
    config: Option<StoreConfig>,
    products: Vec<Product>,
    flags: OnboardingFlags,
    /// Newest last.
    assets: Vec<(Asset, Vec<u8>)>,
}

/// In-process [`PageStore`] and [`AssetStore`] used for local development
/// and tests.
///
/// Page updates can be made to fail on demand to exercise the save
/// failure path.
#[derive(Default)]
pub struct MemoryPageStore {
    tenants: RwLock<HashMap<StoreId, Tenant>>,
    fail_updates: AtomicBool,
    update_calls: AtomicUsize,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a store's pages and config wholesale.
    pub async fn seed(&self, store_id: &str, pages: Vec<Page>, config: Option<StoreConfig>) {
        let mut tenants = self.tenants.write().await;
        let tenant = tenants.entry(store_id.to_string()).or_default();
        tenant.pages = pages;
        tenant.config = config;
    }

    /// Make subsequent `update_page`, `save_config` and `upload_asset` calls fail.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Number of `update_page` calls made so far (including failed ones).
    pub fn update_count(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<(), CoreError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            Err(CoreError::Storage("backend unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn list_pages(&self, store_id: &str) -> Result<Vec<Page>, CoreError> {
        let tenants = self.tenants.read().await;
        let mut pages = tenants
            .get(store_id)
            .map(|t| t.pages.clone())
            .unwrap_or_default();
        pages.sort_by_key(|p| p.display_order);
        Ok(pages)
    }

    async fn create_page(&self, store_id: &str, page: &Page) -> Result<Page, CoreError> {
        page.check()?;
        let mut tenants = self.tenants.write().await;
        let tenant = tenants.entry(store_id.to_string()).or_default();
        if tenant.pages.iter().any(|p| p.slug == page.slug) {
            return Err(CoreError::Conflict(format!(
                "A page with slug '{}' already exists",
                page.slug
            )));
        }
        tenant.pages.push(page.clone());
        Ok(page.clone())
    }

    async fn update_page(
        &self,
        store_id: &str,
        page_id: &str,
        update: &PageUpdate,
    ) -> Result<Page, CoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;

        let mut tenants = self.tenants.write().await;
        let page = tenants
            .get_mut(store_id)
            .and_then(|t| t.pages.iter_mut().find(|p| p.id == page_id))
            .ok_or_else(|| CoreError::not_found("Page", page_id))?;

        let mut updated = page.clone();
        updated.apply_update(update);
        updated.check()?;
        *page = updated.clone();
        Ok(updated)
    }

    async fn delete_page(&self, store_id: &str, page_id: &str) -> Result<bool, CoreError> {
        let mut tenants = self.tenants.write().await;
        let Some(tenant) = tenants.get_mut(store_id) else {
            return Ok(false);
        };
        let before = tenant.pages.len();
        tenant.pages.retain(|p| p.id != page_id);
        Ok(tenant.pages.len() != before)
    }

    async fn get_config(&self, store_id: &str) -> Result<Option<StoreConfig>, CoreError> {
        let tenants = self.tenants.read().await;
        Ok(tenants.get(store_id).and_then(|t| t.config.clone()))
    }

    async fn save_config(
        &self,
        store_id: &str,
        config: &StoreConfig,
    ) -> Result<StoreConfig, CoreError> {
        self.check_writable()?;
        config.validate()?;
        let mut tenants = self.tenants.write().await;
        tenants.entry(store_id.to_string()).or_default().config = Some(config.clone());
        Ok(config.clone())
    }

    async fn list_products(&self, store_id: &str) -> Result<Vec<Product>, CoreError> {
        let tenants = self.tenants.read().await;
        Ok(tenants
            .get(store_id)
            .map(|t| t.products.clone())
            .unwrap_or_default())
    }

    async fn create_product(
        &self,
        store_id: &str,
        product: &Product,
    ) -> Result<Product, CoreError> {
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(store_id.to_string())
            .or_default()
            .products
            .push(product.clone());
        Ok(product.clone())
    }

    async fn delete_product(&self, store_id: &str, product_id: &str) -> Result<bool, CoreError> {
        let mut tenants = self.tenants.write().await;
        let Some(tenant) = tenants.get_mut(store_id) else {
            return Ok(false);
        };
        let before = tenant.products.len();
        tenant.products.retain(|p| p.id != product_id);
        Ok(tenant.products.len() != before)
    }

    async fn onboarding_flags(&self, store_id: &str) -> Result<OnboardingFlags, CoreError> {
        let tenants = self.tenants.read().await;
        Ok(tenants.get(store_id).map(|t| t.flags).unwrap_or_default())
    }

    async fn dismiss_flag(
        &self,
        store_id: &str,
        flag: OnboardingFlag,
    ) -> Result<OnboardingFlags, CoreError> {
        let mut tenants = self.tenants.write().await;
        let tenant = tenants.entry(store_id.to_string()).or_default();
        tenant.flags.set(flag);
        Ok(tenant.flags)
    }
}

#[async_trait]
impl AssetStore for MemoryPageStore {
    async fn upload_asset(
        &self,
        store_id: &str,
        asset: &Asset,
        data: &[u8],
    ) -> Result<Asset, CoreError> {
        self.check_writable()?;
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(store_id.to_string())
            .or_default()
            .assets
            .push((asset.clone(), data.to_vec()));
        Ok(asset.clone())
    }

    async fn list_assets(&self, store_id: &str) -> Result<Vec<Asset>, CoreError> {
        let tenants = self.tenants.read().await;
        Ok(tenants
            .get(store_id)
            .map(|t| t.assets.iter().rev().map(|(a, _)| a.clone()).collect())
            .unwrap_or_default())
    }

    async fn asset_content(
        &self,
        store_id: &str,
        asset_id: &str,
    ) -> Result<Option<(Asset, Vec<u8>)>, CoreError> {
        let tenants = self.tenants.read().await;
        Ok(tenants
            .get(store_id)
            .and_then(|t| t.assets.iter().find(|(a, _)| a.id == asset_id).cloned()))
    }

    async fn delete_asset(&self, store_id: &str, asset_id: &str) -> Result<bool, CoreError> {
        let mut tenants = self.tenants.write().await;
        let Some(tenant) = tenants.get_mut(store_id) else {
            return Ok(false);
        };
        let before = tenant.assets.len();
        tenant.assets.retain(|(a, _)| a.id != asset_id);
        Ok(tenant.assets.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::NewAsset;
    use crate::page::NewPage;
    use assert_matches::assert_matches;

    fn page(title: &str, slug: &str, order: i32) -> Page {
        NewPage {
            title: Some(title.into()),
            slug: Some(slug.into()),
            display_order: Some(order),
            ..Default::default()
        }
        .into_page()
        .unwrap()
    }

    #[tokio::test]
    async fn pages_are_scoped_and_ordered() {
        let store = MemoryPageStore::new();
        store.create_page("s1", &page("B", "/b", 2)).await.unwrap();
        store.create_page("s1", &page("A", "/a", 1)).await.unwrap();
        store.create_page("s2", &page("C", "/c", 0)).await.unwrap();

        let titles: Vec<_> = store
            .list_pages("s1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(store.list_pages("s2").await.unwrap().len(), 1);
        assert!(store.list_pages("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let store = MemoryPageStore::new();
        store.create_page("s1", &page("A", "/a", 0)).await.unwrap();
        let result = store.create_page("s1", &page("A2", "/a", 1)).await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_can_fail() {
        let store = MemoryPageStore::new();
        let p = store.create_page("s1", &page("A", "/a", 0)).await.unwrap();

        let updated = store
            .update_page(
                "s1",
                &p.id,
                &PageUpdate {
                    title: Some("About".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "About");

        store.set_fail_updates(true);
        let result = store.update_page("s1", &p.id, &PageUpdate::default()).await;
        assert_matches!(result, Err(CoreError::Storage(_)));
        assert_eq!(store.update_count(), 2);
    }

    #[tokio::test]
    async fn update_missing_page_is_not_found() {
        let store = MemoryPageStore::new();
        let result = store.update_page("s1", "nope", &PageUpdate::default()).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn assets_are_scoped_and_deletable() {
        let store = MemoryPageStore::new();
        let (asset, data) = NewAsset {
            file_name: "logo.png".into(),
            content_type: Some("image/png".into()),
            data: vec![1, 2, 3],
        }
        .into_asset("s1")
        .unwrap();
        store.upload_asset("s1", &asset, &data).await.unwrap();

        assert_eq!(store.list_assets("s1").await.unwrap().len(), 1);
        assert!(store.asset_content("s2", &asset.id).await.unwrap().is_none());
        let (found, bytes) = store.asset_content("s1", &asset.id).await.unwrap().unwrap();
        assert_eq!(found.name, "logo.png");
        assert_eq!(bytes, [1, 2, 3]);

        assert!(!store.delete_asset("s2", &asset.id).await.unwrap());
        assert!(store.delete_asset("s1", &asset.id).await.unwrap());
        assert!(store.list_assets("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dismissing_flags_is_idempotent() {
        let store = MemoryPageStore::new();
        store.dismiss_flag("s1", OnboardingFlag::SeenWelcome).await.unwrap();
        let flags = store.dismiss_flag("s1", OnboardingFlag::SeenWelcome).await.unwrap();
        assert!(flags.seen_welcome);
        assert!(!store.onboarding_flags("s2").await.unwrap().seen_welcome);
    }
}
