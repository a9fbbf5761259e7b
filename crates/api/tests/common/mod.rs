#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::sessions::SessionRegistry;
use studio_api::state::AppState;
use studio_core::asset::AssetStore;
use studio_core::block::{Block, BlockKind};
use studio_core::copy::{CopyGenerator, DisabledCopyGenerator};
use studio_core::error::CoreError;
use studio_core::onboarding::{OnboardingFlag, OnboardingFlags};
use studio_core::page::{Page, PageType, PageUpdate};
use studio_core::product::Product;
use studio_core::store::{MemoryPageStore, PageStore};
use studio_core::store_config::StoreConfig;
use studio_events::EventBus;
use tokio::sync::Semaphore;

pub const STORE: &str = "store-1";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and the production autosave debounce of 1.5 s.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        autosave_debounce_ms: 1500,
        session_idle_timeout_secs: 1800,
        session_sweep_interval_secs: 60,
        copy_endpoint: None,
        copy_api_key: None,
        database_url: None,
    }
}

/// Router plus handles on the pieces tests inspect directly.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryPageStore>,
}

/// Build the full application router over an in-memory store.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(DisabledCopyGenerator))
}

pub fn build_test_app_with(copy_generator: Arc<dyn CopyGenerator>) -> TestApp {
    let store = Arc::new(MemoryPageStore::new());
    assemble(Arc::clone(&store) as Arc<dyn PageStore>, store, copy_generator)
}

/// Like [`build_test_app`], but every `update_page` waits for a permit on
/// the returned semaphore first, so a test can hold a save in flight.
pub fn build_gated_test_app() -> (TestApp, Arc<Semaphore>) {
    let store = Arc::new(MemoryPageStore::new());
    let gate = Arc::new(Semaphore::new(0));
    let gated = GatedStore {
        inner: Arc::clone(&store),
        gate: Arc::clone(&gate),
    };
    let app = assemble(Arc::new(gated), store, Arc::new(DisabledCopyGenerator));
    (app, gate)
}

fn assemble(
    pages: Arc<dyn PageStore>,
    store: Arc<MemoryPageStore>,
    copy_generator: Arc<dyn CopyGenerator>,
) -> TestApp {
    let config = test_config();
    let state = AppState {
        store: pages,
        assets: Arc::clone(&store) as Arc<dyn AssetStore>,
        pool: None,
        config: Arc::new(config.clone()),
        sessions: Arc::new(SessionRegistry::new()),
        event_bus: Arc::new(EventBus::default()),
        copy_generator,
        shutdown: CancellationToken::new(),
    };

    TestApp {
        app: build_app_router(state.clone(), &config),
        state,
        store,
    }
}

/// Page store whose page updates block until the gate hands out a permit.
struct GatedStore {
    inner: Arc<MemoryPageStore>,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl PageStore for GatedStore {
    async fn list_pages(&self, store_id: &str) -> Result<Vec<Page>, CoreError> {
        self.inner.list_pages(store_id).await
    }

    async fn create_page(&self, store_id: &str, page: &Page) -> Result<Page, CoreError> {
        self.inner.create_page(store_id, page).await
    }

    async fn update_page(
        &self,
        store_id: &str,
        page_id: &str,
        update: &PageUpdate,
    ) -> Result<Page, CoreError> {
        self.gate.acquire().await.unwrap().forget();
        self.inner.update_page(store_id, page_id, update).await
    }

    async fn delete_page(&self, store_id: &str, page_id: &str) -> Result<bool, CoreError> {
        self.inner.delete_page(store_id, page_id).await
    }

    async fn get_config(&self, store_id: &str) -> Result<Option<StoreConfig>, CoreError> {
        self.inner.get_config(store_id).await
    }

    async fn save_config(
        &self,
        store_id: &str,
        config: &StoreConfig,
    ) -> Result<StoreConfig, CoreError> {
        self.inner.save_config(store_id, config).await
    }

    async fn list_products(&self, store_id: &str) -> Result<Vec<Product>, CoreError> {
        self.inner.list_products(store_id).await
    }

    async fn create_product(&self, store_id: &str, product: &Product) -> Result<Product, CoreError> {
        self.inner.create_product(store_id, product).await
    }

    async fn delete_product(&self, store_id: &str, product_id: &str) -> Result<bool, CoreError> {
        self.inner.delete_product(store_id, product_id).await
    }

    async fn onboarding_flags(&self, store_id: &str) -> Result<OnboardingFlags, CoreError> {
        self.inner.onboarding_flags(store_id).await
    }

    async fn dismiss_flag(
        &self,
        store_id: &str,
        flag: OnboardingFlag,
    ) -> Result<OnboardingFlags, CoreError> {
        self.inner.dismiss_flag(store_id, flag).await
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn block(id: &str, kind: BlockKind, name: &str) -> Block {
    let mut block = Block::new(kind, name);
    block.id = id.to_string();
    block
}

fn page(id: &str, title: &str, slug: &str, page_type: PageType, order: i32, blocks: Vec<Block>) -> Page {
    Page {
        id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        page_type,
        blocks,
        metadata: Default::default(),
        display_order: order,
        link_type: Default::default(),
        external_url: None,
    }
}

/// Seed [`STORE`] with a home page (hero, grid) and an about page (one
/// text section).
pub async fn seed_store(store: &MemoryPageStore) {
    let home = page(
        "home",
        "Home",
        "/",
        PageType::Home,
        0,
        vec![
            block("hero", BlockKind::SystemHero, "Hero"),
            block("grid", BlockKind::SystemGrid, "Product Grid"),
        ],
    );
    let about = page(
        "about",
        "About",
        "/about",
        PageType::Custom,
        1,
        vec![block("intro", BlockKind::Section, "Intro Text").with_content("<p>Hello</p>")],
    );
    store.seed(STORE, vec![home, about], None).await;
}

/// Open an editor session on [`STORE`] and return its id.
pub async fn open_session(app: &Router) -> String {
    let response = post_json(
        app.clone(),
        &format!("/api/v1/stores/{STORE}/studio/sessions"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["session_id"].as_str().unwrap().to_string()
}

pub fn session_uri(session_id: &str, suffix: &str) -> String {
    format!("/api/v1/stores/{STORE}/studio/sessions/{session_id}{suffix}")
}

/// Copy generator that always returns the same text.
pub struct FixedCopy(pub &'static str);

#[async_trait]
impl CopyGenerator for FixedCopy {
    async fn generate(&self, _prompt: &str) -> Result<String, CoreError> {
        Ok(self.0.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, json: Value) -> Response {
    send(app, Method::POST, uri, Some(json)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, json: Value) -> Response {
    send(app, Method::PUT, uri, Some(json)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// POST a multipart form with one `file` field.
pub async fn post_file(
    app: Router,
    uri: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Response {
    const BOUNDARY: &str = "studio-test-boundary";
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
