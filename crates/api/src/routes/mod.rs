pub mod assets;
pub mod campaigns;
pub mod config;
pub mod events;
pub mod health;
pub mod onboarding;
pub mod pages;
pub mod products;
pub mod studio;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Everything is scoped by store (tenant):
///
/// ```text
/// /stores/{store_id}/pages                          list, create
/// /stores/{store_id}/pages/{page_id}                replace, delete (?confirm=true)
///
/// /stores/{store_id}/config                         get, replace
///
/// /stores/{store_id}/products                       list, create
/// /stores/{store_id}/products/{product_id}          delete
///
/// /stores/{store_id}/onboarding                     get flags
/// /stores/{store_id}/onboarding/{flag}              dismiss (POST)
///
/// /stores/{store_id}/assets                         list, upload (multipart)
/// /stores/{store_id}/assets/{asset_id}              delete
/// /stores/{store_id}/assets/{asset_id}/content      raw bytes
///
/// /stores/{store_id}/campaigns/generate             draft an email (POST)
///
/// /stores/{store_id}/events                         SSE stream
///
/// /stores/{store_id}/studio/sessions                open (POST)
/// /stores/{store_id}/studio/sessions/{sid}          view, close
/// /stores/{store_id}/studio/sessions/{sid}/commands apply command (POST)
/// /stores/{store_id}/studio/sessions/{sid}/keys     keyboard chord (POST)
/// /stores/{store_id}/studio/sessions/{sid}/save     manual save (POST)
/// /stores/{store_id}/studio/sessions/{sid}/refresh  resync from store (POST)
/// /stores/{store_id}/studio/sessions/{sid}/logo     upload logo (multipart)
/// /stores/{store_id}/studio/sessions/{sid}/blocks/{bid}/generate-copy (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/stores/{store_id}/pages", pages::router())
        .nest("/stores/{store_id}/config", config::router())
        .nest("/stores/{store_id}/products", products::router())
        .nest("/stores/{store_id}/onboarding", onboarding::router())
        .nest("/stores/{store_id}/assets", assets::router())
        .nest("/stores/{store_id}/campaigns", campaigns::router())
        .nest("/stores/{store_id}/events", events::router())
        .nest("/stores/{store_id}/studio", studio::router())
}
