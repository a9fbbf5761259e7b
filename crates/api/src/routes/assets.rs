//! Mounted at `/stores/{store_id}/assets` by `api_routes()`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use axum::Router;
use studio_core::asset::MAX_ASSET_BYTES;

use crate::handlers::assets;
use crate::state::AppState;

/// Room for the multipart framing around a maximum-size file.
pub const UPLOAD_BODY_LIMIT: usize = MAX_ASSET_BYTES + 64 * 1024;

/// ```text
/// GET    /                      -> list_assets
/// POST   /                      -> upload_asset (multipart, field "file")
/// DELETE /{asset_id}            -> delete_asset
/// GET    /{asset_id}/content    -> asset_content
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assets::list_assets)
                .post(assets::upload_asset)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/{asset_id}", delete(assets::delete_asset))
        .route("/{asset_id}/content", get(assets::asset_content))
}
