//! Mounted at `/stores/{store_id}/pages` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// ```text
/// GET    /            -> list_pages
/// POST   /            -> create_page
/// PUT    /{page_id}   -> update_page
/// DELETE /{page_id}   -> delete_page (requires ?confirm=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route(
            "/{page_id}",
            put(pages::update_page).delete(pages::delete_page),
        )
}
