//! Mounted at `/stores/{store_id}/products` by `api_routes()`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// ```text
/// GET    /               -> list_products
/// POST   /               -> create_product
/// DELETE /{product_id}   -> delete_product
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route("/{product_id}", delete(products::delete_product))
}
