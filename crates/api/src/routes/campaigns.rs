//! Mounted at `/stores/{store_id}/campaigns` by `api_routes()`.

use axum::routing::post;
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// ```text
/// POST   /generate   -> generate_campaign
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(campaigns::generate_campaign))
}
