//! Mounted at `/stores/{store_id}/onboarding` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::onboarding;
use crate::state::AppState;

/// ```text
/// GET    /          -> get_flags
/// POST   /{flag}    -> dismiss_flag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(onboarding::get_flags))
        .route("/{flag}", post(onboarding::dismiss_flag))
}
