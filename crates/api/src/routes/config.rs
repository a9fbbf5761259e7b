//! Mounted at `/stores/{store_id}/config` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::config;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(config::get_config).put(config::put_config))
}
