//! Mounted at `/stores/{store_id}/events` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(events::stream_events))
}
