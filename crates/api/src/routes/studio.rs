//! Mounted at `/stores/{store_id}/studio` by `api_routes()`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::studio;
use crate::routes::assets::UPLOAD_BODY_LIMIT;
use crate::state::AppState;

/// ```text
/// POST   /sessions                                   -> open_session
/// GET    /sessions/{session_id}                      -> get_session
/// DELETE /sessions/{session_id}                      -> close_session
/// POST   /sessions/{session_id}/commands             -> apply_command
/// POST   /sessions/{session_id}/keys                 -> handle_key
/// POST   /sessions/{session_id}/save                 -> save
/// POST   /sessions/{session_id}/refresh              -> refresh
/// POST   /sessions/{session_id}/logo                 -> upload_logo (multipart)
/// POST   /sessions/{session_id}/blocks/{block_id}/generate-copy -> generate_copy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(studio::open_session))
        .route(
            "/sessions/{session_id}",
            get(studio::get_session).delete(studio::close_session),
        )
        .route("/sessions/{session_id}/commands", post(studio::apply_command))
        .route("/sessions/{session_id}/keys", post(studio::handle_key))
        .route("/sessions/{session_id}/save", post(studio::save))
        .route("/sessions/{session_id}/refresh", post(studio::refresh))
        .route(
            "/sessions/{session_id}/logo",
            post(studio::upload_logo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/sessions/{session_id}/blocks/{block_id}/generate-copy",
            post(studio::generate_copy),
        )
}
