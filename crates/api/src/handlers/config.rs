//! Handlers for the store-wide config.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use studio_core::store_config::StoreConfig;
use studio_events::{kinds, StudioEvent};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /stores/{store_id}/config. A store without a saved config gets the
/// defaults.
pub async fn get_config(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let config = state.store.get_config(&store_id).await?.unwrap_or_default();
    Ok(Json(DataResponse { data: config }))
}

/// PUT /stores/{store_id}/config. Replaces the whole document.
pub async fn put_config(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(input): Json<StoreConfig>,
) -> AppResult<impl IntoResponse> {
    let saved = state.store.save_config(&store_id, &input).await?;
    state.resync_sessions(&store_id).await?;

    state.event_bus.publish(
        StudioEvent::new(kinds::CONFIG_SAVED, &store_id).with_payload(json!({ "name": saved.name })),
    );
    tracing::info!(store_id = %store_id, "Store config saved");

    Ok(Json(DataResponse { data: saved }))
}
