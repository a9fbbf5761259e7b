//! Handlers for direct page management.
//!
//! These act on the committed state in the store. Open editor sessions for
//! the store are kept in step: created pages are adopted, deleted pages are
//! forgotten, and replaced pages are offered as a (guarded) resync.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use studio_core::error::CoreError;
use studio_core::page::{NewPage, PageUpdate};
use studio_events::{kinds, StudioEvent};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for page deletion.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePageParams {
    #[serde(default)]
    pub confirm: bool,
}

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/pages
// ---------------------------------------------------------------------------

pub async fn list_pages(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let pages = state.store.list_pages(&store_id).await?;
    Ok(Json(DataResponse { data: pages }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/pages
// ---------------------------------------------------------------------------

/// Create a page. Omitted fields get the "New Page" defaults and a single
/// intro text block.
pub async fn create_page(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(input): Json<NewPage>,
) -> AppResult<impl IntoResponse> {
    let page = input.into_page()?;
    let created = state.store.create_page(&store_id, &page).await?;

    for handle in state.sessions.for_store(&store_id).await {
        handle.session.lock().await.adopt_page(created.clone());
    }

    state.event_bus.publish(
        StudioEvent::new(kinds::PAGE_CREATED, &store_id).with_payload(json!({
            "page_id": created.id,
            "title": created.title,
            "slug": created.slug,
        })),
    );
    tracing::info!(store_id = %store_id, page_id = %created.id, slug = %created.slug, "Page created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PUT /stores/{store_id}/pages/{page_id}
// ---------------------------------------------------------------------------

pub async fn update_page(
    State(state): State<AppState>,
    Path((store_id, page_id)): Path<(String, String)>,
    Json(input): Json<PageUpdate>,
) -> AppResult<impl IntoResponse> {
    let page = state.store.update_page(&store_id, &page_id, &input).await?;
    state.resync_sessions(&store_id).await?;

    tracing::debug!(store_id = %store_id, page_id = %page_id, "Page replaced");
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// DELETE /stores/{store_id}/pages/{page_id}?confirm=true
// ---------------------------------------------------------------------------

/// Delete a page. Irreversible, so the caller must pass `confirm=true`.
pub async fn delete_page(
    State(state): State<AppState>,
    Path((store_id, page_id)): Path<(String, String)>,
    Query(params): Query<DeletePageParams>,
) -> AppResult<impl IntoResponse> {
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deleting a page cannot be undone; pass confirm=true".into(),
        ));
    }

    if !state.store.delete_page(&store_id, &page_id).await? {
        return Err(CoreError::not_found("Page", page_id).into());
    }

    for handle in state.sessions.for_store(&store_id).await {
        handle.session.lock().await.forget_page(&page_id);
    }

    state.event_bus.publish(
        StudioEvent::new(kinds::PAGE_DELETED, &store_id).with_payload(json!({ "page_id": page_id })),
    );
    tracing::info!(store_id = %store_id, page_id = %page_id, "Page deleted");

    Ok(StatusCode::NO_CONTENT)
}
