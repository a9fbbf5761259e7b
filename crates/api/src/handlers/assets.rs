//! Handlers for uploaded media assets.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use studio_core::asset::{Asset, NewAsset};
use studio_core::error::CoreError;
use studio_events::{kinds, StudioEvent};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Read the required `file` field of a multipart upload.
pub async fn read_upload(mut multipart: Multipart) -> AppResult<NewAsset> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some(NewAsset {
            file_name,
            content_type,
            data: data.to_vec(),
        });
    }

    upload.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))
}

/// Validate and store an upload, publishing `asset.uploaded`.
pub async fn store_upload(state: &AppState, store_id: &str, upload: NewAsset) -> AppResult<Asset> {
    let (asset, data) = upload.into_asset(store_id)?;
    let asset = state.assets.upload_asset(store_id, &asset, &data).await?;

    tracing::info!(
        store_id = %store_id,
        asset_id = %asset.id,
        size = asset.size,
        content_type = %asset.content_type,
        "Asset uploaded"
    );
    state.event_bus.publish(
        StudioEvent::new(kinds::ASSET_UPLOADED, store_id).with_payload(json!({
            "asset_id": asset.id,
            "url": asset.url,
        })),
    );
    Ok(asset)
}

pub async fn list_assets(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let assets = state.assets.list_assets(&store_id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST with a multipart form carrying a `file` field.
pub async fn upload_asset(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let upload = read_upload(multipart).await?;
    let asset = store_upload(&state, &store_id, upload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// Serve the stored bytes with their content type.
pub async fn asset_content(
    State(state): State<AppState>,
    Path((store_id, asset_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let (asset, data) = state
        .assets
        .asset_content(&store_id, &asset_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Asset", asset_id))?;

    Ok((
        [
            (header::CONTENT_TYPE, asset.content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        data,
    ))
}

pub async fn delete_asset(
    State(state): State<AppState>,
    Path((store_id, asset_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    if !state.assets.delete_asset(&store_id, &asset_id).await? {
        return Err(CoreError::not_found("Asset", asset_id).into());
    }
    tracing::info!(store_id = %store_id, asset_id = %asset_id, "Asset deleted");
    state.event_bus.publish(
        StudioEvent::new(kinds::ASSET_DELETED, &store_id)
            .with_payload(json!({ "asset_id": asset_id })),
    );
    Ok(StatusCode::NO_CONTENT)
}
