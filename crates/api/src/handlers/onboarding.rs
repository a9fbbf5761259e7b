//! Handlers for per-store onboarding flags.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use studio_core::onboarding::OnboardingFlag;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub async fn get_flags(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let flags = state.store.onboarding_flags(&store_id).await?;
    Ok(Json(DataResponse { data: flags }))
}

/// POST /stores/{store_id}/onboarding/{flag}. Accepts either the storage
/// key (`evolv_seen_welcome`) or the short name (`seen_welcome`).
pub async fn dismiss_flag(
    State(state): State<AppState>,
    Path((store_id, flag)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let flag = OnboardingFlag::parse(&flag)?;
    let flags = state.store.dismiss_flag(&store_id, flag).await?;

    tracing::debug!(store_id = %store_id, flag = flag.storage_key(), "Onboarding flag dismissed");
    Ok(Json(DataResponse { data: flags }))
}
