//! Handlers for marketing campaign drafts.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use studio_core::campaign::{CampaignEmail, CampaignRequest};
use studio_core::error::CoreError;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub generated: bool,
    pub email: Option<CampaignEmail>,
}

/// Draft a campaign email with the copy generator.
///
/// Nothing is persisted. Generation failures are logged and reported as
/// `generated: false`.
pub async fn generate_campaign(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(request): Json<CampaignRequest>,
) -> AppResult<impl IntoResponse> {
    request.validate()?;

    let config = state.store.get_config(&store_id).await?.unwrap_or_default();
    let product = match &request.product_id {
        Some(product_id) => Some(
            state
                .store
                .list_products(&store_id)
                .await?
                .into_iter()
                .find(|p| &p.id == product_id)
                .ok_or_else(|| CoreError::not_found("Product", product_id.clone()))?,
        ),
        None => None,
    };

    let prompt = request.prompt(&config, product.as_ref());
    let email = match state.copy_generator.generate(&prompt).await {
        Ok(text) => {
            let email = CampaignEmail::parse(&text, &format!("News from {}", config.name));
            tracing::info!(store_id = %store_id, subject = %email.subject, "Campaign email generated");
            Some(email)
        }
        Err(err) => {
            tracing::warn!(store_id = %store_id, error = %err, "Campaign generation failed");
            None
        }
    };

    Ok(Json(DataResponse {
        data: CampaignResponse {
            generated: email.is_some(),
            email,
        },
    }))
}
