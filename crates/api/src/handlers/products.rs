//! Handlers for the product catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use studio_core::error::CoreError;
use studio_core::product::NewProduct;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let products = state.store.list_products(&store_id).await?;
    Ok(Json(DataResponse { data: products }))
}

pub async fn create_product(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    Json(input): Json<NewProduct>,
) -> AppResult<impl IntoResponse> {
    let product = input.into_product()?;
    let created = state.store.create_product(&store_id, &product).await?;

    tracing::info!(store_id = %store_id, product_id = %created.id, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    if !state.store.delete_product(&store_id, &product_id).await? {
        return Err(CoreError::not_found("Product", product_id).into());
    }
    tracing::info!(store_id = %store_id, product_id = %product_id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
