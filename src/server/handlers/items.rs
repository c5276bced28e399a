//! `/items`

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::TentError;
use crate::core::{JsonBody, OwnerSession};
use crate::entities::Item;
use crate::server::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please enter item name"))]
    pub name: String,
    #[serde(default)]
    pub rate: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRateRequest {
    #[serde(default)]
    pub rate: Value,
}

/// Public: the catalog customers pick from
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, TentError> {
    Ok(Json(state.billing.list_items().await?))
}

pub async fn create_item(
    _owner: OwnerSession,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), TentError> {
    request.validate()?;
    let item = state.billing.create_item(&request.name, &request.rate).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item_rate(
    _owner: OwnerSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateRateRequest>,
) -> Result<Json<Item>, TentError> {
    Ok(Json(state.billing.update_item_rate(id, &request.rate).await?))
}
