//! API key endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::api_key::{key_prefix, validate_name, ApiKey, ApiKeyId, ApiKeyUpdate};

/// Request to create a new API key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Request to delete an API key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteKeyRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// POST /keys
pub async fn create_key(
    State(state): State<AppState>,
    Json(request): Json<CreateKeyRequest>,
) -> Result<(StatusCode, Json<ApiKey>), ApiError> {
    let name = request.name.unwrap_or_default();
    validate_name(&name).map_err(|e| ApiError::forbidden(e.to_string()))?;

    debug!(name = %name, supplied_key = request.key.is_some(), "Creating API key");

    let api_key = state
        .registry
        .issue_api_key(&name, request.key.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(api_key)))
}

/// GET /keys
pub async fn list_keys(
    State(state): State<AppState>,
    RequireApiKey(_): RequireApiKey,
) -> Result<Json<Vec<ApiKey>>, ApiError> {
    let keys = state.registry.find_all_api_keys().await?;
    Ok(Json(keys))
}

/// GET /keys/{id}
pub async fn get_key(
    State(state): State<AppState>,
    RequireApiKey(_): RequireApiKey,
    Path(id): Path<String>,
) -> Result<Json<ApiKey>, ApiError> {
    let id = ApiKeyId::from(id);

    state
        .registry
        .find_api_key(Some(&id), None)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// PATCH /keys/{id}
pub async fn update_key(
    State(state): State<AppState>,
    RequireApiKey(_): RequireApiKey,
    Path(id): Path<String>,
    Json(update): Json<ApiKeyUpdate>,
) -> Result<Json<ApiKey>, ApiError> {
    let id = ApiKeyId::from(id);

    state
        .registry
        .update_api_key(&id, &update)
        .await?
        .map(Json)
        .ok_or_else(ApiError::not_found)
}

/// DELETE /keys
pub async fn delete_key(
    State(state): State<AppState>,
    RequireApiKey(credential): RequireApiKey,
    Json(request): Json<DeleteKeyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = request
        .id
        .filter(|id| !id.is_empty())
        .map(ApiKeyId::from)
        .ok_or_else(|| ApiError::bad_request("Field 'id' is required"))?;

    debug!(id = %id, caller = %key_prefix(&credential), "Deleting API key");

    state
        .registry
        .delete_api_key(Some(&id), request.name.as_deref(), request.key.as_deref())
        .await?
        .ok_or_else(ApiError::not_found)?;

    Ok((StatusCode::OK, "OK"))
}
