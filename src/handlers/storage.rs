// src/handlers/storage.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::storage::StorageEntry};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoragePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "financeiro-receber")]
    pub chave: String,
    pub valor: Option<String>,
}

// GET /api/storage
#[utoipa::path(
    get,
    path = "/api/storage",
    tag = "Storage",
    responses(
        (status = 200, description = "Todas as entradas chave/valor", body = Vec<StorageEntry>)
    )
)]
pub async fn list_entries(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let entradas = app_state.storage_repo.list().await?;
    Ok((StatusCode::OK, Json(entradas)))
}

// GET /api/storage/{chave}
#[utoipa::path(
    get,
    path = "/api/storage/{chave}",
    tag = "Storage",
    responses(
        (status = 200, description = "Entrada encontrada", body = StorageEntry),
        (status = 404, description = "Chave não encontrada")
    )
)]
pub async fn get_entry(
    State(app_state): State<AppState>,
    Path(chave): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entrada = app_state
        .storage_repo
        .get(&chave)
        .await?
        .ok_or(AppError::NotFound("Chave não encontrada"))?;
    Ok((StatusCode::OK, Json(entrada)))
}

// POST /api/storage (upsert)
#[utoipa::path(
    post,
    path = "/api/storage",
    tag = "Storage",
    request_body = StoragePayload,
    responses(
        (status = 200, description = "Entrada gravada", body = StorageEntry),
        (status = 400, description = "Chave ausente")
    )
)]
pub async fn upsert_entry(
    State(app_state): State<AppState>,
    Json(payload): Json<StoragePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let entrada = app_state
        .storage_repo
        .upsert(&payload.chave, payload.valor.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(entrada)))
}

// DELETE /api/storage/{chave}
#[utoipa::path(
    delete,
    path = "/api/storage/{chave}",
    tag = "Storage",
    responses(
        (status = 200, description = "Entrada removida"),
        (status = 404, description = "Chave não encontrada")
    )
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(chave): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.storage_repo.delete(&chave).await? {
        return Err(AppError::NotFound("Chave não encontrada"));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Chave removida com sucesso" })),
    ))
}

// DELETE /api/storage
#[utoipa::path(
    delete,
    path = "/api/storage",
    tag = "Storage",
    responses(
        (status = 200, description = "Todas as entradas removidas")
    )
)]
pub async fn clear_entries(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    app_state.storage_repo.delete_all().await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Todos os dados de storage foram removidos" })),
    ))
}
