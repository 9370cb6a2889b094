// src/handlers/clients.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::crm::Client};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    /// Id customizado gerado pelo front. Reenvio atualiza em vez de duplicar.
    pub id: Option<i64>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[schema(example = "11987654321")]
    pub telefone: Option<String>,

    #[schema(value_type = Option<Object>)]
    pub endereco: Option<Value>,

    #[schema(value_type = Option<Vec<Object>>)]
    pub veiculos: Option<Value>,

    pub ativo: Option<bool>,
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Lista de clientes ativos", body = Vec<Client>)
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let clientes = app_state.client_repo.list_active().await?;
    Ok((StatusCode::OK, Json(clientes)))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado (ou atualizado via id customizado)", body = Client),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state
        .client_repo
        .upsert(
            payload.id,
            &payload.nome,
            payload.telefone.as_deref(),
            payload.endereco.unwrap_or_else(|| json!({})),
            payload.veiculos.unwrap_or_else(|| json!([])),
            payload.ativo.unwrap_or(true),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let cliente = app_state
        .client_repo
        .update(
            id,
            &payload.nome,
            payload.telefone.as_deref(),
            payload.endereco.unwrap_or_else(|| json!({})),
            payload.veiculos.unwrap_or_else(|| json!([])),
            payload.ativo.unwrap_or(true),
        )
        .await?
        .ok_or(AppError::NotFound("Cliente não encontrado"))?;

    Ok((StatusCode::OK, Json(cliente)))
}

// DELETE /api/clientes/{id} (soft delete)
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    responses(
        (status = 200, description = "Cliente marcado como inativo"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.client_repo.soft_delete(id).await? {
        return Err(AppError::NotFound("Cliente não encontrado"));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Cliente removido com sucesso" })),
    ))
}
