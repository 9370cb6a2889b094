// src/handlers/cleanup.rs
//
// Rotas atrás do admin_guard (middleware): quem chega aqui já provou ser
// administrador.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::admin::AdminContext,
    models::admin::AdminAuth,
    services::cleanup_service::{TableCleanupResult, TableCount},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRecordsPayload {
    #[serde(alias = "tables")]
    pub tabelas: Option<Vec<String>>,
    /// Sem `confirm: true` nada é apagado.
    pub confirm: Option<bool>,
}

// GET /api/cleanup/list-records
#[utoipa::path(
    get,
    path = "/api/cleanup/list-records",
    tag = "Cleanup",
    responses(
        (status = 200, description = "Contagem de registros por tabela elegível", body = Vec<TableCount>),
        (status = 403, description = "Sem sessão de administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    _admin: AdminContext,
) -> Result<impl IntoResponse, AppError> {
    let contagens = app_state.cleanup_service.list_records().await?;
    Ok((StatusCode::OK, Json(contagens)))
}

// POST /api/cleanup/delete-records
#[utoipa::path(
    post,
    path = "/api/cleanup/delete-records",
    tag = "Cleanup",
    request_body = DeleteRecordsPayload,
    responses(
        (status = 200, description = "Tabelas expurgadas; cada uma com seu backup", body = Vec<TableCleanupResult>),
        (status = 400, description = "Sem confirm: true, ou tabela fora da lista permitida"),
        (status = 403, description = "Sem sessão de administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_records(
    State(app_state): State<AppState>,
    AdminContext(auth): AdminContext,
    Json(payload): Json<DeleteRecordsPayload>,
) -> Result<impl IntoResponse, AppError> {
    match &auth {
        AdminAuth::Sessao(sessao) => {
            tracing::info!("Limpeza autorizada pela sessão {}", sessao.token_id)
        }
        AdminAuth::SegredoCompartilhado => {
            tracing::info!("Limpeza autorizada pelo segredo compartilhado")
        }
    }

    let resultados = app_state
        .cleanup_service
        .delete_records(
            &payload.tabelas.unwrap_or_default(),
            payload.confirm.unwrap_or(false),
        )
        .await?;
    Ok((StatusCode::OK, Json(resultados)))
}
