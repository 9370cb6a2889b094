// src/handlers/service_orders.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::{
    common::{error::AppError, normalize::IdFlex},
    config::AppState,
    models::workshop::{ServiceOrder, ServiceOrderInput},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderPayload {
    pub id: Option<i64>,
    pub numero: Option<i64>,
    #[serde(alias = "orcamento_id")]
    pub orcamento_id: Option<i64>,
    #[serde(alias = "cliente_id")]
    pub cliente_id: Option<i64>,
    #[serde(alias = "veiculo_id")]
    #[schema(value_type = Option<String>)]
    pub veiculo_id: Option<IdFlex>,
    #[serde(alias = "agendamento_id")]
    pub agendamento_id: Option<i64>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub servicos: Option<Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub pecas: Option<Value>,
    pub observacoes: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "data_abertura")]
    pub data_abertura: Option<String>,
    #[serde(alias = "data_finalizacao")]
    pub data_finalizacao: Option<String>,
    #[serde(alias = "whatsapp_enviado")]
    pub whatsapp_enviado: Option<bool>,
}

fn montar_input(payload: ServiceOrderPayload) -> Result<ServiceOrderInput, AppError> {
    let orcamento_id = payload
        .orcamento_id
        .ok_or(AppError::MissingField("orcamentoId"))?;

    Ok(ServiceOrderInput {
        numero: payload.numero,
        orcamento_id,
        cliente_id: payload.cliente_id,
        veiculo_id: payload.veiculo_id.as_ref().and_then(|v| v.em_texto()),
        agendamento_id: payload.agendamento_id,
        servicos: payload.servicos.unwrap_or_else(|| json!([])),
        pecas: payload.pecas.unwrap_or_else(|| json!([])),
        observacoes: payload.observacoes.unwrap_or_default(),
        status: payload.status.unwrap_or_else(|| "pendente".to_string()),
        data_abertura: payload
            .data_abertura
            .or_else(|| Some(Utc::now().to_rfc3339())),
        data_finalizacao: payload.data_finalizacao,
        whatsapp_enviado: payload.whatsapp_enviado.unwrap_or(false),
    })
}

// GET /api/ordens-servico
#[utoipa::path(
    get,
    path = "/api/ordens-servico",
    tag = "Ordens de Serviço",
    responses(
        (status = 200, description = "Lista de ordens de serviço", body = Vec<ServiceOrder>)
    )
)]
pub async fn list_orders(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let ordens = app_state.workshop_repo.list_orders().await?;
    Ok((StatusCode::OK, Json(ordens)))
}

// POST /api/ordens-servico
#[utoipa::path(
    post,
    path = "/api/ordens-servico",
    tag = "Ordens de Serviço",
    request_body = ServiceOrderPayload,
    responses(
        (status = 201, description = "Ordem de serviço criada", body = ServiceOrder),
        (status = 200, description = "Id customizado já existia; linha existente retornada", body = ServiceOrder),
        (status = 400, description = "orcamentoId ausente")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    Json(payload): Json<ServiceOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload.id;
    let input = montar_input(payload)?;

    if let Some(id) = id {
        if let Some(existente) = app_state.workshop_repo.find_order_by_id(id).await? {
            return Ok((StatusCode::OK, Json(existente)));
        }
    }

    let criada = app_state.workshop_repo.insert_order(id, input).await?;
    Ok((StatusCode::CREATED, Json(criada)))
}

// PUT /api/ordens-servico/{id}
#[utoipa::path(
    put,
    path = "/api/ordens-servico/{id}",
    tag = "Ordens de Serviço",
    request_body = ServiceOrderPayload,
    responses(
        (status = 200, description = "Ordem de serviço atualizada", body = ServiceOrder),
        (status = 404, description = "Ordem de serviço não encontrada")
    )
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let input = montar_input(payload)?;
    let ordem = app_state
        .workshop_repo
        .update_order(id, input)
        .await?
        .ok_or(AppError::NotFound("Ordem de serviço não encontrada"))?;
    Ok((StatusCode::OK, Json(ordem)))
}

// DELETE /api/ordens-servico/{id}
#[utoipa::path(
    delete,
    path = "/api/ordens-servico/{id}",
    tag = "Ordens de Serviço",
    responses(
        (status = 200, description = "Ordem de serviço removida"),
        (status = 404, description = "Ordem de serviço não encontrada")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.workshop_repo.delete_order(id).await? {
        return Err(AppError::NotFound("Ordem de serviço não encontrada"));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Ordem de serviço removida com sucesso" })),
    ))
}
