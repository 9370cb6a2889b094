// src/handlers/schedule.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        normalize::{self, IdFlex},
    },
    config::AppState,
    models::schedule::{Appointment, AppointmentInput},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub id: Option<i64>,
    #[serde(alias = "cliente_id")]
    pub cliente_id: Option<i64>,
    /// Número ou id customizado em texto; "" e "0" contam como ausente.
    #[serde(alias = "veiculo_id")]
    #[schema(value_type = Option<String>)]
    pub veiculo_id: Option<IdFlex>,
    pub numero: Option<i64>,
    #[schema(example = "31/12/2025")]
    pub data: Option<String>,
    pub hora: Option<String>,
    pub problema: Option<String>,
    pub servico: Option<String>,
    pub observacoes: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "whatsapp_enviado")]
    pub whatsapp_enviado: Option<bool>,
    #[serde(alias = "lembrete_enviado")]
    pub lembrete_enviado: Option<bool>,
    #[serde(alias = "data_finalizacao")]
    pub data_finalizacao: Option<String>,
}

fn montar_input(payload: AppointmentPayload) -> Result<AppointmentInput, AppError> {
    let cliente_id = payload.cliente_id.ok_or(AppError::MissingField("clienteId"))?;
    let data_bruta = payload.data.ok_or(AppError::MissingField("data"))?;
    let data = normalize::normalizar_data(&data_bruta)
        .ok_or_else(|| AppError::InvalidDate(data_bruta.clone()))?;

    // problema e servico andam espelhados, como o front espera.
    let problema = payload
        .problema
        .or(payload.servico)
        .unwrap_or_default();

    Ok(AppointmentInput {
        cliente_id,
        veiculo_id: payload.veiculo_id.as_ref().and_then(|v| v.em_texto()),
        numero: payload.numero,
        data,
        hora: payload.hora.unwrap_or_default(),
        servico: problema.clone(),
        problema,
        observacoes: payload.observacoes.unwrap_or_default(),
        status: payload.status.unwrap_or_else(|| "pendente".to_string()),
        whatsapp_enviado: payload.whatsapp_enviado.unwrap_or(false),
        lembrete_enviado: payload.lembrete_enviado.unwrap_or(false),
        data_finalizacao: payload.data_finalizacao,
    })
}

// GET /api/agendamentos
#[utoipa::path(
    get,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    responses(
        (status = 200, description = "Agendamentos por data/hora decrescente", body = Vec<Appointment>)
    )
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let agendamentos = app_state.schedule_repo.list().await?;
    Ok((StatusCode::OK, Json(agendamentos)))
}

// POST /api/agendamentos
#[utoipa::path(
    post,
    path = "/api/agendamentos",
    tag = "Agendamentos",
    request_body = AppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = Appointment),
        (status = 200, description = "Id customizado já existia; linha existente retornada", body = Appointment),
        (status = 400, description = "clienteId/data ausentes ou inválidos")
    )
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload.id;
    let input = montar_input(payload)?;
    let (criado, agendamento) = app_state.schedule_repo.create(id, input).await?;

    let status = if criado {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(agendamento)))
}

// PUT /api/agendamentos/{id}
#[utoipa::path(
    put,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    request_body = AppointmentPayload,
    responses(
        (status = 200, description = "Agendamento atualizado", body = Appointment),
        (status = 404, description = "Agendamento não encontrado")
    )
)]
pub async fn update_appointment(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let input = montar_input(payload)?;
    let agendamento = app_state
        .schedule_repo
        .update(id, input)
        .await?
        .ok_or(AppError::NotFound("Agendamento não encontrado"))?;
    Ok((StatusCode::OK, Json(agendamento)))
}

// DELETE /api/agendamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/agendamentos/{id}",
    tag = "Agendamentos",
    responses(
        (status = 200, description = "Agendamento removido"),
        (status = 404, description = "Agendamento não encontrado")
    )
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.schedule_repo.delete(id).await? {
        return Err(AppError::NotFound("Agendamento não encontrado"));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Agendamento removido com sucesso" })),
    ))
}
