// src/handlers/quotes.rs

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
    common::{
        error::AppError,
        normalize::{self, IdFlex, ValorFlex},
    },
    config::AppState,
    models::workshop::{Quote, QuoteInput},
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    pub id: Option<i64>,
    pub numero: Option<i64>,
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
    pub validade: Option<i64>,
    pub data: Option<String>,
    #[schema(value_type = Option<String>)]
    pub desconto: Option<ValorFlex>,
    #[schema(value_type = Option<String>)]
    pub total: Option<ValorFlex>,
    #[serde(alias = "valor_total")]
    #[schema(value_type = Option<String>)]
    pub valor_total: Option<ValorFlex>,
    pub status: Option<String>,
    #[serde(alias = "status_financeiro")]
    pub status_financeiro: Option<String>,
    #[serde(alias = "data_duplicata")]
    pub data_duplicata: Option<String>,
    #[serde(alias = "data_liquidacao")]
    pub data_liquidacao: Option<String>,
}

fn montar_input(payload: QuotePayload) -> Result<QuoteInput, AppError> {
    let cliente_id = payload.cliente_id.ok_or(AppError::MissingField("clienteId"))?;
    let data = match &payload.data {
        Some(bruta) => normalize::normalizar_data(bruta)
            .ok_or_else(|| AppError::InvalidDate(bruta.clone()))?,
        None => Utc::now().date_naive(),
    };
    // total e valor_total são sinônimos na API antiga; valores ilegíveis
    // caem para zero, como o front sempre tratou.
    let total = payload
        .total
        .as_ref()
        .or(payload.valor_total.as_ref())
        .and_then(normalize::normalizar_valor)
        .unwrap_or(0.0);
    let desconto = payload
        .desconto
        .as_ref()
        .and_then(normalize::normalizar_valor)
        .unwrap_or(0.0);

    Ok(QuoteInput {
        numero: payload.numero,
        cliente_id,
        veiculo_id: payload.veiculo_id.as_ref().and_then(|v| v.em_texto()),
        agendamento_id: payload.agendamento_id,
        servicos: payload.servicos.unwrap_or_else(|| json!([])),
        pecas: payload.pecas.unwrap_or_else(|| json!([])),
        observacoes: payload.observacoes.unwrap_or_default(),
        validade: payload.validade,
        data,
        desconto,
        total,
        status: payload.status.unwrap_or_else(|| "pendente".to_string()),
        status_financeiro: payload.status_financeiro,
        data_duplicata: payload.data_duplicata,
        data_liquidacao: payload.data_liquidacao,
    })
}

// GET /api/orcamentos
#[utoipa::path(
    get,
    path = "/api/orcamentos",
    tag = "Orçamentos",
    responses(
        (status = 200, description = "Lista de orçamentos", body = Vec<Quote>)
    )
)]
pub async fn list_quotes(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orcamentos = app_state.workshop_repo.list_quotes().await?;
    Ok((StatusCode::OK, Json(orcamentos)))
}

// POST /api/orcamentos
#[utoipa::path(
    post,
    path = "/api/orcamentos",
    tag = "Orçamentos",
    request_body = QuotePayload,
    responses(
        (status = 201, description = "Orçamento criado", body = Quote),
        (status = 200, description = "Orçamento equivalente já existia; linha existente retornada", body = Quote),
        (status = 400, description = "clienteId ausente")
    )
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload.id;
    let input = montar_input(payload)?;

    if let Some(id) = id {
        // Retry idempotente com id customizado.
        if let Some(existente) = app_state.workshop_repo.find_quote_by_id(id).await? {
            return Ok((StatusCode::OK, Json(existente)));
        }
        let criado = app_state.workshop_repo.insert_quote(Some(id), input).await?;
        return Ok((StatusCode::CREATED, Json(criado)));
    }

    // Heurística de duplicata: mesmo cliente + data + total ainda pendente.
    if let Some(existente) = app_state
        .workshop_repo
        .find_duplicate_quote(input.cliente_id, input.data, input.total)
        .await?
    {
        return Ok((StatusCode::OK, Json(existente)));
    }

    let criado = app_state.workshop_repo.insert_quote(None, input).await?;
    Ok((StatusCode::CREATED, Json(criado)))
}

// PUT /api/orcamentos/{id}
#[utoipa::path(
    put,
    path = "/api/orcamentos/{id}",
    tag = "Orçamentos",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Orçamento atualizado", body = Quote),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn update_quote(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let input = montar_input(payload)?;
    let orcamento = app_state
        .workshop_repo
        .update_quote(id, input)
        .await?
        .ok_or(AppError::NotFound("Orçamento não encontrado"))?;
    Ok((StatusCode::OK, Json(orcamento)))
}

// DELETE /api/orcamentos/{id}
#[utoipa::path(
    delete,
    path = "/api/orcamentos/{id}",
    tag = "Orçamentos",
    responses(
        (status = 200, description = "Orçamento removido"),
        (status = 404, description = "Orçamento não encontrado")
    )
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.workshop_repo.delete_quote(id).await? {
        return Err(AppError::NotFound("Orçamento não encontrado"));
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Orçamento removido com sucesso" })),
    ))
}
