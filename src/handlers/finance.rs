// src/handlers/finance.rs
//
// Endpoints do módulo financeiro. A lógica pesada (duplicatas, sequência de
// parcelas, baixas parciais, backup antes de apagar) mora no FinanceService.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::finance::{
        CreateTransactionPayload, FinanceCleanupPayload, FinanceCleanupResponse, PartialPayment,
        RegisterPartialPayload, Transaction, UpdateTransactionPayload,
    },
};

#[derive(Debug, Serialize, ToSchema)]
pub struct PartialPaymentResponse {
    pub transacao: Transaction,
    pub pagamento: PartialPayment,
}

// GET /api/financeiro
#[utoipa::path(
    get,
    path = "/api/financeiro",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Transações (vencidas já viradas para 'atrasado')", body = Vec<Transaction>)
    )
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let transacoes = app_state.finance_service.list().await?;
    Ok((StatusCode::OK, Json(transacoes)))
}

// GET /api/financeiro/{id}
#[utoipa::path(
    get,
    path = "/api/financeiro/{id}",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Transação encontrada", body = Transaction),
        (status = 404, description = "Transação não encontrada")
    )
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let transacao = app_state.finance_service.get(id).await?;
    Ok((StatusCode::OK, Json(transacao)))
}

// POST /api/financeiro
#[utoipa::path(
    post,
    path = "/api/financeiro",
    tag = "Financeiro",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Transação criada", body = Transaction),
        (status = 200, description = "Linha existente retornada (retry idempotente ou duplicata de orçamento)", body = Transaction),
        (status = 400, description = "tipo/valor/data ausentes ou inválidos"),
        (status = 409, description = "Corrida perdida para o índice de unicidade")
    )
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (criada, transacao) = app_state.finance_service.create(payload).await?;
    let status = if criada {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(transacao)))
}

// PUT /api/financeiro/{id}
#[utoipa::path(
    put,
    path = "/api/financeiro/{id}",
    tag = "Financeiro",
    request_body = UpdateTransactionPayload,
    responses(
        (status = 200, description = "Transação atualizada", body = Transaction),
        (status = 404, description = "Transação não encontrada"),
        (status = 409, description = "Parcela anterior ainda em aberto")
    )
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let transacao = app_state.finance_service.update(id, payload).await?;
    Ok((StatusCode::OK, Json(transacao)))
}

// GET /api/financeiro/{id}/pagamentos
#[utoipa::path(
    get,
    path = "/api/financeiro/{id}/pagamentos",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Baixas parciais da transação", body = Vec<PartialPayment>),
        (status = 404, description = "Transação não encontrada")
    )
)]
pub async fn list_partial_payments(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let pagamentos = app_state.finance_service.list_partials(id).await?;
    Ok((StatusCode::OK, Json(pagamentos)))
}

// POST /api/financeiro/{id}/pagamentos
#[utoipa::path(
    post,
    path = "/api/financeiro/{id}/pagamentos",
    tag = "Financeiro",
    request_body = RegisterPartialPayload,
    responses(
        (status = 201, description = "Baixa parcial registrada", body = PartialPaymentResponse),
        (status = 400, description = "valorPago ausente ou inválido"),
        (status = 404, description = "Transação não encontrada"),
        (status = 409, description = "Transação já liquidada ou parcela anterior em aberto")
    )
)]
pub async fn register_partial_payment(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RegisterPartialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (transacao, pagamento) = app_state.finance_service.register_partial(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(PartialPaymentResponse {
            transacao,
            pagamento,
        }),
    ))
}

// DELETE /api/financeiro/{id} — admin-gated, backup antes de apagar.
#[utoipa::path(
    delete,
    path = "/api/financeiro/{id}",
    tag = "Financeiro",
    responses(
        (status = 200, description = "Transação removida; resposta traz o caminho do backup"),
        (status = 403, description = "Sem sessão de administrador"),
        (status = 404, description = "Transação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    app_state.admin_service.authorize_headers(&headers).await?;

    let backup = app_state.finance_service.delete_with_backup(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Transação removida com sucesso",
            "backup": backup.display().to_string(),
        })),
    ))
}

// POST /api/financeiro/cleanup — admin-gated, exige confirm: true.
#[utoipa::path(
    post,
    path = "/api/financeiro/cleanup",
    tag = "Financeiro",
    request_body = FinanceCleanupPayload,
    responses(
        (status = 200, description = "Expurgo executado; backup gravado antes", body = FinanceCleanupResponse),
        (status = 400, description = "Sem confirm: true nada é apagado"),
        (status = 403, description = "Sem sessão de administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn cleanup_transactions(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FinanceCleanupPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.admin_service.authorize_headers(&headers).await?;

    let resultado = app_state.finance_service.cleanup(payload).await?;
    Ok((StatusCode::OK, Json(resultado)))
}
