// src/handlers/admin.rs

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::admin::{LoginPayload, LoginResponse, StatusResponse},
};

// POST /api/admin/login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Admin",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sessão criada", body = LoginResponse),
        (status = 403, description = "Senha inválida")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let resposta = app_state.admin_service.login(&payload.senha).await?;
    Ok(Json(resposta))
}

// POST /api/admin/logout
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    tag = "Admin",
    responses(
        (status = 200, description = "Sessão revogada"),
        (status = 403, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::AdminRequired)?;

    app_state.admin_service.logout(token).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Sessão encerrada com sucesso" })),
    ))
}

// GET /api/admin/status
#[utoipa::path(
    get,
    path = "/api/admin/status",
    tag = "Admin",
    responses(
        (status = 200, description = "Situação da sessão apresentada", body = StatusResponse)
    )
)]
pub async fn status(State(app_state): State<AppState>, headers: HeaderMap) -> Json<StatusResponse> {
    let autenticado = app_state.admin_service.is_authenticated(&headers).await;
    Json(StatusResponse { autenticado })
}
