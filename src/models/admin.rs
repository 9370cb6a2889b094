// src/models/admin.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Claims do token de administrador. O `jti` aponta para a linha em
/// `sessoes_admin`; sem ela o token não vale, mesmo assinado.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub token_id: String,
    pub criado_em: DateTime<Utc>,
    pub expira_em: DateTime<Utc>,
}

/// Como a requisição provou ser de administrador.
#[derive(Debug, Clone)]
pub enum AdminAuth {
    Sessao(AdminSession),
    SegredoCompartilhado,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "required"))]
    pub senha: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expira_em: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub autenticado: bool,
}
