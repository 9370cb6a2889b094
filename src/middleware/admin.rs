// src/middleware/admin.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::admin::AdminAuth};

// O middleware em si: barra a requisição sem sessão de admin viva nem o
// segredo compartilhado de limpeza.
pub async fn admin_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = app_state
        .admin_service
        .authorize_headers(request.headers())
        .await?;

    // Insere a autorização nos "extensions" da requisição
    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

// Extrator para os handlers atrás do guard saberem como a requisição
// foi autorizada.
pub struct AdminContext(pub AdminAuth);

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminAuth>()
            .cloned()
            .map(AdminContext)
            .ok_or(AppError::AdminRequired)
    }
}
