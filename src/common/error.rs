use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0} é obrigatório")]
    MissingField(&'static str),

    #[error("Valor monetário inválido: {0}")]
    InvalidAmount(String),

    #[error("Data inválida: {0}")]
    InvalidDate(String),

    #[error("Operação destrutiva exige confirm: true")]
    ConfirmationRequired,

    #[error("Tabela desconhecida: {0}")]
    UnknownTable(String),

    #[error("Senha de administrador inválida")]
    InvalidCredentials,

    #[error("Token de administrador inválido ou expirado")]
    InvalidToken,

    #[error("Autenticação de administrador é obrigatória")]
    AdminRequired,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Parcela {anterior} ainda não foi liquidada (status: {status_anterior})")]
    InstallmentOutOfSequence {
        anterior: i64,
        status_anterior: String,
    },

    #[error("{0}")]
    Conflict(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // 409 com payload descritivo: o front precisa saber qual parcela
            // está travando a liquidação.
            AppError::InstallmentOutOfSequence {
                anterior,
                status_anterior,
            } => {
                let body = Json(json!({
                    "error": format!(
                        "Parcela {} ainda não foi liquidada (status: {})",
                        anterior, status_anterior
                    ),
                    "parcelaAnterior": anterior,
                    "statusAnterior": status_anterior,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            ref e @ (AppError::MissingField(_)
            | AppError::InvalidAmount(_)
            | AppError::InvalidDate(_)
            | AppError::ConfirmationRequired
            | AppError::UnknownTable(_)) => (StatusCode::BAD_REQUEST, e.to_string()),

            ref e @ (AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::AdminRequired) => (StatusCode::FORBIDDEN, e.to_string()),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),

            // Erros do banco sobem como 500 com a mensagem crua do driver no
            // corpo — comportamento herdado da aplicação original.
            AppError::DatabaseError(e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }

            // Todos os outros erros viram 500 genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
