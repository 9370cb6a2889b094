// src/models/storage.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Par chave/valor do armazenamento genérico sincronizado com o front-end.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StorageEntry {
    pub chave: String,
    pub valor: Option<String>,
}
