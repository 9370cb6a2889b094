// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;

/// Cliente da oficina. `endereco` e `veiculos` são documentos JSON livres,
/// no formato que o front-end grava (cep/rua/numero..., placa/marca/modelo...).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    #[schema(example = "Maria da Silva")]
    pub nome: String,
    #[schema(example = "11987654321")]
    pub telefone: Option<String>,
    #[schema(value_type = Object)]
    pub endereco: Json<Value>,
    #[schema(value_type = Vec<Object>)]
    pub veiculos: Json<Value>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}
