// src/models/workshop.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;

/// Orçamento: proposta de serviços/peças para o veículo de um cliente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: i64,
    pub numero: i64,
    pub cliente_id: i64,
    pub veiculo_id: Option<String>,
    pub agendamento_id: Option<i64>,
    #[schema(value_type = Vec<Object>)]
    pub servicos: Json<Value>,
    #[schema(value_type = Vec<Object>)]
    pub pecas: Json<Value>,
    pub observacoes: String,
    pub validade: Option<i64>,
    #[schema(value_type = String, format = Date)]
    pub data: NaiveDate,
    pub desconto: f64,
    pub valor_total: f64,
    pub total: f64,
    #[schema(example = "pendente")]
    pub status: String,
    pub status_financeiro: Option<String>,
    pub data_duplicata: Option<String>,
    pub data_liquidacao: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Ordem de serviço: registro de execução derivado de um orçamento aprovado.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: i64,
    pub numero: i64,
    pub orcamento_id: i64,
    pub cliente_id: Option<i64>,
    pub veiculo_id: Option<String>,
    pub agendamento_id: Option<i64>,
    #[schema(value_type = Vec<Object>)]
    pub servicos: Json<Value>,
    #[schema(value_type = Vec<Object>)]
    pub pecas: Json<Value>,
    pub observacoes: String,
    #[schema(example = "pendente")]
    pub status: String,
    pub data_abertura: Option<String>,
    pub data_finalizacao: Option<String>,
    pub whatsapp_enviado: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Dados já validados/normalizados para gravação de um orçamento.
#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub numero: Option<i64>,
    pub cliente_id: i64,
    pub veiculo_id: Option<String>,
    pub agendamento_id: Option<i64>,
    pub servicos: Value,
    pub pecas: Value,
    pub observacoes: String,
    pub validade: Option<i64>,
    pub data: NaiveDate,
    pub desconto: f64,
    pub total: f64,
    pub status: String,
    pub status_financeiro: Option<String>,
    pub data_duplicata: Option<String>,
    pub data_liquidacao: Option<String>,
}

/// Dados já validados/normalizados para gravação de uma ordem de serviço.
#[derive(Debug, Clone)]
pub struct ServiceOrderInput {
    pub numero: Option<i64>,
    pub orcamento_id: i64,
    pub cliente_id: Option<i64>,
    pub veiculo_id: Option<String>,
    pub agendamento_id: Option<i64>,
    pub servicos: Value,
    pub pecas: Value,
    pub observacoes: String,
    pub status: String,
    pub data_abertura: Option<String>,
    pub data_finalizacao: Option<String>,
    pub whatsapp_enviado: bool,
}
