// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::normalize::ValorFlex;

// --- Enums (armazenados como TEXT) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Receber, // dinheiro devido à oficina
    Pagar,   // dinheiro devido pela oficina
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Aberto,
    Pago,
    Atrasado,
    Parcial,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Aberto => "aberto",
            TransactionStatus::Pago => "pago",
            TransactionStatus::Atrasado => "atrasado",
            TransactionStatus::Parcial => "parcial",
        }
    }
}

// --- Structs ---

/// Um movimento financeiro: duplicata avulsa ou parcela de um grupo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub orcamento_id: Option<i64>,
    pub cliente_id: Option<i64>,
    pub descricao: String,
    pub tipo: TransactionKind,
    #[schema(example = "1234.56")]
    pub valor: f64,
    #[schema(value_type = String, format = Date, example = "2025-12-01")]
    pub data: NaiveDate,
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-31")]
    pub vencimento: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_pagamento: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub observacoes: String,
    pub fornecedor: Option<String>,
    pub forma_pagamento: Option<String>,
    pub parcelado: bool,
    pub numero_parcela: Option<i64>,
    pub total_parcelas: Option<i64>,
    pub grupo_parcelamento_id: Option<String>,
    pub valor_pago: f64,
    #[schema(value_type = Option<String>, format = Date)]
    pub ultimo_pagamento_parcial: Option<NaiveDate>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Dados já validados/normalizados para inserção de uma transação.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: Option<i64>,
    pub orcamento_id: Option<i64>,
    pub cliente_id: Option<i64>,
    pub descricao: String,
    pub tipo: TransactionKind,
    pub valor: f64,
    pub data: NaiveDate,
    pub vencimento: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub observacoes: String,
    pub fornecedor: Option<String>,
    pub forma_pagamento: Option<String>,
    pub parcelado: bool,
    pub numero_parcela: Option<i64>,
    pub total_parcelas: Option<i64>,
    pub grupo_parcelamento_id: Option<String>,
}

// --- Payloads da API ---
// O front manda camelCase; os aliases aceitam o snake_case legado.

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    /// Id customizado gerado pelo cliente (Date.now()). Reenvio devolve a
    /// linha existente.
    pub id: Option<i64>,
    #[serde(alias = "orcamento_id")]
    pub orcamento_id: Option<i64>,
    #[serde(alias = "cliente_id")]
    pub cliente_id: Option<i64>,
    pub descricao: Option<String>,
    pub tipo: Option<TransactionKind>,
    #[schema(value_type = Option<String>, example = "R$ 1.234,56")]
    pub valor: Option<ValorFlex>,
    #[schema(example = "31/12/2025")]
    pub data: Option<String>,
    pub vencimento: Option<String>,
    pub status: Option<TransactionStatus>,
    pub observacoes: Option<String>,
    pub fornecedor: Option<String>,
    #[serde(alias = "forma_pagamento")]
    pub forma_pagamento: Option<String>,
    pub parcelado: Option<bool>,
    #[serde(alias = "numero_parcela")]
    pub numero_parcela: Option<i64>,
    #[serde(alias = "total_parcelas")]
    pub total_parcelas: Option<i64>,
    #[serde(alias = "grupo_parcelamento_id")]
    pub grupo_parcelamento_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionPayload {
    #[serde(alias = "orcamento_id")]
    pub orcamento_id: Option<i64>,
    #[serde(alias = "cliente_id")]
    pub cliente_id: Option<i64>,
    pub descricao: Option<String>,
    pub tipo: Option<TransactionKind>,
    #[schema(value_type = Option<String>)]
    pub valor: Option<ValorFlex>,
    pub data: Option<String>,
    pub vencimento: Option<String>,
    #[serde(alias = "data_pagamento")]
    pub data_pagamento: Option<String>,
    pub status: Option<TransactionStatus>,
    pub observacoes: Option<String>,
    pub fornecedor: Option<String>,
    #[serde(alias = "forma_pagamento")]
    pub forma_pagamento: Option<String>,
    #[serde(alias = "numero_parcela")]
    pub numero_parcela: Option<i64>,
    #[serde(alias = "total_parcelas")]
    pub total_parcelas: Option<i64>,
    #[serde(alias = "grupo_parcelamento_id")]
    pub grupo_parcelamento_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPartialPayload {
    #[serde(alias = "valor_pago")]
    #[schema(value_type = Option<String>, example = "250,00")]
    pub valor_pago: Option<ValorFlex>,
    #[serde(alias = "data_pagamento")]
    pub data_pagamento: Option<String>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FinanceCleanupPayload {
    /// Sem `confirm: true` nada é apagado.
    pub confirm: Option<bool>,
    pub tipo: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FinanceCleanupResponse {
    pub removidos: u64,
    pub backup: Option<String>,
}

/// Baixa parcial registrada contra uma transação.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartialPayment {
    pub id: i64,
    pub transacao_id: i64,
    #[schema(example = "250.00")]
    pub valor_pago: f64,
    #[schema(value_type = String, format = Date)]
    pub data_pagamento: NaiveDate,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
}
