// src/models/schedule.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, types::Json};
use utoipa::ToSchema;

/// Agendamento de atendimento. `veiculo_id` fica como texto porque o front
/// usa tanto ids numéricos quanto ids customizados.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub cliente_id: i64,
    pub veiculo_id: Option<String>,
    pub numero: i64,
    #[schema(value_type = String, format = Date)]
    pub data: NaiveDate,
    pub hora: String,
    pub problema: String,
    pub servico: String,
    pub observacoes: String,
    #[schema(example = "pendente")]
    pub status: String,
    #[schema(value_type = Vec<Object>)]
    pub notificacoes: Json<Value>,
    pub whatsapp_enviado: bool,
    pub lembrete_enviado: bool,
    pub data_finalizacao: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Dados já validados/normalizados para gravação de um agendamento.
#[derive(Debug, Clone)]
pub struct AppointmentInput {
    pub cliente_id: i64,
    pub veiculo_id: Option<String>,
    pub numero: Option<i64>,
    pub data: NaiveDate,
    pub hora: String,
    pub problema: String,
    pub servico: String,
    pub observacoes: String,
    pub status: String,
    pub whatsapp_enviado: bool,
    pub lembrete_enviado: bool,
    pub data_finalizacao: Option<String>,
}
