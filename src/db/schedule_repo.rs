// src/db/schedule_repo.rs

use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    models::schedule::{Appointment, AppointmentInput},
};

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, AppError> {
        let agendamentos = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM agendamentos ORDER BY data DESC, hora DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(agendamentos)
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppError> {
        let agendamentos =
            sqlx::query_as::<_, Appointment>("SELECT * FROM agendamentos ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(agendamentos)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, AppError> {
        let agendamento = sqlx::query_as::<_, Appointment>("SELECT * FROM agendamentos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(agendamento)
    }

    /// Primeiro agendamento recebe numero 0; os demais MAX+1.
    async fn next_numero(&self) -> Result<i64, AppError> {
        let numero = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(numero) + 1, 0) FROM agendamentos",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(numero)
    }

    /// Insere um agendamento. Id customizado já existente devolve a linha
    /// existente (retry idempotente), sem criar uma segunda.
    pub async fn create(
        &self,
        id: Option<i64>,
        input: AppointmentInput,
    ) -> Result<(bool, Appointment), AppError> {
        if let Some(id) = id {
            if let Some(existente) = self.find_by_id(id).await? {
                return Ok((false, existente));
            }
        }

        let numero = match input.numero {
            Some(n) => n,
            None => self.next_numero().await?,
        };
        let agora = Utc::now();

        let sql_com_id = r#"
            INSERT INTO agendamentos (
                id, cliente_id, veiculo_id, numero, data, hora, problema, servico,
                observacoes, status, whatsapp_enviado, lembrete_enviado,
                data_finalizacao, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;
        let sql_sem_id = r#"
            INSERT INTO agendamentos (
                cliente_id, veiculo_id, numero, data, hora, problema, servico,
                observacoes, status, whatsapp_enviado, lembrete_enviado,
                data_finalizacao, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let mut query = sqlx::query_as::<_, Appointment>(if id.is_some() {
            sql_com_id
        } else {
            sql_sem_id
        });
        if let Some(id) = id {
            query = query.bind(id);
        }
        let criado = query
            .bind(input.cliente_id)
            .bind(&input.veiculo_id)
            .bind(numero)
            .bind(input.data)
            .bind(&input.hora)
            .bind(&input.problema)
            .bind(&input.servico)
            .bind(&input.observacoes)
            .bind(&input.status)
            .bind(input.whatsapp_enviado)
            .bind(input.lembrete_enviado)
            .bind(&input.data_finalizacao)
            .bind(agora)
            .bind(agora)
            .fetch_one(&self.pool)
            .await?;
        Ok((true, criado))
    }

    pub async fn update(
        &self,
        id: i64,
        input: AppointmentInput,
    ) -> Result<Option<Appointment>, AppError> {
        let atualizado = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE agendamentos
            SET cliente_id = ?,
                veiculo_id = ?,
                numero = COALESCE(?, numero),
                data = ?,
                hora = ?,
                problema = ?,
                servico = ?,
                observacoes = ?,
                status = ?,
                whatsapp_enviado = ?,
                lembrete_enviado = ?,
                data_finalizacao = ?,
                atualizado_em = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.cliente_id)
        .bind(&input.veiculo_id)
        .bind(input.numero)
        .bind(input.data)
        .bind(&input.hora)
        .bind(&input.problema)
        .bind(&input.servico)
        .bind(&input.observacoes)
        .bind(&input.status)
        .bind(input.whatsapp_enviado)
        .bind(input.lembrete_enviado)
        .bind(&input.data_finalizacao)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(atualizado)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM agendamentos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
