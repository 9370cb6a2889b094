// src/db/workshop_repo.rs
//
// Orçamentos e ordens de serviço. As duas tabelas andam juntas: toda ordem
// nasce de um orçamento aprovado.

use chrono::{NaiveDate, Utc};
use sqlx::{SqlitePool, types::Json};

use crate::{
    common::error::AppError,
    models::workshop::{Quote, QuoteInput, ServiceOrder, ServiceOrderInput},
};

#[derive(Clone)]
pub struct WorkshopRepository {
    pool: SqlitePool,
}

impl WorkshopRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ORÇAMENTOS
    // =========================================================================

    pub async fn list_quotes(&self) -> Result<Vec<Quote>, AppError> {
        let orcamentos = sqlx::query_as::<_, Quote>("SELECT * FROM orcamentos ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orcamentos)
    }

    pub async fn find_quote_by_id(&self, id: i64) -> Result<Option<Quote>, AppError> {
        let orcamento = sqlx::query_as::<_, Quote>("SELECT * FROM orcamentos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(orcamento)
    }

    /// Heurística de duplicata: mesmo cliente, mesma data e mesmo total,
    /// ainda pendente.
    pub async fn find_duplicate_quote(
        &self,
        cliente_id: i64,
        data: NaiveDate,
        total: f64,
    ) -> Result<Option<Quote>, AppError> {
        let orcamento = sqlx::query_as::<_, Quote>(
            r#"
            SELECT * FROM orcamentos
            WHERE cliente_id = ? AND data = ? AND total = ? AND status = 'pendente'
            LIMIT 1
            "#,
        )
        .bind(cliente_id)
        .bind(data)
        .bind(total)
        .fetch_optional(&self.pool)
        .await?;
        Ok(orcamento)
    }

    async fn next_quote_numero(&self) -> Result<i64, AppError> {
        let numero =
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(numero) + 1, 0) FROM orcamentos")
                .fetch_one(&self.pool)
                .await?;
        Ok(numero)
    }

    pub async fn insert_quote(
        &self,
        id: Option<i64>,
        input: QuoteInput,
    ) -> Result<Quote, AppError> {
        let numero = match input.numero {
            Some(n) => n,
            None => self.next_quote_numero().await?,
        };
        let agora = Utc::now();

        let sql_com_id = r#"
            INSERT INTO orcamentos (
                id, numero, cliente_id, veiculo_id, agendamento_id, servicos, pecas,
                observacoes, validade, data, desconto, valor_total, total, status,
                status_financeiro, data_duplicata, data_liquidacao, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;
        let sql_sem_id = r#"
            INSERT INTO orcamentos (
                numero, cliente_id, veiculo_id, agendamento_id, servicos, pecas,
                observacoes, validade, data, desconto, valor_total, total, status,
                status_financeiro, data_duplicata, data_liquidacao, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let mut query = sqlx::query_as::<_, Quote>(if id.is_some() { sql_com_id } else { sql_sem_id });
        if let Some(id) = id {
            query = query.bind(id);
        }
        let criado = query
            .bind(numero)
            .bind(input.cliente_id)
            .bind(&input.veiculo_id)
            .bind(input.agendamento_id)
            .bind(Json(&input.servicos))
            .bind(Json(&input.pecas))
            .bind(&input.observacoes)
            .bind(input.validade)
            .bind(input.data)
            .bind(input.desconto)
            .bind(input.total) // valor_total acompanha o total
            .bind(input.total)
            .bind(&input.status)
            .bind(&input.status_financeiro)
            .bind(&input.data_duplicata)
            .bind(&input.data_liquidacao)
            .bind(agora)
            .bind(agora)
            .fetch_one(&self.pool)
            .await?;
        Ok(criado)
    }

    pub async fn update_quote(
        &self,
        id: i64,
        input: QuoteInput,
    ) -> Result<Option<Quote>, AppError> {
        let atualizado = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE orcamentos
            SET numero = COALESCE(?, numero),
                cliente_id = ?,
                veiculo_id = ?,
                agendamento_id = ?,
                servicos = ?,
                pecas = ?,
                observacoes = ?,
                validade = ?,
                data = ?,
                desconto = ?,
                valor_total = ?,
                total = ?,
                status = ?,
                status_financeiro = ?,
                data_duplicata = ?,
                data_liquidacao = ?,
                atualizado_em = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.numero)
        .bind(input.cliente_id)
        .bind(&input.veiculo_id)
        .bind(input.agendamento_id)
        .bind(Json(&input.servicos))
        .bind(Json(&input.pecas))
        .bind(&input.observacoes)
        .bind(input.validade)
        .bind(input.data)
        .bind(input.desconto)
        .bind(input.total)
        .bind(input.total)
        .bind(&input.status)
        .bind(&input.status_financeiro)
        .bind(&input.data_duplicata)
        .bind(&input.data_liquidacao)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(atualizado)
    }

    pub async fn delete_quote(&self, id: i64) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM orcamentos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    pub async fn list_all_quotes(&self) -> Result<Vec<Quote>, AppError> {
        let orcamentos = sqlx::query_as::<_, Quote>("SELECT * FROM orcamentos ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orcamentos)
    }

    // =========================================================================
    //  ORDENS DE SERVIÇO
    // =========================================================================

    pub async fn list_orders(&self) -> Result<Vec<ServiceOrder>, AppError> {
        let ordens =
            sqlx::query_as::<_, ServiceOrder>("SELECT * FROM ordens_servico ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(ordens)
    }

    pub async fn find_order_by_id(&self, id: i64) -> Result<Option<ServiceOrder>, AppError> {
        let ordem = sqlx::query_as::<_, ServiceOrder>("SELECT * FROM ordens_servico WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ordem)
    }

    /// Diferente dos orçamentos, a primeira OS recebe numero 1.
    async fn next_order_numero(&self) -> Result<i64, AppError> {
        let numero =
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(numero) + 1, 1) FROM ordens_servico")
                .fetch_one(&self.pool)
                .await?;
        Ok(numero)
    }

    pub async fn insert_order(
        &self,
        id: Option<i64>,
        input: ServiceOrderInput,
    ) -> Result<ServiceOrder, AppError> {
        let numero = match input.numero {
            Some(n) => n,
            None => self.next_order_numero().await?,
        };
        let agora = Utc::now();

        let sql_com_id = r#"
            INSERT INTO ordens_servico (
                id, numero, orcamento_id, cliente_id, veiculo_id, agendamento_id,
                servicos, pecas, observacoes, status, data_abertura, data_finalizacao,
                whatsapp_enviado, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;
        let sql_sem_id = r#"
            INSERT INTO ordens_servico (
                numero, orcamento_id, cliente_id, veiculo_id, agendamento_id,
                servicos, pecas, observacoes, status, data_abertura, data_finalizacao,
                whatsapp_enviado, criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let mut query =
            sqlx::query_as::<_, ServiceOrder>(if id.is_some() { sql_com_id } else { sql_sem_id });
        if let Some(id) = id {
            query = query.bind(id);
        }
        let criada = query
            .bind(numero)
            .bind(input.orcamento_id)
            .bind(input.cliente_id)
            .bind(&input.veiculo_id)
            .bind(input.agendamento_id)
            .bind(Json(&input.servicos))
            .bind(Json(&input.pecas))
            .bind(&input.observacoes)
            .bind(&input.status)
            .bind(&input.data_abertura)
            .bind(&input.data_finalizacao)
            .bind(input.whatsapp_enviado)
            .bind(agora)
            .bind(agora)
            .fetch_one(&self.pool)
            .await?;
        Ok(criada)
    }

    pub async fn update_order(
        &self,
        id: i64,
        input: ServiceOrderInput,
    ) -> Result<Option<ServiceOrder>, AppError> {
        let atualizada = sqlx::query_as::<_, ServiceOrder>(
            r#"
            UPDATE ordens_servico
            SET numero = COALESCE(?, numero),
                orcamento_id = ?,
                cliente_id = ?,
                veiculo_id = ?,
                agendamento_id = ?,
                servicos = ?,
                pecas = ?,
                observacoes = ?,
                status = ?,
                data_abertura = ?,
                data_finalizacao = ?,
                whatsapp_enviado = ?,
                atualizado_em = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(input.numero)
        .bind(input.orcamento_id)
        .bind(input.cliente_id)
        .bind(&input.veiculo_id)
        .bind(input.agendamento_id)
        .bind(Json(&input.servicos))
        .bind(Json(&input.pecas))
        .bind(&input.observacoes)
        .bind(&input.status)
        .bind(&input.data_abertura)
        .bind(&input.data_finalizacao)
        .bind(input.whatsapp_enviado)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(atualizada)
    }

    pub async fn delete_order(&self, id: i64) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM ordens_servico WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    pub async fn list_all_orders(&self) -> Result<Vec<ServiceOrder>, AppError> {
        let ordens =
            sqlx::query_as::<_, ServiceOrder>("SELECT * FROM ordens_servico ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(ordens)
    }
}
