// src/db/finance_repo.rs
//
// Tabelas 'transacoes' e 'pagamentos_parciais'. Os métodos recebem um
// executor genérico para que o serviço consiga encadear várias consultas
// dentro de uma mesma transação do banco.

use chrono::{NaiveDate, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::{
    common::error::AppError,
    models::finance::{NewTransaction, PartialPayment, Transaction, TransactionKind, TransactionStatus},
};

#[derive(Clone)]
pub struct FinanceRepository;

impl FinanceRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  TRANSAÇÕES
    // =========================================================================

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transacoes = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transacoes ORDER BY data DESC, id DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(transacoes)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transacao = sqlx::query_as::<_, Transaction>("SELECT * FROM transacoes WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(transacao)
    }

    /// Transação avulsa (não parcelada) ainda em aberto para um orçamento.
    pub async fn find_open_by_quote<'e, E>(
        &self,
        executor: E,
        orcamento_id: i64,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transacao = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transacoes
            WHERE orcamento_id = ? AND parcelado = 0 AND status IN ('aberto', 'atrasado')
            LIMIT 1
            "#,
        )
        .bind(orcamento_id)
        .fetch_optional(executor)
        .await?;
        Ok(transacao)
    }

    pub async fn find_installment_in_group<'e, E>(
        &self,
        executor: E,
        grupo: &str,
        numero_parcela: i64,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transacao = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transacoes
            WHERE grupo_parcelamento_id = ? AND numero_parcela = ?
            LIMIT 1
            "#,
        )
        .bind(grupo)
        .bind(numero_parcela)
        .fetch_optional(executor)
        .await?;
        Ok(transacao)
    }

    pub async fn find_installment_by_quote<'e, E>(
        &self,
        executor: E,
        orcamento_id: i64,
        numero_parcela: i64,
    ) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let transacao = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transacoes
            WHERE orcamento_id = ? AND numero_parcela = ?
            LIMIT 1
            "#,
        )
        .bind(orcamento_id)
        .bind(numero_parcela)
        .fetch_optional(executor)
        .await?;
        Ok(transacao)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        nova: &NewTransaction,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let agora = Utc::now();

        let sql_com_id = r#"
            INSERT INTO transacoes (
                id, orcamento_id, cliente_id, descricao, tipo, valor, data,
                vencimento, status, observacoes, fornecedor, forma_pagamento,
                parcelado, numero_parcela, total_parcelas, grupo_parcelamento_id,
                criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;
        let sql_sem_id = r#"
            INSERT INTO transacoes (
                orcamento_id, cliente_id, descricao, tipo, valor, data,
                vencimento, status, observacoes, fornecedor, forma_pagamento,
                parcelado, numero_parcela, total_parcelas, grupo_parcelamento_id,
                criado_em, atualizado_em
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let mut query = sqlx::query_as::<_, Transaction>(if nova.id.is_some() {
            sql_com_id
        } else {
            sql_sem_id
        });
        if let Some(id) = nova.id {
            query = query.bind(id);
        }
        let criada = query
            .bind(nova.orcamento_id)
            .bind(nova.cliente_id)
            .bind(&nova.descricao)
            .bind(nova.tipo)
            .bind(nova.valor)
            .bind(nova.data)
            .bind(nova.vencimento)
            .bind(nova.status)
            .bind(&nova.observacoes)
            .bind(&nova.fornecedor)
            .bind(&nova.forma_pagamento)
            .bind(nova.parcelado)
            .bind(nova.numero_parcela)
            .bind(nova.total_parcelas)
            .bind(&nova.grupo_parcelamento_id)
            .bind(agora)
            .bind(agora)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // O índice parcial fecha a corrida que a heurística não viu.
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict(
                            "Já existe transação em aberto para este orçamento".to_string(),
                        );
                    }
                }
                e.into()
            })?;
        Ok(criada)
    }

    /// Regrava a linha inteira (o serviço faz o merge campo a campo antes).
    pub async fn update_row<'e, E>(
        &self,
        executor: E,
        transacao: &Transaction,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            UPDATE transacoes
            SET orcamento_id = ?,
                cliente_id = ?,
                descricao = ?,
                tipo = ?,
                valor = ?,
                data = ?,
                vencimento = ?,
                data_pagamento = ?,
                status = ?,
                observacoes = ?,
                fornecedor = ?,
                forma_pagamento = ?,
                parcelado = ?,
                numero_parcela = ?,
                total_parcelas = ?,
                grupo_parcelamento_id = ?,
                valor_pago = ?,
                ultimo_pagamento_parcial = ?,
                atualizado_em = ?
            WHERE id = ?
            "#,
        )
        .bind(transacao.orcamento_id)
        .bind(transacao.cliente_id)
        .bind(&transacao.descricao)
        .bind(transacao.tipo)
        .bind(transacao.valor)
        .bind(transacao.data)
        .bind(transacao.vencimento)
        .bind(transacao.data_pagamento)
        .bind(transacao.status)
        .bind(&transacao.observacoes)
        .bind(&transacao.fornecedor)
        .bind(&transacao.forma_pagamento)
        .bind(transacao.parcelado)
        .bind(transacao.numero_parcela)
        .bind(transacao.total_parcelas)
        .bind(&transacao.grupo_parcelamento_id)
        .bind(transacao.valor_pago)
        .bind(transacao.ultimo_pagamento_parcial)
        .bind(Utc::now())
        .bind(transacao.id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let resultado = sqlx::query("DELETE FROM transacoes WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    /// Vira 'atrasado' tudo que está 'aberto' com vencimento no passado.
    pub async fn mark_overdue<'e, E>(&self, executor: E, hoje: NaiveDate) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE transacoes
            SET status = 'atrasado', atualizado_em = ?
            WHERE status = 'aberto' AND vencimento IS NOT NULL AND vencimento < ?
            "#,
        )
        .bind(Utc::now())
        .bind(hoje)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn list_filtered<'e, E>(
        &self,
        executor: E,
        tipo: Option<TransactionKind>,
        status: Option<TransactionStatus>,
    ) -> Result<Vec<Transaction>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM transacoes WHERE 1 = 1");
        if let Some(tipo) = tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY id ASC");
        let transacoes = qb
            .build_query_as::<Transaction>()
            .fetch_all(executor)
            .await?;
        Ok(transacoes)
    }

    pub async fn delete_filtered<'e, E>(
        &self,
        executor: E,
        tipo: Option<TransactionKind>,
        status: Option<TransactionStatus>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM transacoes WHERE 1 = 1");
        if let Some(tipo) = tipo {
            qb.push(" AND tipo = ").push_bind(tipo);
        }
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        let resultado = qb.build().execute(executor).await?;
        Ok(resultado.rows_affected())
    }

    // =========================================================================
    //  PAGAMENTOS PARCIAIS
    // =========================================================================

    pub async fn insert_partial<'e, E>(
        &self,
        executor: E,
        transacao_id: i64,
        valor_pago: f64,
        data_pagamento: NaiveDate,
        observacoes: Option<&str>,
    ) -> Result<PartialPayment, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let pagamento = sqlx::query_as::<_, PartialPayment>(
            r#"
            INSERT INTO pagamentos_parciais (transacao_id, valor_pago, data_pagamento, observacoes, criado_em)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(transacao_id)
        .bind(valor_pago)
        .bind(data_pagamento)
        .bind(observacoes)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(pagamento)
    }

    pub async fn list_partials<'e, E>(
        &self,
        executor: E,
        transacao_id: i64,
    ) -> Result<Vec<PartialPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let pagamentos = sqlx::query_as::<_, PartialPayment>(
            "SELECT * FROM pagamentos_parciais WHERE transacao_id = ? ORDER BY id ASC",
        )
        .bind(transacao_id)
        .fetch_all(executor)
        .await?;
        Ok(pagamentos)
    }

    pub async fn list_partials_all<'e, E>(
        &self,
        executor: E,
    ) -> Result<Vec<PartialPayment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let pagamentos =
            sqlx::query_as::<_, PartialPayment>("SELECT * FROM pagamentos_parciais ORDER BY id ASC")
                .fetch_all(executor)
                .await?;
        Ok(pagamentos)
    }
}
