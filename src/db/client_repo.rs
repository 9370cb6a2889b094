// src/db/client_repo.rs

use chrono::Utc;
use serde_json::Value;
use sqlx::{SqlitePool, types::Json};

use crate::{common::error::AppError, models::crm::Client};

// O repositório de clientes, responsável por todas as interações com a
// tabela 'clientes'.
#[derive(Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lista apenas clientes ativos (o DELETE da API é um soft delete).
    pub async fn list_active(&self) -> Result<Vec<Client>, AppError> {
        let clientes =
            sqlx::query_as::<_, Client>("SELECT * FROM clientes WHERE ativo = 1 ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clientes)
    }

    /// Lista todos, inclusive inativos. Usado pelo snapshot de backup.
    pub async fn list_all(&self) -> Result<Vec<Client>, AppError> {
        let clientes = sqlx::query_as::<_, Client>("SELECT * FROM clientes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(clientes)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let cliente = sqlx::query_as::<_, Client>("SELECT * FROM clientes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    /// Insere um cliente. Com id customizado já existente, atualiza em vez de
    /// inserir (retry idempotente do front-end).
    pub async fn upsert(
        &self,
        id: Option<i64>,
        nome: &str,
        telefone: Option<&str>,
        endereco: Value,
        veiculos: Value,
        ativo: bool,
    ) -> Result<Client, AppError> {
        if let Some(id) = id {
            if self.find_by_id(id).await?.is_some() {
                return self
                    .update(id, nome, telefone, endereco, veiculos, ativo)
                    .await?
                    .ok_or(AppError::NotFound("Cliente não encontrado"));
            }
            let criado = sqlx::query_as::<_, Client>(
                r#"
                INSERT INTO clientes (id, nome, telefone, endereco, veiculos, ativo, criado_em)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(nome)
            .bind(telefone)
            .bind(Json(endereco))
            .bind(Json(veiculos))
            .bind(ativo)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
            return Ok(criado);
        }

        let criado = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clientes (nome, telefone, endereco, veiculos, ativo, criado_em)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(telefone)
        .bind(Json(endereco))
        .bind(Json(veiculos))
        .bind(ativo)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(criado)
    }

    pub async fn update(
        &self,
        id: i64,
        nome: &str,
        telefone: Option<&str>,
        endereco: Value,
        veiculos: Value,
        ativo: bool,
    ) -> Result<Option<Client>, AppError> {
        let atualizado = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clientes
            SET nome = ?, telefone = ?, endereco = ?, veiculos = ?, ativo = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(telefone)
        .bind(Json(endereco))
        .bind(Json(veiculos))
        .bind(ativo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(atualizado)
    }

    /// Soft delete: marca como inativo.
    pub async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let resultado = sqlx::query("UPDATE clientes SET ativo = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }
}
