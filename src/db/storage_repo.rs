// src/db/storage_repo.rs

use sqlx::SqlitePool;

use crate::{common::error::AppError, models::storage::StorageEntry};

#[derive(Clone)]
pub struct StorageRepository {
    pool: SqlitePool,
}

impl StorageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<StorageEntry>, AppError> {
        let entradas =
            sqlx::query_as::<_, StorageEntry>("SELECT chave, valor FROM storage ORDER BY chave ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(entradas)
    }

    pub async fn get(&self, chave: &str) -> Result<Option<StorageEntry>, AppError> {
        let entrada =
            sqlx::query_as::<_, StorageEntry>("SELECT chave, valor FROM storage WHERE chave = ?")
                .bind(chave)
                .fetch_optional(&self.pool)
                .await?;
        Ok(entrada)
    }

    pub async fn upsert(&self, chave: &str, valor: Option<&str>) -> Result<StorageEntry, AppError> {
        let entrada = sqlx::query_as::<_, StorageEntry>(
            r#"
            INSERT INTO storage (chave, valor) VALUES (?, ?)
            ON CONFLICT(chave) DO UPDATE SET valor = excluded.valor
            RETURNING chave, valor
            "#,
        )
        .bind(chave)
        .bind(valor)
        .fetch_one(&self.pool)
        .await?;
        Ok(entrada)
    }

    pub async fn delete(&self, chave: &str) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM storage WHERE chave = ?")
            .bind(chave)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM storage").execute(&self.pool).await?;
        Ok(resultado.rows_affected())
    }
}
