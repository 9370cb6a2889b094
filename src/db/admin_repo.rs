// src/db/admin_repo.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{common::error::AppError, models::admin::AdminSession};

// Sessões de administrador vivem no banco: sobrevivem a restart e podem ser
// revogadas uma a uma.
#[derive(Clone)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_session(
        &self,
        token_id: &str,
        criado_em: DateTime<Utc>,
        expira_em: DateTime<Utc>,
    ) -> Result<AdminSession, AppError> {
        let sessao = sqlx::query_as::<_, AdminSession>(
            r#"
            INSERT INTO sessoes_admin (token_id, criado_em, expira_em)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(token_id)
        .bind(criado_em)
        .bind(expira_em)
        .fetch_one(&self.pool)
        .await?;
        Ok(sessao)
    }

    pub async fn find_session(&self, token_id: &str) -> Result<Option<AdminSession>, AppError> {
        let sessao =
            sqlx::query_as::<_, AdminSession>("SELECT * FROM sessoes_admin WHERE token_id = ?")
                .bind(token_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(sessao)
    }

    pub async fn delete_session(&self, token_id: &str) -> Result<bool, AppError> {
        let resultado = sqlx::query("DELETE FROM sessoes_admin WHERE token_id = ?")
            .bind(token_id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected() > 0)
    }

    pub async fn purge_expired(&self, agora: DateTime<Utc>) -> Result<u64, AppError> {
        let resultado = sqlx::query("DELETE FROM sessoes_admin WHERE expira_em < ?")
            .bind(agora)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}
