// src/services/cleanup_service.rs
//
// Limpeza administrativa: snapshot JSON em disco antes de qualquer DELETE.
// As tabelas elegíveis formam um enum fechado — nome de tabela nunca chega
// ao SQL vindo direto da requisição.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    db::{ClientRepository, FinanceRepository, ScheduleRepository, WorkshopRepository},
};

/// Tabelas que o fluxo de limpeza pode tocar, na ordem em que devem ser
/// apagadas (filhas antes das mães, por causa das FKs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupTable {
    PagamentosParciais,
    Transacoes,
    OrdensServico,
    Orcamentos,
    Agendamentos,
    Clientes,
}

impl CleanupTable {
    pub const TODAS: [CleanupTable; 6] = [
        CleanupTable::PagamentosParciais,
        CleanupTable::Transacoes,
        CleanupTable::OrdensServico,
        CleanupTable::Orcamentos,
        CleanupTable::Agendamentos,
        CleanupTable::Clientes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupTable::PagamentosParciais => "pagamentos_parciais",
            CleanupTable::Transacoes => "transacoes",
            CleanupTable::OrdensServico => "ordens_servico",
            CleanupTable::Orcamentos => "orcamentos",
            CleanupTable::Agendamentos => "agendamentos",
            CleanupTable::Clientes => "clientes",
        }
    }

    pub fn parse(nome: &str) -> Result<Self, AppError> {
        match nome {
            "pagamentos_parciais" => Ok(CleanupTable::PagamentosParciais),
            "transacoes" => Ok(CleanupTable::Transacoes),
            "ordens_servico" => Ok(CleanupTable::OrdensServico),
            "orcamentos" => Ok(CleanupTable::Orcamentos),
            "agendamentos" => Ok(CleanupTable::Agendamentos),
            "clientes" => Ok(CleanupTable::Clientes),
            _ => Err(AppError::UnknownTable(nome.to_string())),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableCount {
    pub tabela: String,
    pub registros: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableCleanupResult {
    pub tabela: String,
    pub removidos: u64,
    pub backup: Option<String>,
}

/// Grava `linhas` como JSON em `dir/<tabela>-<timestamp>.json`.
pub async fn escrever_backup(
    dir: &Path,
    tabela: &str,
    linhas: &Value,
) -> Result<PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let carimbo = Utc::now().format("%Y%m%dT%H%M%S%3f");
    let caminho = dir.join(format!("{tabela}-{carimbo}.json"));
    let conteudo = serde_json::to_vec_pretty(linhas).map_err(anyhow::Error::from)?;
    tokio::fs::write(&caminho, conteudo).await?;
    Ok(caminho)
}

#[derive(Clone)]
pub struct CleanupService {
    pool: SqlitePool,
    finance_repo: FinanceRepository,
    client_repo: ClientRepository,
    schedule_repo: ScheduleRepository,
    workshop_repo: WorkshopRepository,
    backup_dir: PathBuf,
}

impl CleanupService {
    pub fn new(
        pool: SqlitePool,
        finance_repo: FinanceRepository,
        client_repo: ClientRepository,
        schedule_repo: ScheduleRepository,
        workshop_repo: WorkshopRepository,
        backup_dir: PathBuf,
    ) -> Self {
        Self {
            pool,
            finance_repo,
            client_repo,
            schedule_repo,
            workshop_repo,
            backup_dir,
        }
    }

    /// Contagem de registros por tabela elegível.
    pub async fn list_records(&self) -> Result<Vec<TableCount>, AppError> {
        let mut contagens = Vec::with_capacity(CleanupTable::TODAS.len());
        for tabela in CleanupTable::TODAS {
            let registros = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM {}",
                tabela.as_str()
            ))
            .fetch_one(&self.pool)
            .await?;
            contagens.push(TableCount {
                tabela: tabela.as_str().to_string(),
                registros,
            });
        }
        Ok(contagens)
    }

    /// Expurga as tabelas pedidas, com backup por tabela antes do DELETE.
    pub async fn delete_records(
        &self,
        tabelas: &[String],
        confirm: bool,
    ) -> Result<Vec<TableCleanupResult>, AppError> {
        if !confirm {
            return Err(AppError::ConfirmationRequired);
        }
        if tabelas.is_empty() {
            return Err(AppError::MissingField("tabelas"));
        }

        let mut pedidas = Vec::with_capacity(tabelas.len());
        for nome in tabelas {
            pedidas.push(CleanupTable::parse(nome)?);
        }

        let mut resultados = Vec::new();
        for tabela in CleanupTable::TODAS {
            if !pedidas.contains(&tabela) {
                continue;
            }

            let linhas = self.snapshot(tabela).await?;
            let total = linhas.as_array().map(|a| a.len()).unwrap_or(0);
            let backup = if total > 0 {
                Some(escrever_backup(&self.backup_dir, tabela.as_str(), &linhas).await?)
            } else {
                None
            };

            let removidos = sqlx::query(&format!("DELETE FROM {}", tabela.as_str()))
                .execute(&self.pool)
                .await?
                .rows_affected();

            tracing::info!(
                "🧹 Tabela {}: {} registro(s) removido(s)",
                tabela.as_str(),
                removidos
            );
            resultados.push(TableCleanupResult {
                tabela: tabela.as_str().to_string(),
                removidos,
                backup: backup.map(|p| p.display().to_string()),
            });
        }
        Ok(resultados)
    }

    async fn snapshot(&self, tabela: CleanupTable) -> Result<Value, AppError> {
        let valor = match tabela {
            CleanupTable::Clientes => serde_json::to_value(self.client_repo.list_all().await?),
            CleanupTable::Agendamentos => {
                serde_json::to_value(self.schedule_repo.list_all().await?)
            }
            CleanupTable::Orcamentos => {
                serde_json::to_value(self.workshop_repo.list_all_quotes().await?)
            }
            CleanupTable::OrdensServico => {
                serde_json::to_value(self.workshop_repo.list_all_orders().await?)
            }
            CleanupTable::Transacoes => serde_json::to_value(
                self.finance_repo
                    .list_filtered(&self.pool, None, None)
                    .await?,
            ),
            CleanupTable::PagamentosParciais => {
                serde_json::to_value(self.finance_repo.list_partials_all(&self.pool).await?)
            }
        }
        .map_err(anyhow::Error::from)?;
        Ok(valor)
    }
}
