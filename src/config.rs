// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{
    db::{
        AdminRepository, ClientRepository, FinanceRepository, ScheduleRepository,
        StorageRepository, WorkshopRepository,
    },
    services::{AdminService, CleanupService, FinanceService},
};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub admin_password_hash: String,
    pub admin_session_hours: i64,
    pub cleanup_secret: Option<String>,
    pub backup_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:negocar.db".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let admin_password_hash =
            env::var("ADMIN_PASSWORD_HASH").context("ADMIN_PASSWORD_HASH deve ser definido")?;
        let admin_session_hours = env::var("ADMIN_SESSION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);
        let cleanup_secret = env::var("CLEANUP_SECRET").ok().filter(|s| !s.is_empty());
        let backup_dir = env::var("BACKUP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("backups"));

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            admin_password_hash,
            admin_session_hours,
            cleanup_secret,
            backup_dir,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub client_repo: ClientRepository,
    pub schedule_repo: ScheduleRepository,
    pub workshop_repo: WorkshopRepository,
    pub storage_repo: StorageRepository,
    pub finance_service: FinanceService,
    pub admin_service: AdminService,
    pub cleanup_service: CleanupService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        // Uma conexão só: o sistema inteiro fala com o banco por uma única
        // conexão, e a fila da pool serializa as janelas de checar-e-agir
        // das heurísticas de duplicata/sequenciamento.
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre uma pool já aberta.
    /// Os testes de integração entram por aqui com uma pool em memória.
    pub fn with_pool(db_pool: SqlitePool, config: Config) -> Self {
        let client_repo = ClientRepository::new(db_pool.clone());
        let schedule_repo = ScheduleRepository::new(db_pool.clone());
        let workshop_repo = WorkshopRepository::new(db_pool.clone());
        let storage_repo = StorageRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new();
        let admin_repo = AdminRepository::new(db_pool.clone());

        let finance_service = FinanceService::new(
            finance_repo.clone(),
            db_pool.clone(),
            config.backup_dir.clone(),
        );
        let admin_service = AdminService::new(
            admin_repo,
            config.jwt_secret.clone(),
            config.admin_password_hash.clone(),
            config.admin_session_hours,
            config.cleanup_secret.clone(),
        );
        let cleanup_service = CleanupService::new(
            db_pool.clone(),
            finance_repo,
            client_repo.clone(),
            schedule_repo.clone(),
            workshop_repo.clone(),
            config.backup_dir.clone(),
        );

        Self {
            db_pool,
            config,
            client_repo,
            schedule_repo,
            workshop_repo,
            storage_repo,
            finance_service,
            admin_service,
            cleanup_service,
        }
    }
}
