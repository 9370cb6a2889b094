// Infra compartilhada dos testes de integração: pool SQLite em memória com
// as migrações aplicadas, diretório temporário de backups e o router real.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

use negocar_backend::{AppState, MIGRATOR, build_router, config::Config};

pub const SENHA_ADMIN: &str = "oficina-teste";
pub const SEGREDO_CLEANUP: &str = "segredo-cleanup";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Mantém o diretório de backups vivo enquanto o teste roda.
    pub backups: TempDir,
}

pub async fn montar_app() -> TestApp {
    // Uma conexão só: com mais de uma, cada conexão veria um ":memory:"
    // diferente.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool sqlite em memória");
    MIGRATOR.run(&pool).await.expect("migrações de teste");

    let backups = TempDir::new().expect("tempdir de backups");
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "segredo-de-teste".to_string(),
        // Custo mínimo: hash rápido é suficiente para testes.
        admin_password_hash: bcrypt::hash(SENHA_ADMIN, 4).expect("hash de teste"),
        admin_session_hours: 1,
        cleanup_secret: Some(SEGREDO_CLEANUP.to_string()),
        backup_dir: backups.path().to_path_buf(),
    };
    let state = AppState::with_pool(pool, config);

    TestApp {
        router: build_router(state.clone()),
        state,
        backups,
    }
}

pub async fn requisicao(
    router: &Router,
    metodo: &str,
    caminho: &str,
    corpo: Option<serde_json::Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(metodo).uri(caminho);
    for (nome, valor) in headers {
        builder = builder.header(*nome, *valor);
    }
    let request = match corpo {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    router.clone().oneshot(request).await.unwrap()
}

pub async fn corpo_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
