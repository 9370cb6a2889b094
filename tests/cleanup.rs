// Testes do fluxo administrativo: login/logout, guard de limpeza e o
// contrato "backup antes de apagar".

mod support;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::SqlitePool;

use support::{SEGREDO_CLEANUP, SENHA_ADMIN, corpo_json, montar_app, requisicao};

async fn contar(pool: &SqlitePool, tabela: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {tabela}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn criar_transacao(app: &support::TestApp, tipo: &str, valor: f64) -> i64 {
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro",
        Some(json!({ "tipo": tipo, "valor": valor, "data": "2026-01-10" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    corpo_json(resposta).await["id"].as_i64().unwrap()
}

fn arquivos_de_backup(app: &support::TestApp, tabela: &str) -> Vec<std::path::PathBuf> {
    let prefixo = format!("{tabela}-");
    let mut arquivos: Vec<_> = std::fs::read_dir(app.backups.path())
        .map(|iter| {
            iter.filter_map(|entrada| entrada.ok())
                .map(|entrada| entrada.path())
                .filter(|caminho| {
                    caminho
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(&prefixo))
                })
                .collect()
        })
        .unwrap_or_default();
    arquivos.sort();
    arquivos
}

#[tokio::test]
async fn ciclo_de_sessao_de_administrador() {
    let app = montar_app().await;

    // Senha errada: 403.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/admin/login",
        Some(json!({ "senha": "chute" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::FORBIDDEN);

    // Login de verdade.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/admin/login",
        Some(json!({ "senha": SENHA_ADMIN })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let corpo = corpo_json(resposta).await;
    let token = corpo["token"].as_str().unwrap().to_string();
    let bearer = format!("Bearer {token}");

    let resposta = requisicao(
        &app.router,
        "GET",
        "/api/admin/status",
        None,
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(corpo_json(resposta).await["autenticado"], true);

    // Logout revoga a sessão no servidor; o token assinado deixa de valer.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/admin/logout",
        None,
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);

    let resposta = requisicao(
        &app.router,
        "GET",
        "/api/admin/status",
        None,
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(corpo_json(resposta).await["autenticado"], false);

    let resposta = requisicao(
        &app.router,
        "GET",
        "/api/cleanup/list-records",
        None,
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn limpeza_exige_admin_e_confirmacao() {
    let app = montar_app().await;
    criar_transacao(&app, "receber", 100.0).await;

    // Sem credencial nenhuma: o guard barra com 403.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/cleanup/delete-records",
        Some(json!({ "tabelas": ["transacoes"], "confirm": true })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::FORBIDDEN);

    // Com o segredo mas sem confirm: 400 e nada apagado.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/cleanup/delete-records",
        Some(json!({ "tabelas": ["transacoes"] })),
        &[("x-admin-secret", SEGREDO_CLEANUP)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 1);
    assert!(arquivos_de_backup(&app, "transacoes").is_empty());

    // Tabela fora da lista permitida: 400.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/cleanup/delete-records",
        Some(json!({ "tabelas": ["sqlite_master"], "confirm": true })),
        &[("x-admin-secret", SEGREDO_CLEANUP)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 1);
}

#[tokio::test]
async fn limpeza_grava_backup_com_as_linhas_apagadas() {
    let app = montar_app().await;
    let id = criar_transacao(&app, "receber", 350.0).await;

    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/cleanup/delete-records",
        Some(json!({ "tabelas": ["transacoes"], "confirm": true })),
        &[("x-admin-secret", SEGREDO_CLEANUP)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let resultados = corpo_json(resposta).await;
    assert_eq!(resultados[0]["tabela"], "transacoes");
    assert_eq!(resultados[0]["removidos"], 1);

    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 0);

    // O backup contém exatamente as linhas removidas.
    let arquivos = arquivos_de_backup(&app, "transacoes");
    assert_eq!(arquivos.len(), 1);
    let conteudo: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&arquivos[0]).unwrap()).unwrap();
    let linhas = conteudo.as_array().unwrap();
    assert_eq!(linhas.len(), 1);
    assert_eq!(linhas[0]["id"], id);
    assert_eq!(linhas[0]["valor"], 350.0);
}

#[tokio::test]
async fn contagem_de_registros_por_tabela() {
    let app = montar_app().await;
    criar_transacao(&app, "receber", 10.0).await;
    criar_transacao(&app, "pagar", 20.0).await;

    let resposta = requisicao(
        &app.router,
        "GET",
        "/api/cleanup/list-records",
        None,
        &[("x-admin-secret", SEGREDO_CLEANUP)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let contagens = corpo_json(resposta).await;
    let transacoes = contagens
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["tabela"] == "transacoes")
        .unwrap();
    assert_eq!(transacoes["registros"], 2);
}

#[tokio::test]
async fn cleanup_financeiro_filtra_por_tipo() {
    let app = montar_app().await;
    criar_transacao(&app, "pagar", 50.0).await;
    criar_transacao(&app, "pagar", 60.0).await;
    let id_receber = criar_transacao(&app, "receber", 70.0).await;

    // Login de administrador (caminho por sessão, não pelo segredo).
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/admin/login",
        Some(json!({ "senha": SENHA_ADMIN })),
        &[],
    )
    .await;
    let token = corpo_json(resposta).await["token"].as_str().unwrap().to_string();
    let bearer = format!("Bearer {token}");

    // Sem confirmação: 400, nada muda.
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro/cleanup",
        Some(json!({ "tipo": "pagar" })),
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 3);

    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro/cleanup",
        Some(json!({ "tipo": "pagar", "confirm": true })),
        &[("authorization", &bearer)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let corpo = corpo_json(resposta).await;
    assert_eq!(corpo["removidos"], 2);
    assert!(corpo["backup"].is_string());

    // Só a transação a receber sobrevive.
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 1);
    let restante: i64 = sqlx::query_scalar("SELECT id FROM transacoes")
        .fetch_one(&app.state.db_pool)
        .await
        .unwrap();
    assert_eq!(restante, id_receber);

    let arquivos = arquivos_de_backup(&app, "transacoes");
    assert_eq!(arquivos.len(), 1);
    let conteudo: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&arquivos[0]).unwrap()).unwrap();
    assert_eq!(conteudo.as_array().unwrap().len(), 2);
    assert!(
        conteudo
            .as_array()
            .unwrap()
            .iter()
            .all(|linha| linha["tipo"] == "pagar")
    );
}

#[tokio::test]
async fn delete_unitario_exige_admin_e_grava_backup() {
    let app = montar_app().await;
    let id = criar_transacao(&app, "receber", 99.0).await;

    // Sem credencial: 403, linha intacta.
    let resposta = requisicao(
        &app.router,
        "DELETE",
        &format!("/api/financeiro/{id}"),
        None,
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::FORBIDDEN);
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 1);

    let resposta = requisicao(
        &app.router,
        "DELETE",
        &format!("/api/financeiro/{id}"),
        None,
        &[("x-admin-secret", SEGREDO_CLEANUP)],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    assert_eq!(contar(&app.state.db_pool, "transacoes").await, 0);

    let arquivos = arquivos_de_backup(&app, "transacoes");
    assert_eq!(arquivos.len(), 1);
    let conteudo: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&arquivos[0]).unwrap()).unwrap();
    assert_eq!(conteudo.as_array().unwrap()[0]["id"], id);
}
