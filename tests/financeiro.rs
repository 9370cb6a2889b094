// Testes de integração do módulo financeiro: liquidação sequencial de
// parcelas, heurísticas de duplicata, normalização na borda da API e baixas
// parciais.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::SqlitePool;

use support::{corpo_json, montar_app, requisicao};

async fn contar_transacoes(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transacoes")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn status_da_parcela(pool: &SqlitePool, grupo: &str, numero: i64) -> String {
    sqlx::query_scalar(
        "SELECT status FROM transacoes WHERE grupo_parcelamento_id = ? AND numero_parcela = ?",
    )
    .bind(grupo)
    .bind(numero)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn id_da_parcela(pool: &SqlitePool, grupo: &str, numero: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT id FROM transacoes WHERE grupo_parcelamento_id = ? AND numero_parcela = ?",
    )
    .bind(grupo)
    .bind(numero)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn parcela(grupo: &str, numero: i64, total: i64) -> serde_json::Value {
    json!({
        "descricao": format!("Orçamento 123 - Parcela {numero}"),
        "tipo": "receber",
        "valor": 1000,
        "data": "2026-01-15",
        "vencimento": format!("2026-0{}-01", numero + 1),
        "numeroParcela": numero,
        "totalParcelas": total,
        "grupoParcelamentoId": grupo,
    })
}

#[tokio::test]
async fn parcela_so_liquida_depois_da_anterior() {
    let app = montar_app().await;
    let grupo = "grupo-seq";

    for numero in 1..=3 {
        let resposta = requisicao(
            &app.router,
            "POST",
            "/api/financeiro",
            Some(parcela(grupo, numero, 3)),
            &[],
        )
        .await;
        assert_eq!(resposta.status(), StatusCode::CREATED);
    }

    let id1 = id_da_parcela(&app.state.db_pool, grupo, 1).await;
    let id2 = id_da_parcela(&app.state.db_pool, grupo, 2).await;
    let id3 = id_da_parcela(&app.state.db_pool, grupo, 3).await;

    // Parcela 2 antes da 1: conflito, e nada muda no banco.
    let resposta = requisicao(
        &app.router,
        "PUT",
        &format!("/api/financeiro/{id2}"),
        Some(json!({ "status": "pago" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CONFLICT);
    let corpo = corpo_json(resposta).await;
    assert_eq!(corpo["parcelaAnterior"], 1);
    assert_eq!(corpo["statusAnterior"], "aberto");
    assert_eq!(status_da_parcela(&app.state.db_pool, grupo, 2).await, "aberto");

    // Parcela 1 liquida normalmente.
    let resposta = requisicao(
        &app.router,
        "PUT",
        &format!("/api/financeiro/{id1}"),
        Some(json!({ "status": "pago", "dataPagamento": "05/02/2026" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    assert_eq!(status_da_parcela(&app.state.db_pool, grupo, 1).await, "pago");

    // Parcela 3 continua travada pela 2.
    let resposta = requisicao(
        &app.router,
        "PUT",
        &format!("/api/financeiro/{id3}"),
        Some(json!({ "status": "pago" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CONFLICT);

    // Agora a 2 passa.
    let resposta = requisicao(
        &app.router,
        "PUT",
        &format!("/api/financeiro/{id2}"),
        Some(json!({ "status": "pago" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::OK);
    assert_eq!(status_da_parcela(&app.state.db_pool, grupo, 2).await, "pago");
}

#[tokio::test]
async fn id_customizado_repetido_devolve_a_linha_existente() {
    let app = montar_app().await;
    let corpo = json!({
        "id": 1765335128730_i64,
        "tipo": "receber",
        "valor": "R$ 450,00",
        "data": "01/02/2026",
    });

    let resposta = requisicao(&app.router, "POST", "/api/financeiro", Some(corpo.clone()), &[]).await;
    assert_eq!(resposta.status(), StatusCode::CREATED);

    // Retry do front com o mesmo id: devolve a linha já gravada.
    let resposta = requisicao(&app.router, "POST", "/api/financeiro", Some(corpo), &[]).await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let devolvida = corpo_json(resposta).await;
    assert_eq!(devolvida["id"], 1765335128730_i64);

    assert_eq!(contar_transacoes(&app.state.db_pool).await, 1);
}

#[tokio::test]
async fn transacao_avulsa_nao_duplica_por_orcamento() {
    let app = montar_app().await;

    // Cliente e orçamento de apoio (as FKs estão ligadas em produção).
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/clientes",
        Some(json!({ "id": 10, "nome": "João" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/orcamentos",
        Some(json!({ "id": 55, "clienteId": 10, "total": 450, "data": "2026-02-01" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);

    let avulsa = json!({
        "orcamentoId": 55,
        "clienteId": 10,
        "tipo": "receber",
        "valor": 450,
        "data": "2026-02-01",
    });
    let resposta = requisicao(&app.router, "POST", "/api/financeiro", Some(avulsa.clone()), &[]).await;
    assert_eq!(resposta.status(), StatusCode::CREATED);

    // Segunda avulsa para o mesmo orçamento: devolve a existente.
    let resposta = requisicao(&app.router, "POST", "/api/financeiro", Some(avulsa), &[]).await;
    assert_eq!(resposta.status(), StatusCode::OK);
    assert_eq!(contar_transacoes(&app.state.db_pool).await, 1);

    // Parcelas do mesmo orçamento passam direto pela heurística.
    for numero in 1..=2 {
        let resposta = requisicao(
            &app.router,
            "POST",
            "/api/financeiro",
            Some(json!({
                "orcamentoId": 55,
                "clienteId": 10,
                "tipo": "receber",
                "valor": 225,
                "data": "2026-02-01",
                "numeroParcela": numero,
                "totalParcelas": 2,
                "grupoParcelamentoId": "grupo-55",
            })),
            &[],
        )
        .await;
        assert_eq!(resposta.status(), StatusCode::CREATED);
    }
    assert_eq!(contar_transacoes(&app.state.db_pool).await, 3);
}

#[tokio::test]
async fn valores_e_datas_formatados_sao_normalizados() {
    let app = montar_app().await;

    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro",
        Some(json!({
            "tipo": "pagar",
            "valor": "R$ 1.234,56",
            "data": "31/12/2025",
            "vencimento": "31/12/2025",
            "fornecedor": "Auto Peças Silva",
        })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    let criada = corpo_json(resposta).await;
    assert_eq!(criada["valor"], 1234.56);
    assert_eq!(criada["vencimento"], "2025-12-31");

    let valor: f64 = sqlx::query_scalar("SELECT valor FROM transacoes")
        .fetch_one(&app.state.db_pool)
        .await
        .unwrap();
    assert_eq!(valor, 1234.56);
    let data: String = sqlx::query_scalar("SELECT data FROM transacoes")
        .fetch_one(&app.state.db_pool)
        .await
        .unwrap();
    assert_eq!(data, "2025-12-31");
}

#[tokio::test]
async fn criacao_valida_campos_obrigatorios() {
    let app = montar_app().await;

    let casos = [
        json!({ "valor": 10, "data": "2026-01-01" }),            // sem tipo
        json!({ "tipo": "receber", "data": "2026-01-01" }),      // sem valor
        json!({ "tipo": "receber", "valor": 0, "data": "2026-01-01" }), // valor zero
        json!({ "tipo": "receber", "valor": 10 }),               // sem data
        json!({ "tipo": "receber", "valor": 10, "data": "ontem" }), // data ilegível
    ];

    for caso in casos {
        let resposta = requisicao(&app.router, "POST", "/api/financeiro", Some(caso), &[]).await;
        assert_eq!(resposta.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(contar_transacoes(&app.state.db_pool).await, 0);
}

#[tokio::test]
async fn baixas_parciais_acumulam_ate_liquidar() {
    let app = montar_app().await;

    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro",
        Some(json!({ "tipo": "receber", "valor": 1000, "data": "2026-01-10" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    let id = corpo_json(resposta).await["id"].as_i64().unwrap();

    let resposta = requisicao(
        &app.router,
        "POST",
        &format!("/api/financeiro/{id}/pagamentos"),
        Some(json!({ "valorPago": "400,00", "dataPagamento": "15/01/2026" })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    let corpo = corpo_json(resposta).await;
    assert_eq!(corpo["transacao"]["status"], "parcial");
    assert_eq!(corpo["transacao"]["valorPago"], 400.0);

    let resposta = requisicao(
        &app.router,
        "POST",
        &format!("/api/financeiro/{id}/pagamentos"),
        Some(json!({ "valorPago": 600 })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);
    let corpo = corpo_json(resposta).await;
    assert_eq!(corpo["transacao"]["status"], "pago");
    assert!(corpo["transacao"]["dataPagamento"].is_string());

    // Transação liquidada não aceita mais baixas.
    let resposta = requisicao(
        &app.router,
        "POST",
        &format!("/api/financeiro/{id}/pagamentos"),
        Some(json!({ "valorPago": 1 })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CONFLICT);

    let pagamentos: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pagamentos_parciais WHERE transacao_id = ?",
    )
    .bind(id)
    .fetch_one(&app.state.db_pool)
    .await
    .unwrap();
    assert_eq!(pagamentos, 2);
}

#[tokio::test]
async fn listagem_vira_vencidas_para_atrasado() {
    let app = montar_app().await;

    let resposta = requisicao(
        &app.router,
        "POST",
        "/api/financeiro",
        Some(json!({
            "tipo": "receber",
            "valor": 100,
            "data": "2020-01-01",
            "vencimento": "2020-02-01",
        })),
        &[],
    )
    .await;
    assert_eq!(resposta.status(), StatusCode::CREATED);

    let resposta = requisicao(&app.router, "GET", "/api/financeiro", None, &[]).await;
    assert_eq!(resposta.status(), StatusCode::OK);
    let lista = corpo_json(resposta).await;
    assert_eq!(lista[0]["status"], "atrasado");
}
