//src/lib.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::AppState;

/// Migrações embutidas no binário. Rodam no boot e nos testes de integração.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Monta o router completo da API sobre um `AppState` já construído.
pub fn build_router(app_state: AppState) -> Router {
    let clientes_routes = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/{id}",
            put(handlers::clients::update_client).delete(handlers::clients::delete_client),
        );

    let agendamentos_routes = Router::new()
        .route(
            "/",
            get(handlers::schedule::list_appointments).post(handlers::schedule::create_appointment),
        )
        .route(
            "/{id}",
            put(handlers::schedule::update_appointment)
                .delete(handlers::schedule::delete_appointment),
        );

    let orcamentos_routes = Router::new()
        .route(
            "/",
            get(handlers::quotes::list_quotes).post(handlers::quotes::create_quote),
        )
        .route(
            "/{id}",
            put(handlers::quotes::update_quote).delete(handlers::quotes::delete_quote),
        );

    let ordens_routes = Router::new()
        .route(
            "/",
            get(handlers::service_orders::list_orders).post(handlers::service_orders::create_order),
        )
        .route(
            "/{id}",
            put(handlers::service_orders::update_order)
                .delete(handlers::service_orders::delete_order),
        );

    let storage_routes = Router::new()
        .route(
            "/",
            get(handlers::storage::list_entries)
                .post(handlers::storage::upsert_entry)
                .delete(handlers::storage::clear_entries),
        )
        .route(
            "/{chave}",
            get(handlers::storage::get_entry).delete(handlers::storage::delete_entry),
        );

    // O DELETE unitário e o cleanup em massa checam a autorização de admin
    // dentro do handler (precisam responder 403 com o envelope padrão).
    let financeiro_routes = Router::new()
        .route(
            "/",
            get(handlers::finance::list_transactions).post(handlers::finance::create_transaction),
        )
        .route("/cleanup", post(handlers::finance::cleanup_transactions))
        .route(
            "/{id}",
            get(handlers::finance::get_transaction)
                .put(handlers::finance::update_transaction)
                .delete(handlers::finance::delete_transaction),
        )
        .route(
            "/{id}/pagamentos",
            get(handlers::finance::list_partial_payments)
                .post(handlers::finance::register_partial_payment),
        );

    let admin_routes = Router::new()
        .route("/login", post(handlers::admin::login))
        .route("/logout", post(handlers::admin::logout))
        .route("/status", get(handlers::admin::status));

    let cleanup_routes = Router::new()
        .route("/list-records", get(handlers::cleanup::list_records))
        .route("/delete-records", post(handlers::cleanup::delete_records))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::admin::admin_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/clientes", clientes_routes)
        .nest("/api/agendamentos", agendamentos_routes)
        .nest("/api/orcamentos", orcamentos_routes)
        .nest("/api/ordens-servico", ordens_routes)
        .nest("/api/storage", storage_routes)
        .nest("/api/financeiro", financeiro_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/cleanup", cleanup_routes)
        .with_state(app_state)
}
