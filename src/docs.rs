// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Agendamentos ---
        handlers::schedule::list_appointments,
        handlers::schedule::create_appointment,
        handlers::schedule::update_appointment,
        handlers::schedule::delete_appointment,

        // --- Orçamentos ---
        handlers::quotes::list_quotes,
        handlers::quotes::create_quote,
        handlers::quotes::update_quote,
        handlers::quotes::delete_quote,

        // --- Ordens de Serviço ---
        handlers::service_orders::list_orders,
        handlers::service_orders::create_order,
        handlers::service_orders::update_order,
        handlers::service_orders::delete_order,

        // --- Storage ---
        handlers::storage::list_entries,
        handlers::storage::get_entry,
        handlers::storage::upsert_entry,
        handlers::storage::delete_entry,
        handlers::storage::clear_entries,

        // --- Financeiro ---
        handlers::finance::list_transactions,
        handlers::finance::get_transaction,
        handlers::finance::create_transaction,
        handlers::finance::update_transaction,
        handlers::finance::list_partial_payments,
        handlers::finance::register_partial_payment,
        handlers::finance::delete_transaction,
        handlers::finance::cleanup_transactions,

        // --- Admin ---
        handlers::admin::login,
        handlers::admin::logout,
        handlers::admin::status,

        // --- Cleanup ---
        handlers::cleanup::list_records,
        handlers::cleanup::delete_records,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::crm::Client,
            handlers::clients::ClientPayload,

            // --- Agendamentos ---
            models::schedule::Appointment,
            handlers::schedule::AppointmentPayload,

            // --- Oficina ---
            models::workshop::Quote,
            models::workshop::ServiceOrder,
            handlers::quotes::QuotePayload,
            handlers::service_orders::ServiceOrderPayload,

            // --- Storage ---
            models::storage::StorageEntry,
            handlers::storage::StoragePayload,

            // --- Financeiro ---
            models::finance::TransactionKind,
            models::finance::TransactionStatus,
            models::finance::Transaction,
            models::finance::PartialPayment,
            models::finance::CreateTransactionPayload,
            models::finance::UpdateTransactionPayload,
            models::finance::RegisterPartialPayload,
            models::finance::FinanceCleanupPayload,
            models::finance::FinanceCleanupResponse,
            handlers::finance::PartialPaymentResponse,

            // --- Admin ---
            models::admin::LoginPayload,
            models::admin::LoginResponse,
            models::admin::StatusResponse,

            // --- Cleanup ---
            handlers::cleanup::DeleteRecordsPayload,
            services::cleanup_service::TableCount,
            services::cleanup_service::TableCleanupResult,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de clientes e seus veículos"),
        (name = "Agendamentos", description = "Agenda de atendimentos da oficina"),
        (name = "Orçamentos", description = "Propostas de serviços e peças"),
        (name = "Ordens de Serviço", description = "Execução dos orçamentos aprovados"),
        (name = "Storage", description = "Armazenamento genérico chave/valor"),
        (name = "Financeiro", description = "Contas a receber/pagar, parcelas e limpeza com backup"),
        (name = "Admin", description = "Sessões de administrador"),
        (name = "Cleanup", description = "Expurgo administrativo com backup prévio")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
