pub mod admin_service;
pub use admin_service::AdminService;
pub mod cleanup_service;
pub use cleanup_service::CleanupService;
pub mod finance_service;
pub use finance_service::FinanceService;
