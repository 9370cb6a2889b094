pub mod admin_repo;
pub use admin_repo::AdminRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod schedule_repo;
pub use schedule_repo::ScheduleRepository;
pub mod storage_repo;
pub use storage_repo::StorageRepository;
pub mod workshop_repo;
pub use workshop_repo::WorkshopRepository;
