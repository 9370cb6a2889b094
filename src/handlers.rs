pub mod admin;
pub mod cleanup;
pub mod clients;
pub mod finance;
pub mod quotes;
pub mod schedule;
pub mod service_orders;
pub mod storage;
