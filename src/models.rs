pub mod admin;
pub mod crm;
pub mod finance;
pub mod schedule;
pub mod storage;
pub mod workshop;
