pub mod database_access;
pub mod points_db;

pub use database_access::Database;
