//! SQLite persistence (infrastructure).

pub mod database;
pub mod repository;

pub use database::{DB_PATH_ENV, Database, TableCounts};
pub use repository::{BeneficiaryRepository, DbConn, ProjectRepository, UserRepository};
