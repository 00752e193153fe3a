//! Repository implementations for data access in the registry.
//!
//! Each call takes the connection for a single statement and releases it
//! before returning. None of them validate; callers run the validation gate
//! first.

mod beneficiary;
mod project;
mod user;

pub use beneficiary::BeneficiaryRepository;
pub use project::ProjectRepository;
pub use user::UserRepository;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

pub type DbConn = Arc<Mutex<Connection>>;

/// Marker trait for repository types.
///
/// Every repository is constructed from a [`DbConn`] and scopes its lock to
/// one statement.
pub trait Repository {}

pub(super) fn lock(conn: &DbConn) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| anyhow!("database lock poisoned"))
}

/// Read a nullable text column, folding blank values into `None`.
pub(super) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
