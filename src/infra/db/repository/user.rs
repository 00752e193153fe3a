use super::{DbConn, Repository, lock};
use crate::domain::User;
use anyhow::{Context, Result};

/// Read access to login accounts.
pub struct UserRepository {
    conn: DbConn,
}

impl Repository for UserRepository {}

impl UserRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// True when a row matches both fields exactly (case-sensitive).
    pub fn credentials_match(&self, username: &str, password: &str) -> Result<bool> {
        let conn = lock(&self.conn)?;
        let mut stmt =
            conn.prepare("SELECT 1 FROM users WHERE username = ?1 AND password = ?2 LIMIT 1")?;
        let found = stmt
            .exists((username, password))
            .context("look up credentials")?;
        Ok(found)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = lock(&self.conn)?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn insert(&self, user: &User) -> Result<()> {
        let conn = lock(&self.conn)?;
        conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            (&user.username, &user.password),
        )
        .context("insert user")?;
        Ok(())
    }
}
