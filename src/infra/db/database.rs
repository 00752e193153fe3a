//! SQLite database setup and connection management for the registry.
//! Handles path resolution, schema creation and the first-run seed.

use crate::domain::User;
use crate::infra::app_config::{self, AppConfig};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::repository::{BeneficiaryRepository, DbConn, ProjectRepository, UserRepository};

pub const DB_PATH_ENV: &str = "LIVELIHOOD_DB_PATH";
const DB_FILE_NAME: &str = "database.db";

/// Row counts per table, used by status reports and the reset tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub projects: i64,
    pub beneficiaries: i64,
}

/// Database wrapper that owns the SQLite connection
pub struct Database {
    conn: DbConn,
    path: Option<PathBuf>,
}

impl Database {
    /// Create or open the database at the default location
    pub fn open() -> Result<Self> {
        let config = app_config::load_config();
        Self::open_with(Self::resolve_path(&config), config.seed_admin)
    }

    /// Create an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        };
        db.init(true)?;
        Ok(db)
    }

    /// Create or open the database at a specific path
    pub fn open_at(path: PathBuf) -> Result<Self> {
        Self::open_with(path, true)
    }

    /// Like [`Database::open_at`], with control over the first-run admin seed.
    pub fn open_with(path: PathBuf, seed_admin: bool) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }

        let conn = Connection::open(&path)
            .with_context(|| format!("open database at {}", path.display()))?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        };
        db.init(seed_admin)?;
        log::debug!("Opened database at {}", db.describe());
        Ok(db)
    }

    /// Resolve the database location.
    ///
    /// Order: `LIVELIHOOD_DB_PATH`, the config file's `database_path`, then the
    /// platform data directory.
    pub fn default_path() -> PathBuf {
        Self::resolve_path(&app_config::load_config())
    }

    pub fn resolve_path(config: &AppConfig) -> PathBuf {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            return PathBuf::from(path);
        }

        if let Some(path) = &config.database_path {
            return path.clone();
        }

        app_config::app_data_dir().join(DB_FILE_NAME)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    /// Initialize database schema and seed the default account when empty.
    fn init(&self, seed_admin: bool) -> Result<()> {
        {
            let conn = self
                .conn
                .lock()
                .map_err(|_| anyhow!("database lock poisoned"))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Self::create_schema(&conn).context("create schema")?;
        }

        if seed_admin {
            let users = self.user_repo();
            if users.count()? == 0 {
                let admin = User::seed_admin();
                users.insert(&admin).context("seed default user")?;
                log::info!("Seeded default '{}' account", admin.username);
            }
        }

        Ok(())
    }

    /// Get a handle to the shared connection
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }

    pub fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.connection())
    }

    pub fn project_repo(&self) -> ProjectRepository {
        ProjectRepository::new(self.connection())
    }

    pub fn beneficiary_repo(&self) -> BeneficiaryRepository {
        BeneficiaryRepository::new(self.connection())
    }

    pub fn counts(&self) -> Result<TableCounts> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database lock poisoned"))?;
        let count = |table: &str| -> Result<i64> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("count {table}"))
        };
        Ok(TableCounts {
            users: count("users")?,
            projects: count("projects")?,
            beneficiaries: count("beneficiaries")?,
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT,
                password TEXT
            );

            CREATE TABLE IF NOT EXISTS projects (
                project_id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_name TEXT,
                category TEXT
            );

            CREATE TABLE IF NOT EXISTS beneficiaries (
                beneficiary_id INTEGER PRIMARY KEY AUTOINCREMENT,
                lname TEXT,
                fname TEXT,
                mname TEXT,
                suffix TEXT,
                gender TEXT,
                street TEXT,
                barangay TEXT,
                contactno TEXT,
                project_id INTEGER,
                FOREIGN KEY(project_id) REFERENCES projects(project_id)
            );

            CREATE INDEX IF NOT EXISTS idx_beneficiaries_project_id ON beneficiaries(project_id);
            CREATE INDEX IF NOT EXISTS idx_beneficiaries_names ON beneficiaries(lname, fname, mname, suffix);
            "#,
        )?;
        Ok(())
    }
}
