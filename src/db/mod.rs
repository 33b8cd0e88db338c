pub mod attempts;
pub mod problems;
pub mod schema;
pub mod series;
pub mod subjects;
pub mod transfer;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::validation::ValidationError;

// Re-export all public items from submodules
pub use attempts::*;
pub use problems::*;
pub use schema::run_migrations;
pub use series::*;
pub use subjects::*;
pub use transfer::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Error taxonomy for every store operation.
///
/// `Duplicate` is always recoverable and surfaced to the caller, never
/// retried (retrying with the same input repeats the conflict).
#[derive(Debug)]
pub enum StoreError {
    /// Unique constraint violation (name, problem key, attempt_no, done_date)
    Duplicate(String),
    /// Input rejected before reaching the store
    Invalid(String),
    /// Update on a row that no longer exists
    NotFound(&'static str),
    /// Database mutex poisoned
    Locked,
    /// Everything else, propagated
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate(msg) => write!(f, "duplicate key: {}", msg),
            Self::Invalid(msg) => write!(f, "invalid input: {}", msg),
            Self::NotFound(what) => write!(f, "{} not found", what),
            Self::Locked => write!(f, "database unavailable"),
            Self::Sqlite(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        // The unique indexes are the real safety net for duplicate keys;
        // surface their violations under the same taxonomy as pre-checks.
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Self::Duplicate(msg.unwrap_or_else(|| "unique constraint violated".to_string()))
            }
            other => Self::Sqlite(other),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err.0)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> StoreResult<MutexGuard<'_, Connection>> {
    pool.lock().map_err(|_: PoisonError<_>| {
        tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
        StoreError::Locked
    })
}

pub fn init_db(path: &Path) -> StoreResult<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    // Create backup before migrations if database exists
    if path.exists() {
        let backup_path = path.with_extension("db.backup");
        if let Err(e) = std::fs::copy(path, &backup_path) {
            tracing::warn!("Could not create database backup: {}", e);
        }
    }

    let conn = Connection::open(path)?;
    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Default tax-law subjects; seeded only into an empty table.
const DEFAULT_SUBJECTS: [&str; 5] = ["消費税法", "所得税法", "法人税法", "住民税", "国税徴収法"];

pub fn seed_default_subjects(conn: &Connection) -> StoreResult<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM subjects", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    for name in DEFAULT_SUBJECTS {
        subjects::insert_subject(conn, name)?;
    }
    Ok(())
}
