//! SQLite connection provisioning and schema bootstrap entry points.
//!
//! # Responsibility
//! - Open and configure one SQLite connection per data-access
//!   operation.
//! - Apply the versioned schema before any application data is
//!   touched.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repository code never sees a connection whose schema bootstrap
//!   did not succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, Database};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to obtain a usable connection.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
