//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define storage contracts for the local snapshot and hosted profiles.
//! - Keep SQL and JSON blob details inside the persistence boundary.
//!
//! # Invariants
//! - Read paths reject undecodable persisted state instead of masking it;
//!   callers decide whether to fall back to defaults.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod profile_directory;
pub mod snapshot_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by snapshot and directory storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored text could not be decoded.
    InvalidData(String),
    /// A value could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode value for storage: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    /// Whether the error comes from stored content rather than transport.
    pub fn is_malformed_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }
}
