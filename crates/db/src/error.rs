//! Error taxonomy of the record store.

use thiserror::Error;

use crate::record::RecordId;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the store when registering schemas or persisting rows.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown table '{table}'")]
    UnknownTable { table: String },

    #[error("table '{table}' is already registered with a different schema")]
    SchemaConflict { table: String },

    #[error("{table}.{field}: value is required")]
    MissingField { table: String, field: String },

    #[error("{table}.{field}: no such field")]
    UnknownField { table: String, field: String },

    #[error("{table}.{field}: expected {expected}")]
    InvalidType {
        table: String,
        field: String,
        expected: &'static str,
    },

    #[error("{table}.{field}: ensure this value has at most {max_length} characters (it has {actual})")]
    TooLong {
        table: String,
        field: String,
        max_length: usize,
        actual: usize,
    },

    #[error("{table}.{field}: enter a valid date: {reason}")]
    InvalidDate {
        table: String,
        field: String,
        reason: String,
    },

    #[error("{table}.{field}: enter a valid URL: {reason}")]
    InvalidUrl {
        table: String,
        field: String,
        reason: String,
    },

    #[error("{table} record {id} not found")]
    NotFound { table: String, id: RecordId },

    #[error("table '{table}' has no keys left to assign")]
    KeySpaceExhausted { table: String },

    #[error("row is not a JSON object")]
    NotAnObject,

    #[error("{0}")]
    InvalidData(String),

    #[error("database failed its integrity check: {report}")]
    Corrupt { report: String },

    #[error("database error")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode or decode record")]
    Serde(#[from] serde_json::Error),

    #[error("database file i/o failed")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Field the error refers to, for errors raised by field validation
    pub fn field(&self) -> Option<&str> {
        match self {
            StoreError::MissingField { field, .. }
            | StoreError::UnknownField { field, .. }
            | StoreError::InvalidType { field, .. }
            | StoreError::TooLong { field, .. }
            | StoreError::InvalidDate { field, .. }
            | StoreError::InvalidUrl { field, .. } => Some(field),
            _ => None,
        }
    }
}
