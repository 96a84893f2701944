//! Store error types.

use fresh_core::CoreError;

/// Errors raised by table catalog and metadata store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No value is stored under the key. Callers treat this as "absent".
    #[error("No metadata key '{key}' in table '{table}'")]
    NotFound { table: String, key: String },

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A lock guarding backend state was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,

    /// A table layout was rejected on creation.
    #[error(transparent)]
    InvalidLayout(#[from] CoreError),

    /// I/O error preparing the database file location.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether this error only signals an absent key.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
