//! Registry error types.

use std::collections::BTreeMap;
use std::fmt::Write;

use fresh_core::{ColumnId, CoreError, FailureSet, VersionError};
use fresh_store::StoreError;
use thiserror::Error;

/// Errors from registry operations.
///
/// Validation failures never surface one at a time: a single-column
/// registration reports [`RegistryError::Validation`] with every failing
/// rule, a batch reports [`RegistryError::MultiValidation`] keyed by column.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// A record is missing a required field and cannot be encoded or validated.
    #[error("Invalid freshener record: missing required field '{0}'")]
    InvalidRecord(&'static str),

    /// Stored bytes do not decode to a freshener record.
    #[error("Malformed freshener record: {0}")]
    MalformedRecord(String),

    /// A record version is malformed or belongs to another protocol.
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("No freshener attached to column '{column}' in table '{table}'")]
    NoAttachment { table: String, column: ColumnId },

    #[error("There were validation failures.\n{failures}")]
    Validation {
        column: ColumnId,
        failures: FailureSet,
    },

    #[error("{}", describe_failures(.0))]
    MultiValidation(BTreeMap<ColumnId, FailureSet>),

    #[error("No freshness policy registered as '{0}'")]
    UnknownPolicy(String),

    #[error("No score function registered as '{0}'")]
    UnknownScoreFunction(String),

    /// A policy or score function rejected a configuration parameter during setup.
    #[error("Invalid value for parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TableNotFound(table) => Self::TableNotFound(table),
            other => Self::Store(other),
        }
    }
}

fn describe_failures(failures: &BTreeMap<ColumnId, FailureSet>) -> String {
    let mut out = String::from("There were validation failures.");
    for (column, set) in failures {
        let _ = write!(out, "\n{column}:");
        for (kind, cause) in set.iter() {
            let _ = write!(out, "\n  {kind}: {cause}");
        }
    }
    out
}
