//! Cross-cutting error types for the freshener registry.
//!
//! Storage and registry errors live in their own crates (`StoreError`,
//! `RegistryError`) and wrap `CoreError` where a core type fails to build.

use thiserror::Error;

/// Errors raised while constructing or parsing core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A column name could not be parsed or violates naming rules.
    #[error("Invalid column name '{name}': {reason}")]
    InvalidColumn { name: String, reason: String },

    /// A table layout is internally inconsistent.
    #[error("Invalid layout for table '{table}': {reason}")]
    InvalidLayout { table: String, reason: String },
}
