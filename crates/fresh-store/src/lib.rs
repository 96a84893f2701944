//! # fresh-store
//!
//! The collaborators the freshener registry consumes, and two backends.
//!
//! - [`TableCatalog`]: table existence and schema lookup.
//! - [`MetaStore`]: a key/value metadata namespace scoped per table.
//! - [`MemoryStore`]: lock-guarded in-process maps.
//! - [`DuckStore`]: a `DuckDB` file (or in-memory database).
//!
//! Every individual `get`, `put`, and `delete` is atomic. Nothing here offers
//! multi-key transactions.

mod duck;
mod error;
mod memory;

pub use duck::DuckStore;
pub use error::StoreError;
pub use memory::MemoryStore;

use std::collections::BTreeSet;

use fresh_core::TableLayout;

/// Table existence and layout lookup.
pub trait TableCatalog {
    /// # Errors
    ///
    /// Returns a backend error if the catalog cannot be read.
    fn table_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist.
    fn layout(&self, table: &str) -> Result<TableLayout, StoreError>;
}

/// Per-table key/value metadata.
pub trait MetaStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing is stored under `key`, and
    /// [`StoreError::TableNotFound`] if the table does not exist.
    fn get(&self, table: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist.
    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist.
    fn delete(&self, table: &str, key: &str) -> Result<(), StoreError>;

    /// Every key in the table's namespace, registry and foreign alike.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist.
    fn keys(&self, table: &str) -> Result<BTreeSet<String>, StoreError>;

    /// Release the backend. Called at most once, by value.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the underlying handle fails to close.
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}
