//! In-process store backend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use fresh_core::TableLayout;
use tracing::debug;

use crate::{MetaStore, StoreError, TableCatalog};

#[derive(Debug)]
struct MemoryTable {
    layout: TableLayout,
    meta: BTreeMap<String, Vec<u8>>,
}

/// Tables and their metadata held in lock-guarded maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<String, MemoryTable>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`StoreError::InvalidLayout`] for an invalid layout and
    /// [`StoreError::TableExists`] if the name is taken.
    pub fn create_table(&self, layout: TableLayout) -> Result<(), StoreError> {
        layout.validate()?;
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        if tables.contains_key(&layout.name) {
            return Err(StoreError::TableExists(layout.name));
        }
        debug!(table = %layout.name, families = layout.families.len(), "created table");
        tables.insert(
            layout.name.clone(),
            MemoryTable {
                layout,
                meta: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Drop a table together with its metadata namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist.
    pub fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        if tables.remove(table).is_none() {
            return Err(StoreError::TableNotFound(table.to_string()));
        }
        debug!(table, "dropped table");
        Ok(())
    }

    fn with_table<T>(
        &self,
        table: &str,
        f: impl FnOnce(&MemoryTable) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        let entry = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        f(entry)
    }

    fn with_table_mut<T>(
        &self,
        table: &str,
        f: impl FnOnce(&mut MemoryTable) -> T,
    ) -> Result<T, StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let entry = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(f(entry))
    }
}

impl TableCatalog for MemoryStore {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.contains_key(table))
    }

    fn layout(&self, table: &str) -> Result<TableLayout, StoreError> {
        self.with_table(table, |t| Ok(t.layout.clone()))
    }
}

impl MetaStore for MemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.with_table(table, |t| {
            t.meta.get(key).cloned().ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                key: key.to_string(),
            })
        })
    }

    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.with_table_mut(table, |t| {
            t.meta.insert(key.to_string(), value.to_vec());
        })?;
        debug!(table, key, bytes = value.len(), "put metadata");
        Ok(())
    }

    fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        self.with_table_mut(table, |t| {
            t.meta.remove(key);
        })?;
        debug!(table, key, "deleted metadata");
        Ok(())
    }

    fn keys(&self, table: &str) -> Result<BTreeSet<String>, StoreError> {
        self.with_table(table, |t| Ok(t.meta.keys().cloned().collect()))
    }

    fn close(self) -> Result<(), StoreError> {
        self.tables.into_inner().map_err(|_| StoreError::Poisoned)?;
        Ok(())
    }
}
