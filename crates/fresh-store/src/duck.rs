//! `DuckDB` store backend.
//!
//! Table layouts and metadata live in four tables of one database file.
//! Metadata values are stored as BLOBs keyed by `(table_name, key)`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::{Connection, params};
use fresh_core::{FamilyLayout, TableLayout};
use tracing::debug;

use crate::{MetaStore, StoreError, TableCatalog};

/// DDL for the catalog and metadata tables.
const CREATE_STORE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS fresh_tables (
    name TEXT PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS fresh_families (
    table_name TEXT NOT NULL,
    family TEXT NOT NULL,
    group_type BOOLEAN NOT NULL,
    PRIMARY KEY (table_name, family)
);
CREATE TABLE IF NOT EXISTS fresh_qualifiers (
    table_name TEXT NOT NULL,
    family TEXT NOT NULL,
    qualifier TEXT NOT NULL,
    PRIMARY KEY (table_name, family, qualifier)
);
CREATE TABLE IF NOT EXISTS fresh_meta (
    table_name TEXT NOT NULL,
    key TEXT NOT NULL,
    value BLOB NOT NULL,
    PRIMARY KEY (table_name, key)
);
";

/// Catalog and metadata store in a `DuckDB` database.
///
/// The connection is not `Sync`, so it sits behind a mutex; every operation
/// holds the lock for its single statement (or transaction).
pub struct DuckStore {
    conn: Mutex<Connection>,
}

impl DuckStore {
    /// Open or create the store at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the parent directory cannot be created and
    /// [`StoreError::DuckDb`] if the file cannot be opened or schema creation fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(CREATE_STORE_TABLES)?;
        debug!(path = %path.display(), "opened duckdb store");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(CREATE_STORE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Register a table and its layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidLayout`] for an invalid layout,
    /// [`StoreError::TableExists`] if the name is taken, and
    /// [`StoreError::DuckDb`] if an INSERT fails.
    pub fn create_table(&self, layout: &TableLayout) -> Result<(), StoreError> {
        layout.validate()?;
        let mut conn = self.lock()?;
        if table_exists(&conn, &layout.name)? {
            return Err(StoreError::TableExists(layout.name.clone()));
        }

        let tx = conn.transaction()?;
        tx.execute("INSERT INTO fresh_tables (name) VALUES (?)", params![layout.name])?;
        for (family, family_layout) in &layout.families {
            tx.execute(
                "INSERT INTO fresh_families (table_name, family, group_type) VALUES (?, ?, ?)",
                params![layout.name, family, family_layout.group_type],
            )?;
            for qualifier in &family_layout.qualifiers {
                tx.execute(
                    "INSERT INTO fresh_qualifiers (table_name, family, qualifier) VALUES (?, ?, ?)",
                    params![layout.name, family, qualifier],
                )?;
            }
        }
        tx.commit()?;

        debug!(table = %layout.name, families = layout.families.len(), "created table");
        Ok(())
    }

    /// Drop a table together with its layout and metadata namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TableNotFound`] if the table does not exist and
    /// [`StoreError::DuckDb`] if a DELETE fails.
    pub fn drop_table(&self, table: &str) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        if !table_exists(&conn, table)? {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let tx = conn.transaction()?;
        for sql in [
            "DELETE FROM fresh_meta WHERE table_name = ?",
            "DELETE FROM fresh_qualifiers WHERE table_name = ?",
            "DELETE FROM fresh_families WHERE table_name = ?",
            "DELETE FROM fresh_tables WHERE name = ?",
        ] {
            tx.execute(sql, params![table])?;
        }
        tx.commit()?;

        debug!(table, "dropped table");
        Ok(())
    }

    /// Names of every registered table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuckDb`] if the query fails.
    pub fn tables(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM fresh_tables ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn require_table(conn: &Connection, table: &str) -> Result<(), StoreError> {
        if table_exists(conn, table)? {
            Ok(())
        } else {
            Err(StoreError::TableNotFound(table.to_string()))
        }
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM fresh_tables WHERE name = ?",
        params![table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

impl TableCatalog for DuckStore {
    fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let conn = self.lock()?;
        table_exists(&conn, table)
    }

    fn layout(&self, table: &str) -> Result<TableLayout, StoreError> {
        let conn = self.lock()?;
        Self::require_table(&conn, table)?;

        let mut families: BTreeMap<String, FamilyLayout> = BTreeMap::new();
        let mut stmt =
            conn.prepare("SELECT family, group_type FROM fresh_families WHERE table_name = ?")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
        })?;
        for row in rows {
            let (family, group_type) = row?;
            families.insert(
                family,
                FamilyLayout {
                    group_type,
                    qualifiers: BTreeSet::new(),
                },
            );
        }

        let mut stmt = conn
            .prepare("SELECT family, qualifier FROM fresh_qualifiers WHERE table_name = ?")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (family, qualifier) = row?;
            if let Some(layout) = families.get_mut(&family) {
                layout.qualifiers.insert(qualifier);
            }
        }

        Ok(TableLayout {
            name: table.to_string(),
            families,
        })
    }
}

impl MetaStore for DuckStore {
    fn get(&self, table: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let conn = self.lock()?;
        Self::require_table(&conn, table)?;
        let value = conn.query_row(
            "SELECT value FROM fresh_meta WHERE table_name = ? AND key = ?",
            params![table, key],
            |row| row.get::<_, Vec<u8>>(0),
        );
        match value {
            Ok(bytes) => Ok(bytes),
            Err(duckdb::Error::QueryReturnedNoRows) => Err(StoreError::NotFound {
                table: table.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, table: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let conn = self.lock()?;
        Self::require_table(&conn, table)?;
        conn.execute(
            "INSERT OR REPLACE INTO fresh_meta (table_name, key, value) VALUES (?, ?, ?)",
            params![table, key, value],
        )?;
        debug!(table, key, bytes = value.len(), "put metadata");
        Ok(())
    }

    fn delete(&self, table: &str, key: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        Self::require_table(&conn, table)?;
        conn.execute(
            "DELETE FROM fresh_meta WHERE table_name = ? AND key = ?",
            params![table, key],
        )?;
        debug!(table, key, "deleted metadata");
        Ok(())
    }

    fn keys(&self, table: &str) -> Result<BTreeSet<String>, StoreError> {
        let conn = self.lock()?;
        Self::require_table(&conn, table)?;
        let mut stmt = conn.prepare("SELECT key FROM fresh_meta WHERE table_name = ?")?;
        let keys = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<Result<BTreeSet<String>, _>>()?;
        Ok(keys)
    }

    fn close(self) -> Result<(), StoreError> {
        let conn = self.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, e)| StoreError::DuckDb(e))?;
        debug!("closed duckdb store");
        Ok(())
    }
}
