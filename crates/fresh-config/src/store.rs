//! Backing store configuration.

use serde::{Deserialize, Serialize};

/// Path that selects an in-memory DuckDB database instead of a file.
pub const IN_MEMORY_PATH: &str = ":memory:";

fn default_path() -> String {
    ".fresh/registry.duckdb".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// DuckDB database file, or `:memory:`.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl StoreConfig {
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_project_file() {
        let config = StoreConfig::default();
        assert_eq!(config.path, ".fresh/registry.duckdb");
        assert!(!config.is_in_memory());
    }

    #[test]
    fn recognizes_memory_path() {
        let config = StoreConfig {
            path: ":memory:".into(),
        };
        assert!(config.is_in_memory());
    }
}
