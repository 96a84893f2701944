//! Registry namespace and supported record-version window.

use serde::{Deserialize, Serialize};

/// Reserved metadata-key prefix for freshener attachments.
pub const DEFAULT_KEY_PREFIX: &str = "fresh.registry";

/// Oldest record version this build reads.
pub const MIN_RECORD_VERSION: &str = "freshenerrecord-0.1";

/// Newest record version this build reads; also the version written.
pub const MAX_RECORD_VERSION: &str = "freshenerrecord-0.1";

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

fn default_min_record_version() -> String {
    MIN_RECORD_VERSION.to_string()
}

fn default_max_record_version() -> String {
    MAX_RECORD_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Prefix separating registry keys from other table metadata.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_min_record_version")]
    pub min_record_version: String,

    #[serde(default = "default_max_record_version")]
    pub max_record_version: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            min_record_version: default_min_record_version(),
            max_record_version: default_max_record_version(),
        }
    }
}
