//! # fresh-config
//!
//! Layered configuration loading for the freshener registry using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FRESH_*` prefix, `__` as separator)
//! 2. Project-level `.fresh/config.toml`
//! 3. User-level `~/.config/fresh/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FRESH_STORE__PATH` -> `store.path`,
//! `FRESH_REGISTRY__KEY_PREFIX` -> `registry.key_prefix`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use fresh_config::FreshConfig;
//!
//! let config = FreshConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.store.path);
//! ```

mod error;
mod registry;
mod store;

pub use error::ConfigError;
pub use registry::{
    DEFAULT_KEY_PREFIX, MAX_RECORD_VERSION, MIN_RECORD_VERSION, RegistryConfig,
};
pub use store::{IN_MEMORY_PATH, StoreConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FreshConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl FreshConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if the merged values fail [`Self::validate`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".fresh/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("FRESH_").split("__"))
    }

    /// Check values figment cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty key prefix, a prefix
    /// containing `:`, or an empty version bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.registry.key_prefix;
        if prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "registry.key_prefix".into(),
                reason: "may not be empty".into(),
            });
        }
        if prefix.contains(':') {
            return Err(ConfigError::InvalidValue {
                field: "registry.key_prefix".into(),
                reason: format!("'{prefix}' may not contain ':'"),
            });
        }
        for (field, value) in [
            ("registry.min_record_version", &self.registry.min_record_version),
            ("registry.max_record_version", &self.registry.max_record_version),
        ] {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: "may not be empty".into(),
                });
            }
        }
        if self.store.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.path".into(),
                reason: "may not be empty".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fresh").join("config.toml"))
    }
}
