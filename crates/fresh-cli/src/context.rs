use anyhow::Context;
use fresh_config::FreshConfig;
use fresh_registry::FreshnessRegistry;
use fresh_store::DuckStore;

use crate::cli::GlobalFlags;

/// Everything a command handler needs: the registry over the configured store.
pub struct AppContext {
    pub registry: FreshnessRegistry<DuckStore>,
}

impl AppContext {
    /// Load configuration, apply CLI overrides, and open the store.
    pub fn init(flags: &GlobalFlags) -> anyhow::Result<Self> {
        let mut config = FreshConfig::load_with_dotenv().context("failed to load configuration")?;
        if let Some(path) = &flags.store {
            config.store.path.clone_from(path);
        }

        let store = if config.store.is_in_memory() {
            DuckStore::open_in_memory().context("failed to open in-memory store")?
        } else {
            DuckStore::open(&config.store.path)
                .with_context(|| format!("failed to open store at {}", config.store.path))?
        };
        tracing::debug!(path = %config.store.path, "opened store");

        let registry = FreshnessRegistry::from_config(store, &config.registry)?;
        Ok(Self { registry })
    }

    pub fn store(&self) -> &DuckStore {
        self.registry.store()
    }

    pub fn close(self) -> anyhow::Result<()> {
        self.registry.close()?;
        Ok(())
    }
}
