use fresh_core::{FamilyLayout, TableLayout};
use fresh_registry::FreshnessRegistry;
use fresh_store::DuckStore;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;

/// In-memory context with table `T`: group family `model{predictor}` and map family `info`.
pub fn context() -> AppContext {
    let store = DuckStore::open_in_memory().expect("in-memory store");
    store
        .create_table(
            &TableLayout::new("T")
                .with_family("model", FamilyLayout::group(["predictor"]))
                .with_family("info", FamilyLayout::map()),
        )
        .expect("create table");
    AppContext {
        registry: FreshnessRegistry::new(store).expect("registry"),
    }
}

pub fn flags() -> GlobalFlags {
    GlobalFlags {
        format: OutputFormat::Json,
        quiet: true,
        verbose: false,
        store: None,
    }
}
