//! # fresh-registry
//!
//! Attaches freshener records to table columns and keeps them consistent
//! with the table schema.
//!
//! - [`codec`]: bincode encoding of [`fresh_core::FreshenerRecord`]
//! - [`KeyMapper`]: column <-> metadata key under a reserved prefix
//! - [`VersionGate`]: supported `[min, max]` record-version window
//! - [`Validator`]: aggregated validation of a proposed attachment
//! - [`FreshenerFactory`]: name-to-constructor table for policies and score functions
//! - [`FreshnessRegistry`]: the public operations
//!
//! # Usage
//!
//! ```no_run
//! use fresh_core::{ColumnId, FamilyLayout, FreshenerRecord, TableLayout};
//! use fresh_registry::FreshnessRegistry;
//! use fresh_store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! store
//!     .create_table(TableLayout::new("T").with_family("model", FamilyLayout::group(["predictor"])))
//!     .expect("table");
//! let registry = FreshnessRegistry::new(store).expect("registry");
//!
//! let column = ColumnId::parse("model:predictor").expect("column");
//! let record = FreshenerRecord::new(registry.gate().current(), "pkg.Policy", "pkg.Score");
//! registry.register("T", &column, &record, false).expect("register");
//! assert_eq!(registry.retrieve("T", &column).expect("retrieve"), Some(record));
//! ```

pub mod builtins;
pub mod codec;
mod error;
mod factory;
mod gate;
mod keys;
mod registry;
mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::RegistryError;
pub use factory::{
    FreshenerContext, FreshenerFactory, FreshnessPolicy, ParameterOverrides, ScoreFunction,
};
pub use gate::VersionGate;
pub use keys::KeyMapper;
pub use registry::{FreshnessRegistry, RegisterOptions};
pub use validator::{Validator, is_valid_class_name};
