//! Shared fixtures for registry unit tests.

use std::collections::BTreeMap;

use fresh_core::{FamilyLayout, FreshenerRecord, ParameterDescription, TableLayout};
use fresh_store::MemoryStore;

use crate::factory::{FreshenerContext, FreshenerFactory, ScoreFunction};
use crate::{FreshnessRegistry, RegistryError};

pub const CONSTANT_SCORE: &str = "test.score.Constant";

/// Table `T` with group family `model{predictor}` and map family `info`.
pub fn layout() -> TableLayout {
    TableLayout::new("T")
        .with_family("model", FamilyLayout::group(["predictor"]))
        .with_family("info", FamilyLayout::map())
}

/// A registry over an in-memory store holding [`layout`], with the built-in
/// policies plus [`ConstantScore`].
pub fn registry() -> FreshnessRegistry<MemoryStore> {
    let store = MemoryStore::new();
    store.create_table(layout()).unwrap();
    let mut factory = FreshenerFactory::with_builtins();
    factory.register_score_function(CONSTANT_SCORE, ConstantScore::boxed);
    FreshnessRegistry::new(store).unwrap().with_factory(factory)
}

/// A valid record in the current version.
pub fn record() -> FreshenerRecord {
    FreshenerRecord::new("freshenerrecord-0.1", "pkg.Policy", "pkg.Score")
}

/// Score function reporting a `constant` parameter; setup copies the
/// column name into it.
#[derive(Debug, Default)]
pub struct ConstantScore {
    constant: String,
}

impl ConstantScore {
    pub fn boxed() -> Box<dyn ScoreFunction> {
        Box::new(Self {
            constant: "0".to_string(),
        })
    }
}

impl ScoreFunction for ConstantScore {
    fn name(&self) -> &str {
        CONSTANT_SCORE
    }

    fn serialize_to_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("constant".to_string(), self.constant.clone())])
    }

    fn parameter_descriptions(&self) -> BTreeMap<String, ParameterDescription> {
        BTreeMap::from([(
            "constant".to_string(),
            ParameterDescription::new("string", "Value returned for every read").with_default("0"),
        )])
    }

    fn setup(&mut self, context: &FreshenerContext<'_>) -> Result<(), RegistryError> {
        self.constant = context.column().to_string();
        Ok(())
    }
}
