//! Built-in freshness policies.
//!
//! These carry configuration only. Deciding staleness at read time happens
//! in the freshening pipeline, which consults the stored record.

use std::collections::BTreeMap;

use fresh_core::{ParameterDescription, ParameterScope};

use crate::RegistryError;
use crate::factory::{FreshenerContext, FreshenerFactory, FreshnessPolicy};

pub const ALWAYS_FRESHEN: &str = "fresh.policy.AlwaysFreshen";
pub const NEVER_FRESHEN: &str = "fresh.policy.NeverFreshen";
pub const SHELF_LIFE: &str = "fresh.policy.ShelfLife";
pub const NEWER_THAN: &str = "fresh.policy.NewerThan";

pub const SHELF_LIFE_KEY: &str = "shelf_life_ms";
pub const NEWER_THAN_KEY: &str = "newer_than_ms";

pub(crate) fn register(factory: &mut FreshenerFactory) {
    factory.register_policy(ALWAYS_FRESHEN, || Box::new(AlwaysFreshen));
    factory.register_policy(NEVER_FRESHEN, || Box::new(NeverFreshen));
    factory.register_policy(SHELF_LIFE, || Box::new(ShelfLife::default()));
    factory.register_policy(NEWER_THAN, || Box::new(NewerThan::default()));
}

/// Every read is stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFreshen;

impl FreshnessPolicy for AlwaysFreshen {
    fn name(&self) -> &str {
        ALWAYS_FRESHEN
    }
}

/// No read is stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFreshen;

impl FreshnessPolicy for NeverFreshen {
    fn name(&self) -> &str {
        NEVER_FRESHEN
    }
}

/// A value is stale once it is older than a fixed number of milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfLife {
    shelf_life_ms: Option<u64>,
}

impl ShelfLife {
    #[must_use]
    pub const fn new(shelf_life_ms: u64) -> Self {
        Self {
            shelf_life_ms: Some(shelf_life_ms),
        }
    }
}

impl FreshnessPolicy for ShelfLife {
    fn name(&self) -> &str {
        SHELF_LIFE
    }

    fn serialize_to_parameters(&self) -> BTreeMap<String, String> {
        millis_parameter(SHELF_LIFE_KEY, self.shelf_life_ms)
    }

    fn parameter_descriptions(&self) -> BTreeMap<String, ParameterDescription> {
        BTreeMap::from([(
            SHELF_LIFE_KEY.to_string(),
            ParameterDescription::new("long", "Maximum age in milliseconds of a fresh value")
                .required()
                .with_scope(ParameterScope::Scoring),
        )])
    }

    fn setup(&mut self, context: &FreshenerContext<'_>) -> Result<(), RegistryError> {
        if let Some(ms) = context.parameter_u64(SHELF_LIFE_KEY)? {
            self.shelf_life_ms = Some(ms);
        }
        Ok(())
    }
}

/// A value is stale if it was written before a fixed timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewerThan {
    newer_than_ms: Option<u64>,
}

impl NewerThan {
    #[must_use]
    pub const fn new(newer_than_ms: u64) -> Self {
        Self {
            newer_than_ms: Some(newer_than_ms),
        }
    }
}

impl FreshnessPolicy for NewerThan {
    fn name(&self) -> &str {
        NEWER_THAN
    }

    fn serialize_to_parameters(&self) -> BTreeMap<String, String> {
        millis_parameter(NEWER_THAN_KEY, self.newer_than_ms)
    }

    fn parameter_descriptions(&self) -> BTreeMap<String, ParameterDescription> {
        BTreeMap::from([(
            NEWER_THAN_KEY.to_string(),
            ParameterDescription::new(
                "long",
                "Epoch milliseconds before which a value is stale",
            )
            .required()
            .with_scope(ParameterScope::Scoring),
        )])
    }

    fn setup(&mut self, context: &FreshenerContext<'_>) -> Result<(), RegistryError> {
        if let Some(ms) = context.parameter_u64(NEWER_THAN_KEY)? {
            self.newer_than_ms = Some(ms);
        }
        Ok(())
    }
}

fn millis_parameter(key: &str, value: Option<u64>) -> BTreeMap<String, String> {
    value
        .map(|ms| (key.to_string(), ms.to_string()))
        .into_iter()
        .collect()
}
