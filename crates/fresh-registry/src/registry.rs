//! The registry orchestrator.
//!
//! Every operation re-reads store state; nothing is cached between calls.
//! A registration validates first and writes only when no rule fails.

use std::collections::{BTreeMap, BTreeSet};

use fresh_config::RegistryConfig;
use fresh_core::{ColumnId, FailureSet, FreshenerRecord};
use fresh_store::{MetaStore, TableCatalog};
use tracing::{debug, info, warn};

use crate::factory::{
    FreshenerContext, FreshenerFactory, FreshnessPolicy, ParameterOverrides, ScoreFunction,
    merge_parameters,
};
use crate::{KeyMapper, RegistryError, Validator, VersionGate, codec};

/// Flags shared by the registration operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Replace an existing attachment instead of failing validation.
    pub overwrite: bool,
    /// Build the named policy and score function through the factory and
    /// merge their self-reported parameters under the caller's.
    pub instantiate: bool,
    /// Run each instance's setup hook before gathering its parameters.
    /// Has no effect without `instantiate`.
    pub setup: bool,
}

impl RegisterOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overwrite: false,
            instantiate: false,
            setup: false,
        }
    }

    #[must_use]
    pub const fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub const fn instantiate(mut self, instantiate: bool) -> Self {
        self.instantiate = instantiate;
        self
    }

    #[must_use]
    pub const fn setup(mut self, setup: bool) -> Self {
        self.setup = setup;
        self
    }
}

/// Attaches, validates, retrieves, and removes freshener records.
pub struct FreshnessRegistry<S> {
    store: S,
    keys: KeyMapper,
    gate: VersionGate,
    factory: FreshenerFactory,
}

impl<S: TableCatalog + MetaStore> FreshnessRegistry<S> {
    /// Open a registry with the default key prefix and version window.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Version`] if the configured bounds are invalid.
    pub fn new(store: S) -> Result<Self, RegistryError> {
        Self::from_config(store, &RegistryConfig::default())
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::Version`] if the configured bounds are invalid.
    pub fn from_config(store: S, config: &RegistryConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            store,
            keys: KeyMapper::new(config.key_prefix.clone()),
            gate: VersionGate::from_config(config)?,
            factory: FreshenerFactory::with_builtins(),
        })
    }

    /// Replace the component factory.
    #[must_use]
    pub fn with_factory(mut self, factory: FreshenerFactory) -> Self {
        self.factory = factory;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn keys(&self) -> &KeyMapper {
        &self.keys
    }

    pub const fn gate(&self) -> &VersionGate {
        &self.gate
    }

    pub const fn factory(&self) -> &FreshenerFactory {
        &self.factory
    }

    pub const fn validator(&self) -> Validator<'_, S> {
        Validator::new(&self.store, &self.keys, &self.gate)
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Attach `record` at `column` as given.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] carrying every failing rule, in
    /// which case nothing is written. See [`Validator::validate_record`] for
    /// the hard errors.
    pub fn register(
        &self,
        table: &str,
        column: &ColumnId,
        record: &FreshenerRecord,
        overwrite: bool,
    ) -> Result<(), RegistryError> {
        self.write_validated(table, column, record, overwrite)
    }

    /// Attach `record`, optionally instantiating its components to merge
    /// their self-reported parameters. The record's version is kept.
    ///
    /// # Errors
    ///
    /// As [`Self::register`], plus [`RegistryError::UnknownPolicy`] or
    /// [`RegistryError::UnknownScoreFunction`] when instantiating.
    pub fn register_record(
        &self,
        table: &str,
        column: &ColumnId,
        record: FreshenerRecord,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let record = self.prepare(table, column, record, options)?;
        self.write_validated(table, column, &record, options.overwrite)
    }

    /// Attach a freshener built from component names, stamped with the
    /// current record version.
    ///
    /// # Errors
    ///
    /// As [`Self::register_record`].
    pub fn register_with(
        &self,
        table: &str,
        column: &ColumnId,
        policy_class: &str,
        score_function_class: &str,
        overrides: ParameterOverrides,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let record = FreshenerRecord::new(self.gate.current(), policy_class, score_function_class)
            .with_parameters(overrides.parameters)
            .with_descriptions(overrides.descriptions);
        self.register_record(table, column, record, options)
    }

    /// Attach a freshener built from live instances, recorded under each
    /// instance's [`name`](FreshnessPolicy::name).
    ///
    /// # Errors
    ///
    /// As [`Self::register`], plus [`RegistryError::InvalidParameter`] from setup.
    pub fn register_instances(
        &self,
        table: &str,
        column: &ColumnId,
        policy: &mut dyn FreshnessPolicy,
        score_function: &mut dyn ScoreFunction,
        overrides: &ParameterOverrides,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let context = FreshenerContext::new(table, column, &overrides.parameters);
        let merged = merge_parameters(&context, policy, score_function, overrides, options.setup)?;
        let record = FreshenerRecord::new(
            self.gate.current(),
            policy.name(),
            score_function.name(),
        )
        .with_parameters(merged.parameters)
        .with_descriptions(merged.descriptions);
        self.write_validated(table, column, &record, options.overwrite)
    }

    /// Attach many records in one table, all or nothing.
    ///
    /// Every entry is validated independently before anything is written.
    /// If any entry fails, nothing is written and the error maps each failing
    /// column to its own failures.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MultiValidation`] on validation failures, or
    /// the first hard error encountered.
    pub fn register_many(
        &self,
        table: &str,
        records: BTreeMap<ColumnId, FreshenerRecord>,
        options: RegisterOptions,
    ) -> Result<(), RegistryError> {
        let validator = self.validator();
        let mut prepared = Vec::with_capacity(records.len());
        let mut combined = BTreeMap::new();

        for (column, record) in records {
            let record = self.prepare(table, &column, record, options)?;
            let failures =
                validator.validate_record(table, &column, Some(&record), options.overwrite)?;
            if !failures.is_empty() {
                combined.insert(column.clone(), failures);
            }
            prepared.push((column, record));
        }

        if !combined.is_empty() {
            return Err(RegistryError::MultiValidation(combined));
        }
        for (column, record) in &prepared {
            self.write(table, column, record)?;
        }
        info!(table, count = prepared.len(), "registered fresheners");
        Ok(())
    }

    fn prepare(
        &self,
        table: &str,
        column: &ColumnId,
        record: FreshenerRecord,
        options: RegisterOptions,
    ) -> Result<FreshenerRecord, RegistryError> {
        if !options.instantiate {
            return Ok(record);
        }
        if let Some(field) = record.missing_field() {
            return Err(RegistryError::InvalidRecord(field));
        }
        let mut policy = self.factory.policy(&record.policy_class)?;
        let mut score_function = self.factory.score_function(&record.score_function_class)?;
        let overrides = ParameterOverrides {
            parameters: record.parameters,
            descriptions: record.descriptions,
        };
        let context = FreshenerContext::new(table, column, &overrides.parameters);
        let merged = merge_parameters(
            &context,
            policy.as_mut(),
            score_function.as_mut(),
            &overrides,
            options.setup,
        )?;
        Ok(FreshenerRecord {
            record_version: record.record_version,
            policy_class: record.policy_class,
            score_function_class: record.score_function_class,
            parameters: merged.parameters,
            descriptions: merged.descriptions,
        })
    }

    fn write_validated(
        &self,
        table: &str,
        column: &ColumnId,
        record: &FreshenerRecord,
        overwrite: bool,
    ) -> Result<(), RegistryError> {
        let failures = self
            .validator()
            .validate_record(table, column, Some(record), overwrite)?;
        if !failures.is_empty() {
            return Err(RegistryError::Validation {
                column: column.clone(),
                failures,
            });
        }
        self.write(table, column, record)
    }

    fn write(
        &self,
        table: &str,
        column: &ColumnId,
        record: &FreshenerRecord,
    ) -> Result<(), RegistryError> {
        let bytes = codec::encode(record)?;
        self.store.put(table, &self.keys.to_key(column), &bytes)?;
        debug!(
            table,
            column = %column,
            policy = %record.policy_class,
            score_function = %record.score_function_class,
            "wrote freshener record"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Retrieval
    // -----------------------------------------------------------------------

    /// The record attached at exactly `column`.
    ///
    /// Returns `None` when nothing is attached or when the stored version is
    /// outside the supported window.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TableNotFound`], [`RegistryError::MalformedRecord`],
    /// [`RegistryError::Version`] for a record from another protocol, or a
    /// store error.
    pub fn retrieve(
        &self,
        table: &str,
        column: &ColumnId,
    ) -> Result<Option<FreshenerRecord>, RegistryError> {
        let key = self.keys.to_key(column);
        let bytes = match self.store.get(table, &key) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = codec::decode(&bytes)?;

        let version = &record.record_version;
        if self.gate.is_too_low(version)? || self.gate.is_too_high(version)? {
            warn!(
                table,
                column = %column,
                version = %version,
                min = %self.gate.min(),
                max = %self.gate.max(),
                "skipping freshener record with unsupported version"
            );
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Every readable record in `table`.
    ///
    /// # Errors
    ///
    /// As [`Self::retrieve`].
    pub fn retrieve_all(
        &self,
        table: &str,
    ) -> Result<BTreeMap<ColumnId, FreshenerRecord>, RegistryError> {
        let mut records = BTreeMap::new();
        for column in self.attached_columns(table)? {
            if let Some(record) = self.retrieve(table, &column)? {
                records.insert(column, record);
            }
        }
        Ok(records)
    }

    fn attached_columns(&self, table: &str) -> Result<Vec<ColumnId>, RegistryError> {
        let keys = self.store.keys(table)?;
        Ok(keys
            .iter()
            .filter(|key| self.keys.is_registry_key(key))
            .filter_map(|key| match self.keys.from_key(key) {
                Ok(column) => Some(column),
                Err(e) => {
                    warn!(table, key = %key, error = %e, "ignoring unparsable registry key");
                    None
                }
            })
            .collect())
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove the attachment at exactly `column`. Family and qualified
    /// attachments are independent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TableNotFound`] or [`RegistryError::NoAttachment`].
    pub fn remove(&self, table: &str, column: &ColumnId) -> Result<(), RegistryError> {
        self.require_table(table)?;
        let key = self.keys.to_key(column);
        if !self.store.keys(table)?.contains(&key) {
            return Err(RegistryError::NoAttachment {
                table: table.to_string(),
                column: column.clone(),
            });
        }
        self.store.delete(table, &key)?;
        info!(table, column = %column, "removed freshener");
        Ok(())
    }

    /// Remove every attachment in `table` and return the columns removed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TableNotFound`] or a store error.
    pub fn remove_all(&self, table: &str) -> Result<BTreeSet<ColumnId>, RegistryError> {
        self.require_table(table)?;
        let mut removed = BTreeSet::new();
        for key in self.store.keys(table)? {
            if !self.keys.is_registry_key(&key) {
                continue;
            }
            self.store.delete(table, &key)?;
            match self.keys.from_key(&key) {
                Ok(column) => {
                    removed.insert(column);
                }
                Err(e) => warn!(table, key = %key, error = %e, "removed unparsable registry key"),
            }
        }
        info!(table, count = removed.len(), "removed all fresheners");
        Ok(removed)
    }

    fn require_table(&self, table: &str) -> Result<(), RegistryError> {
        if self.store.table_exists(table)? {
            Ok(())
        } else {
            Err(RegistryError::TableNotFound(table.to_string()))
        }
    }

    // -----------------------------------------------------------------------
    // Validation of existing attachments
    // -----------------------------------------------------------------------

    /// Re-validate the record attached at `column` against the current schema.
    ///
    /// # Errors
    ///
    /// As [`Self::retrieve`] and [`Validator::validate_record`].
    pub fn validate(&self, table: &str, column: &ColumnId) -> Result<FailureSet, RegistryError> {
        let record = self.retrieve(table, column)?;
        self.validator()
            .validate_record(table, column, record.as_ref(), true)
    }

    /// Re-validate every attachment; only columns with failures are returned.
    ///
    /// # Errors
    ///
    /// As [`Self::validate`].
    pub fn validate_all(
        &self,
        table: &str,
    ) -> Result<BTreeMap<ColumnId, FailureSet>, RegistryError> {
        let validator = self.validator();
        let mut results = BTreeMap::new();
        for (column, record) in self.retrieve_all(table)? {
            let failures = validator.validate_record(table, &column, Some(&record), true)?;
            if !failures.is_empty() {
                results.insert(column, failures);
            }
        }
        Ok(results)
    }

    /// Release the backing store.
    ///
    /// # Errors
    ///
    /// Returns the store's close error.
    pub fn close(self) -> Result<(), RegistryError> {
        self.store.close()?;
        debug!("closed freshness registry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{SHELF_LIFE, ShelfLife};
    use crate::test_support::{CONSTANT_SCORE, ConstantScore, layout, record, registry};
    use fresh_core::ValidationFailure as F;
    use fresh_store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn col(name: &str) -> ColumnId {
        ColumnId::parse(name).unwrap()
    }

    fn stored_keys(registry: &FreshnessRegistry<MemoryStore>) -> BTreeSet<String> {
        registry.store().keys("T").unwrap()
    }

    #[test]
    fn register_overwrite_retrieve_remove() {
        let registry = registry();
        let column = col("model:predictor");
        let first = record();
        let second = record().with_parameter("k", "v");

        registry.register("T", &column, &first, false).unwrap();

        let err = registry.register("T", &column, &second, false).unwrap_err();
        match err {
            RegistryError::Validation { column: c, failures } => {
                assert_eq!(c, column);
                assert_eq!(failures.kinds(), vec![F::FreshenerAlreadyAttached]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.retrieve("T", &column).unwrap(), Some(first));

        registry.register("T", &column, &second, true).unwrap();
        assert_eq!(registry.retrieve("T", &column).unwrap(), Some(second));

        registry.remove("T", &column).unwrap();
        assert_eq!(registry.retrieve("T", &column).unwrap(), None);
    }

    #[test]
    fn failed_registration_writes_nothing() {
        let registry = registry();
        registry.store().put("T", "other.metadata", b"x").unwrap();
        let before = stored_keys(&registry);

        let mut bad = record();
        bad.policy_class = "bad..name".into();
        let err = registry
            .register("T", &col("nope:q"), &bad, false)
            .unwrap_err();
        let RegistryError::Validation { failures, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(failures.kinds(), vec![F::BadPolicyName, F::NoColumnInTable]);
        assert_eq!(stored_keys(&registry), before);
    }

    #[test]
    fn group_family_attachment_is_rejected() {
        let registry = registry();
        let err = registry
            .register("T", &col("model"), &record(), false)
            .unwrap_err();
        let RegistryError::Validation { failures, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(failures.kinds(), vec![F::GroupFamilyAttachment]);
    }

    #[test]
    fn map_family_attachment_blocks_its_columns() {
        let registry = registry();
        registry.register("T", &col("info"), &record(), false).unwrap();
        let err = registry
            .register("T", &col("info:a"), &record(), false)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Validation { .. }));
        registry.register("T", &col("info:a"), &record(), true).unwrap();
    }

    #[test]
    fn missing_table_is_a_hard_error() {
        let registry = registry();
        assert!(matches!(
            registry.register("U", &col("info"), &record(), false),
            Err(RegistryError::TableNotFound(_))
        ));
        assert!(matches!(
            registry.remove("U", &col("info")),
            Err(RegistryError::TableNotFound(_))
        ));
        assert!(matches!(
            registry.remove_all("U"),
            Err(RegistryError::TableNotFound(_))
        ));
    }

    #[test]
    fn register_many_is_all_or_nothing() {
        let registry = registry();
        let mut bad = record();
        bad.record_version = "freshenerrecord-0.0".into();
        let records = BTreeMap::from([
            (col("model:predictor"), record()),
            (col("info:a"), record()),
            (col("info:b"), bad),
        ]);

        let err = registry
            .register_many("T", records, RegisterOptions::new())
            .unwrap_err();
        let RegistryError::MultiValidation(failures) = err else {
            panic!("expected multi validation error");
        };
        assert_eq!(failures.keys().cloned().collect::<Vec<_>>(), vec![col("info:b")]);
        assert_eq!(failures[&col("info:b")].kinds(), vec![F::VersionTooLow]);
        assert!(stored_keys(&registry).is_empty());
    }

    #[test]
    fn register_many_writes_every_entry() {
        let registry = registry();
        let records = BTreeMap::from([
            (col("model:predictor"), record()),
            (col("info:a"), record().with_parameter("a", "1")),
        ]);
        registry
            .register_many("T", records.clone(), RegisterOptions::new())
            .unwrap();
        assert_eq!(registry.retrieve_all("T").unwrap(), records);
    }

    #[test]
    fn register_many_instantiates_and_merges() {
        let registry = registry();
        let entry = FreshenerRecord::new("freshenerrecord-0.1", SHELF_LIFE, CONSTANT_SCORE)
            .with_parameter("shelf_life_ms", "100");
        let options = RegisterOptions::new().instantiate(true);
        registry
            .register_many("T", BTreeMap::from([(col("info:a"), entry)]), options)
            .unwrap();

        let stored = registry.retrieve("T", &col("info:a")).unwrap().unwrap();
        assert_eq!(
            stored.parameters,
            BTreeMap::from([
                ("constant".to_string(), "0".to_string()),
                ("shelf_life_ms".to_string(), "100".to_string()),
            ])
        );
        assert!(stored.descriptions.contains_key("shelf_life_ms"));
    }

    #[test]
    fn register_with_setup_runs_hooks() {
        let registry = registry();
        let options = RegisterOptions::new().instantiate(true).setup(true);
        registry
            .register_with(
                "T",
                &col("info:a"),
                SHELF_LIFE,
                CONSTANT_SCORE,
                ParameterOverrides::new().with_parameter("shelf_life_ms", "250"),
                options,
            )
            .unwrap();

        let stored = registry.retrieve("T", &col("info:a")).unwrap().unwrap();
        assert_eq!(stored.record_version, registry.gate().current());
        assert_eq!(stored.parameters["constant"], "info:a");
        assert_eq!(stored.parameters["shelf_life_ms"], "250");
    }

    #[test]
    fn register_with_without_instantiation_keeps_raw_names() {
        let registry = registry();
        registry
            .register_with(
                "T",
                &col("info:a"),
                "pkg.Policy",
                "pkg.Score",
                ParameterOverrides::new(),
                RegisterOptions::new(),
            )
            .unwrap();
        let stored = registry.retrieve("T", &col("info:a")).unwrap().unwrap();
        assert_eq!(stored, record());
    }

    #[test]
    fn instantiating_unknown_component_fails_before_writing() {
        let registry = registry();
        let result = registry.register_with(
            "T",
            &col("info:a"),
            "pkg.Policy",
            CONSTANT_SCORE,
            ParameterOverrides::new(),
            RegisterOptions::new().instantiate(true),
        );
        assert!(matches!(result, Err(RegistryError::UnknownPolicy(_))));
        assert!(stored_keys(&registry).is_empty());
    }

    #[test]
    fn register_instances_records_names() {
        let registry = registry();
        let mut policy = ShelfLife::new(1000);
        let mut score = ConstantScore::boxed();
        registry
            .register_instances(
                "T",
                &col("model:predictor"),
                &mut policy,
                score.as_mut(),
                &ParameterOverrides::new(),
                RegisterOptions::new(),
            )
            .unwrap();
        let stored = registry
            .retrieve("T", &col("model:predictor"))
            .unwrap()
            .unwrap();
        assert_eq!(stored.policy_class, SHELF_LIFE);
        assert_eq!(stored.score_function_class, CONSTANT_SCORE);
        assert_eq!(stored.parameters["shelf_life_ms"], "1000");
    }

    #[test]
    fn retrieve_skips_unsupported_versions() {
        let registry = registry();
        let mut future = record();
        future.record_version = "freshenerrecord-0.2".into();
        let key = registry.keys().to_key(&col("info:a"));
        registry
            .store()
            .put("T", &key, &codec::encode(&future).unwrap())
            .unwrap();

        assert_eq!(registry.retrieve("T", &col("info:a")).unwrap(), None);
        assert!(registry.retrieve_all("T").unwrap().is_empty());
    }

    #[test]
    fn retrieve_rejects_foreign_protocol() {
        let registry = registry();
        let mut foreign = record();
        foreign.record_version = "otherrecord-0.1".into();
        let key = registry.keys().to_key(&col("info:a"));
        registry
            .store()
            .put("T", &key, &codec::encode(&foreign).unwrap())
            .unwrap();

        assert!(matches!(
            registry.retrieve("T", &col("info:a")),
            Err(RegistryError::Version(_))
        ));
    }

    #[test]
    fn retrieve_all_ignores_foreign_metadata() {
        let registry = registry();
        registry.store().put("T", "other.metadata", b"x").unwrap();
        registry.register("T", &col("info:a"), &record(), false).unwrap();
        let all = registry.retrieve_all("T").unwrap();
        assert_eq!(all.keys().cloned().collect::<Vec<_>>(), vec![col("info:a")]);
    }

    #[test]
    fn remove_requires_exact_attachment() {
        let registry = registry();
        registry.register("T", &col("info"), &record(), false).unwrap();
        assert!(matches!(
            registry.remove("T", &col("info:a")),
            Err(RegistryError::NoAttachment { .. })
        ));
        registry.remove("T", &col("info")).unwrap();
        assert!(matches!(
            registry.remove("T", &col("info")),
            Err(RegistryError::NoAttachment { .. })
        ));
    }

    #[test]
    fn remove_family_does_not_touch_qualified_attachment() {
        let registry = registry();
        registry.register("T", &col("info:a"), &record(), false).unwrap();
        assert!(matches!(
            registry.remove("T", &col("info")),
            Err(RegistryError::NoAttachment { .. })
        ));

        registry.register("T", &col("info"), &record(), true).unwrap();
        registry.remove("T", &col("info")).unwrap();
        let keys = registry.store().keys("T").unwrap();
        assert!(keys.contains("fresh.registry.info.a"));
        assert!(!keys.contains("fresh.registry.info"));
        assert_eq!(registry.retrieve("T", &col("info:a")).unwrap(), Some(record()));
    }

    #[test]
    fn remove_all_returns_columns_and_keeps_foreign_keys() {
        let registry = registry();
        registry.store().put("T", "other.metadata", b"x").unwrap();
        registry
            .register("T", &col("model:predictor"), &record(), false)
            .unwrap();
        registry.register("T", &col("info:a"), &record(), false).unwrap();

        let removed = registry.remove_all("T").unwrap();
        assert_eq!(
            removed,
            BTreeSet::from([col("info:a"), col("model:predictor")])
        );
        assert_eq!(
            stored_keys(&registry),
            BTreeSet::from(["other.metadata".to_string()])
        );
    }

    #[test]
    fn validate_reports_only_broken_attachments() {
        let registry = registry();
        registry.register("T", &col("info:a"), &record(), false).unwrap();
        let mut broken = record();
        broken.score_function_class = "9bad".into();
        let key = registry.keys().to_key(&col("model:other"));
        registry
            .store()
            .put("T", &key, &codec::encode(&broken).unwrap())
            .unwrap();

        assert!(registry.validate("T", &col("info:a")).unwrap().is_empty());
        assert!(registry.validate("T", &col("info:zzz")).unwrap().is_empty());

        let all = registry.validate_all("T").unwrap();
        assert_eq!(all.keys().cloned().collect::<Vec<_>>(), vec![col("model:other")]);
        assert_eq!(
            all[&col("model:other")].kinds(),
            vec![F::BadScoreFunctionName, F::NoColumnInTable]
        );
    }

    #[test]
    fn injected_version_window_is_honoured() {
        let store = MemoryStore::new();
        store.create_table(layout()).unwrap();
        let config = RegistryConfig {
            key_prefix: "custom".into(),
            min_record_version: "freshenerrecord-0.1".into(),
            max_record_version: "freshenerrecord-0.2".into(),
        };
        let registry = FreshnessRegistry::from_config(store, &config).unwrap();

        let mut newer = record();
        newer.record_version = "freshenerrecord-0.2".into();
        registry.register("T", &col("info:a"), &newer, false).unwrap();
        assert!(registry.store().keys("T").unwrap().contains("custom.info.a"));
        assert_eq!(registry.gate().current(), "freshenerrecord-0.2");
    }

    #[test]
    fn close_consumes_registry() {
        let registry = registry();
        registry.register("T", &col("info:a"), &record(), false).unwrap();
        registry.close().unwrap();
    }
}
