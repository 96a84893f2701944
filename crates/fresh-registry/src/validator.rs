//! Attachment validation.
//!
//! Every check runs; results are unioned into one [`FailureSet`]. Only
//! conditions that make validation impossible (missing table, incomplete
//! record, foreign or malformed version) are returned as errors.

use std::collections::BTreeSet;

use fresh_core::{ColumnId, FailureSet, FreshenerRecord, TableLayout, ValidationFailure};
use fresh_store::{MetaStore, TableCatalog};

use crate::{KeyMapper, RegistryError, VersionGate};

/// Whether `name` is a dotted identifier such as `org.acme.Policy`.
///
/// Each segment starts with a letter, `_` or `$` and continues with letters,
/// digits, `_` or `$`. Empty segments and a trailing `.` are rejected.
#[must_use]
pub fn is_valid_class_name(name: &str) -> bool {
    !name.ends_with('.')
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_part)
        })
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Validation rules evaluated against a store's current state.
pub struct Validator<'a, S> {
    store: &'a S,
    keys: &'a KeyMapper,
    gate: &'a VersionGate,
}

impl<'a, S: TableCatalog + MetaStore> Validator<'a, S> {
    pub const fn new(store: &'a S, keys: &'a KeyMapper, gate: &'a VersionGate) -> Self {
        Self { store, keys, gate }
    }

    /// Would attaching at `column` collide with an attachment in `current_keys`?
    ///
    /// A qualified column collides with itself and with its family. A family
    /// collides with every attachment inside it.
    #[must_use]
    pub fn validate_attachment(
        &self,
        column: &ColumnId,
        current_keys: &BTreeSet<String>,
    ) -> FailureSet {
        let mut failures = FailureSet::new();
        if column.is_fully_qualified() {
            let family = column.family_column();
            if current_keys.contains(&self.keys.to_key(column)) {
                failures.insert(
                    ValidationFailure::FreshenerAlreadyAttached,
                    format!("There is already a freshener attached to column: {column}"),
                );
            } else if current_keys.contains(&self.keys.to_key(&family)) {
                failures.insert(
                    ValidationFailure::FreshenerAlreadyAttached,
                    format!(
                        "There is already a freshener attached to family: {family}, which contains column: {column}"
                    ),
                );
            }
        } else {
            let attached: Vec<String> = current_keys
                .iter()
                .filter_map(|key| self.keys.from_key(key).ok())
                .filter(|existing| existing.family_name() == column.family_name())
                .map(|existing| existing.to_string())
                .collect();
            if !attached.is_empty() {
                failures.insert(
                    ValidationFailure::FreshenerAlreadyAttached,
                    format!(
                        "There are already fresheners attached to columns in family: {column}: [{}]",
                        attached.join(", ")
                    ),
                );
            }
        }
        failures
    }

    /// Check class-name syntax and column existence against the table layout.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::TableNotFound`] if the table does not exist.
    pub fn validate_schema(
        &self,
        table: &str,
        column: &ColumnId,
        policy_class: &str,
        score_function_class: &str,
    ) -> Result<FailureSet, RegistryError> {
        let layout = self.layout(table)?;
        Ok(schema_failures(
            &layout,
            column,
            policy_class,
            score_function_class,
        ))
    }

    /// Every rule that applies to attaching `record` at `column`.
    ///
    /// An absent record has no failures. Collisions are only checked when
    /// `overwrite` is false.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRecord`] for a record with an empty
    /// required field, [`RegistryError::Version`] for a malformed or foreign
    /// version, and [`RegistryError::TableNotFound`] if the table does not exist.
    pub fn validate_record(
        &self,
        table: &str,
        column: &ColumnId,
        record: Option<&FreshenerRecord>,
        overwrite: bool,
    ) -> Result<FailureSet, RegistryError> {
        let Some(record) = record else {
            return Ok(FailureSet::new());
        };
        if let Some(field) = record.missing_field() {
            return Err(RegistryError::InvalidRecord(field));
        }

        let mut failures = FailureSet::new();
        let version = &record.record_version;
        if self.gate.is_too_low(version)? {
            failures.insert(
                ValidationFailure::VersionTooLow,
                format!(
                    "Record version: {version} is older than the minimum supported version: {}",
                    self.gate.min()
                ),
            );
        }
        if self.gate.is_too_high(version)? {
            failures.insert(
                ValidationFailure::VersionTooHigh,
                format!(
                    "Record version: {version} is newer than the maximum supported version: {}",
                    self.gate.max()
                ),
            );
        }

        let layout = self.layout(table)?;
        if !column.is_fully_qualified()
            && layout
                .family(column.family_name())
                .is_some_and(|family| family.group_type)
        {
            failures.insert(
                ValidationFailure::GroupFamilyAttachment,
                group_family_cause(column),
            );
        }
        failures.merge(schema_failures(
            &layout,
            column,
            &record.policy_class,
            &record.score_function_class,
        ));

        if !overwrite {
            let current_keys = self.store.keys(table)?;
            failures.merge(self.validate_attachment(column, &current_keys));
        }
        Ok(failures)
    }

    fn layout(&self, table: &str) -> Result<TableLayout, RegistryError> {
        if !self.store.table_exists(table)? {
            return Err(RegistryError::TableNotFound(table.to_string()));
        }
        Ok(self.store.layout(table)?)
    }
}

fn group_family_cause(column: &ColumnId) -> String {
    format!("Fresheners may not be attached to the group-type family: {column}")
}

fn schema_failures(
    layout: &TableLayout,
    column: &ColumnId,
    policy_class: &str,
    score_function_class: &str,
) -> FailureSet {
    let mut failures = FailureSet::new();
    if !is_valid_class_name(policy_class) {
        failures.insert(
            ValidationFailure::BadPolicyName,
            format!("Policy class name: '{policy_class}' is not a valid class name"),
        );
    }
    if !is_valid_class_name(score_function_class) {
        failures.insert(
            ValidationFailure::BadScoreFunctionName,
            format!("Score function class name: '{score_function_class}' is not a valid class name"),
        );
    }

    match layout.family(column.family_name()) {
        None => failures.insert(
            ValidationFailure::NoColumnInTable,
            format!(
                "Table: {} does not contain family: {}",
                layout.name,
                column.family_name()
            ),
        ),
        Some(family) if family.group_type && !column.is_fully_qualified() => failures.insert(
            ValidationFailure::GroupFamilyAttachment,
            group_family_cause(column),
        ),
        Some(_) if !layout.contains(column) => failures.insert(
            ValidationFailure::NoColumnInTable,
            format!("Table: {} does not contain column: {column}", layout.name),
        ),
        Some(_) => {}
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{record, registry};
    use fresh_core::ValidationFailure as F;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("a.b_c.D2", true)]
    #[case("pkg.Policy", true)]
    #[case("Policy", true)]
    #[case("_a.$b", true)]
    #[case("a..b", false)]
    #[case(".a", false)]
    #[case("a.", false)]
    #[case("", false)]
    #[case("1a.b", false)]
    #[case("a.b-c", false)]
    #[case("a b", false)]
    fn class_name_syntax(#[case] name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_class_name(name), valid, "{name}");
    }

    fn col(name: &str) -> ColumnId {
        ColumnId::parse(name).unwrap()
    }

    fn keys(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn qualified_collides_with_itself_or_family() {
        let registry = registry();
        let validator = registry.validator();

        let same = validator.validate_attachment(
            &col("info:a"),
            &keys(&["fresh.registry.info.a"]),
        );
        assert_eq!(same.kinds(), vec![F::FreshenerAlreadyAttached]);

        let family = validator.validate_attachment(&col("info:a"), &keys(&["fresh.registry.info"]));
        assert_eq!(family.kinds(), vec![F::FreshenerAlreadyAttached]);

        let sibling =
            validator.validate_attachment(&col("info:a"), &keys(&["fresh.registry.info.b"]));
        assert!(sibling.is_empty());
    }

    #[test]
    fn family_collides_with_any_member_and_lists_them() {
        let registry = registry();
        let validator = registry.validator();
        let failures = validator.validate_attachment(
            &col("info"),
            &keys(&[
                "fresh.registry.info.a",
                "fresh.registry.info.b",
                "fresh.registry.info2.c",
                "other.metadata",
            ]),
        );
        let cause = failures.cause(F::FreshenerAlreadyAttached).unwrap();
        assert!(cause.contains("[info:a, info:b]"), "{cause}");
    }

    #[test]
    fn family_prefix_is_not_a_collision() {
        let registry = registry();
        let failures = registry
            .validator()
            .validate_attachment(&col("info"), &keys(&["fresh.registry.info2"]));
        assert!(failures.is_empty());
    }

    #[test]
    fn schema_requires_table() {
        let registry = registry();
        let result = registry
            .validator()
            .validate_schema("missing", &col("info"), "pkg.P", "pkg.S");
        assert!(matches!(result, Err(RegistryError::TableNotFound(_))));
    }

    #[test]
    fn schema_reports_names_independently() {
        let registry = registry();
        let failures = registry
            .validator()
            .validate_schema("T", &col("info:a"), "bad..policy", "bad.")
            .unwrap();
        assert_eq!(failures.kinds(), vec![F::BadPolicyName, F::BadScoreFunctionName]);
    }

    #[rstest]
    #[case("nope:q", vec![F::NoColumnInTable])]
    #[case("nope", vec![F::NoColumnInTable])]
    #[case("model", vec![F::GroupFamilyAttachment])]
    #[case("model:other", vec![F::NoColumnInTable])]
    #[case("model:predictor", vec![])]
    #[case("info", vec![])]
    #[case("info:anything", vec![])]
    fn schema_column_rules(#[case] column: &str, #[case] expected: Vec<F>) {
        let registry = registry();
        let failures = registry
            .validator()
            .validate_schema("T", &col(column), "pkg.Policy", "pkg.Score")
            .unwrap();
        assert_eq!(failures.kinds(), expected);
    }

    #[test]
    fn absent_record_is_valid() {
        let registry = registry();
        let failures = registry
            .validator()
            .validate_record("T", &col("model"), None, false)
            .unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn record_failures_are_aggregated() {
        let registry = registry();
        let mut bad = record();
        bad.record_version = "freshenerrecord-0.2".into();
        bad.policy_class = "not valid".into();
        let failures = registry
            .validator()
            .validate_record("T", &col("model"), Some(&bad), false)
            .unwrap();
        assert_eq!(
            failures.kinds(),
            vec![F::GroupFamilyAttachment, F::BadPolicyName, F::VersionTooHigh]
        );
    }

    #[test]
    fn record_with_foreign_protocol_is_an_error() {
        let registry = registry();
        let mut foreign = record();
        foreign.record_version = "otherrecord-0.1".into();
        let result = registry
            .validator()
            .validate_record("T", &col("info"), Some(&foreign), false);
        assert!(matches!(result, Err(RegistryError::Version(_))));
    }

    #[test]
    fn record_missing_fields_is_an_error() {
        let registry = registry();
        let mut incomplete = record();
        incomplete.score_function_class.clear();
        let result = registry
            .validator()
            .validate_record("T", &col("info"), Some(&incomplete), false);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidRecord("score_function_class"))
        ));
    }

    #[test]
    fn overwrite_skips_collision_check() {
        let registry = registry();
        registry
            .register("T", &col("model:predictor"), &record(), false)
            .unwrap();
        let validator = registry.validator();
        let strict = validator
            .validate_record("T", &col("model:predictor"), Some(&record()), false)
            .unwrap();
        assert_eq!(strict.kinds(), vec![F::FreshenerAlreadyAttached]);
        let lenient = validator
            .validate_record("T", &col("model:predictor"), Some(&record()), true)
            .unwrap();
        assert!(lenient.is_empty());
    }
}
