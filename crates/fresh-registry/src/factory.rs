//! Policies, score functions, and the capability table that builds them by name.
//!
//! Instantiating a freshener component by name is a lookup in
//! [`FreshenerFactory`]. Whether a name is syntactically legal is checked
//! separately by the validator and does not depend on this table.

use std::collections::BTreeMap;

use fresh_core::{ColumnId, ParameterDescription};

use crate::RegistryError;

/// What a policy or score function sees during setup.
#[derive(Debug, Clone, Copy)]
pub struct FreshenerContext<'a> {
    table: &'a str,
    column: &'a ColumnId,
    parameters: &'a BTreeMap<String, String>,
}

impl<'a> FreshenerContext<'a> {
    #[must_use]
    pub const fn new(
        table: &'a str,
        column: &'a ColumnId,
        parameters: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            table,
            column,
            parameters,
        }
    }

    #[must_use]
    pub const fn table(&self) -> &'a str {
        self.table
    }

    #[must_use]
    pub const fn column(&self) -> &'a ColumnId {
        self.column
    }

    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&'a str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Parse an optional numeric parameter.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidParameter`] if the value is present but
    /// not an unsigned integer.
    pub fn parameter_u64(&self, key: &str) -> Result<Option<u64>, RegistryError> {
        self.parameter(key)
            .map(|value| {
                value.parse().map_err(|_| RegistryError::InvalidParameter {
                    key: key.to_string(),
                    reason: format!("'{value}' is not an unsigned integer"),
                })
            })
            .transpose()
    }
}

/// Decides whether a stored value is stale.
pub trait FreshnessPolicy: Send + Sync {
    /// Stable dotted identifier recorded as the record's policy class.
    fn name(&self) -> &str;

    /// Parameters this instance contributes as defaults.
    fn serialize_to_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn parameter_descriptions(&self) -> BTreeMap<String, ParameterDescription> {
        BTreeMap::new()
    }

    /// Configure the instance before its parameters are gathered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidParameter`] if a parameter is unusable.
    fn setup(&mut self, _context: &FreshenerContext<'_>) -> Result<(), RegistryError> {
        Ok(())
    }
}

/// Computes a fresh value for a column.
pub trait ScoreFunction: Send + Sync {
    /// Stable dotted identifier recorded as the record's score function class.
    fn name(&self) -> &str;

    fn serialize_to_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn parameter_descriptions(&self) -> BTreeMap<String, ParameterDescription> {
        BTreeMap::new()
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidParameter`] if a parameter is unusable.
    fn setup(&mut self, _context: &FreshenerContext<'_>) -> Result<(), RegistryError> {
        Ok(())
    }
}

type PolicyConstructor = Box<dyn Fn() -> Box<dyn FreshnessPolicy> + Send + Sync>;
type ScoreFunctionConstructor = Box<dyn Fn() -> Box<dyn ScoreFunction> + Send + Sync>;

/// Name-to-constructor tables for policies and score functions.
#[derive(Default)]
pub struct FreshenerFactory {
    policies: BTreeMap<String, PolicyConstructor>,
    score_functions: BTreeMap<String, ScoreFunctionConstructor>,
}

impl FreshenerFactory {
    /// An empty factory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory preloaded with the built-in policies.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        crate::builtins::register(&mut factory);
        factory
    }

    pub fn register_policy<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn FreshnessPolicy> + Send + Sync + 'static,
    {
        self.policies.insert(name.into(), Box::new(constructor));
    }

    pub fn register_score_function<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn ScoreFunction> + Send + Sync + 'static,
    {
        self.score_functions.insert(name.into(), Box::new(constructor));
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownPolicy`] if nothing is registered as `name`.
    pub fn policy(&self, name: &str) -> Result<Box<dyn FreshnessPolicy>, RegistryError> {
        self.policies
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| RegistryError::UnknownPolicy(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownScoreFunction`] if nothing is registered as `name`.
    pub fn score_function(&self, name: &str) -> Result<Box<dyn ScoreFunction>, RegistryError> {
        self.score_functions
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| RegistryError::UnknownScoreFunction(name.to_string()))
    }

    pub fn policy_names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn score_function_names(&self) -> impl Iterator<Item = &str> {
        self.score_functions.keys().map(String::as_str)
    }
}

/// Caller-supplied parameters and descriptions, layered over instance defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterOverrides {
    pub parameters: BTreeMap<String, String>,
    pub descriptions: BTreeMap<String, ParameterDescription>,
}

impl ParameterOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_description(
        mut self,
        key: impl Into<String>,
        description: ParameterDescription,
    ) -> Self {
        self.descriptions.insert(key.into(), description);
        self
    }
}

/// Optionally set up both instances, then merge score function defaults,
/// policy defaults, and overrides, in that order of increasing precedence.
pub(crate) fn merge_parameters(
    context: &FreshenerContext<'_>,
    policy: &mut dyn FreshnessPolicy,
    score_function: &mut dyn ScoreFunction,
    overrides: &ParameterOverrides,
    setup: bool,
) -> Result<ParameterOverrides, RegistryError> {
    if setup {
        policy.setup(context)?;
        score_function.setup(context)?;
    }

    let mut parameters = score_function.serialize_to_parameters();
    parameters.extend(policy.serialize_to_parameters());
    parameters.extend(overrides.parameters.clone());

    let mut descriptions = score_function.parameter_descriptions();
    descriptions.extend(policy.parameter_descriptions());
    descriptions.extend(overrides.descriptions.clone());

    Ok(ParameterOverrides {
        parameters,
        descriptions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ConstantScore;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_names_are_errors() {
        let factory = FreshenerFactory::new();
        assert!(matches!(
            factory.policy("pkg.Missing"),
            Err(RegistryError::UnknownPolicy(_))
        ));
        assert!(matches!(
            factory.score_function("pkg.Missing"),
            Err(RegistryError::UnknownScoreFunction(_))
        ));
    }

    #[test]
    fn builtins_are_listed() {
        let factory = FreshenerFactory::with_builtins();
        assert_eq!(
            factory.policy_names().collect::<Vec<_>>(),
            vec![
                "fresh.policy.AlwaysFreshen",
                "fresh.policy.NeverFreshen",
                "fresh.policy.NewerThan",
                "fresh.policy.ShelfLife",
            ]
        );
        assert_eq!(factory.score_function_names().count(), 0);
    }

    #[test]
    fn overrides_beat_policy_beats_score_function() {
        let factory = FreshenerFactory::with_builtins();
        let mut policy = factory.policy("fresh.policy.ShelfLife").unwrap();
        let mut score = ConstantScore::boxed();
        let column = ColumnId::parse("info:a").unwrap();
        let overrides = ParameterOverrides::new()
            .with_parameter("shelf_life_ms", "10")
            .with_parameter("constant", "caller");
        let context = FreshenerContext::new("T", &column, &overrides.parameters);

        let merged = merge_parameters(
            &context,
            policy.as_mut(),
            score.as_mut(),
            &overrides,
            true,
        )
        .unwrap();

        assert_eq!(merged.parameters.get("constant").map(String::as_str), Some("caller"));
        assert_eq!(merged.parameters.get("shelf_life_ms").map(String::as_str), Some("10"));
        assert!(merged.descriptions.contains_key("shelf_life_ms"));
        assert!(merged.descriptions.contains_key("constant"));
    }

    #[test]
    fn setup_rejects_bad_number() {
        let factory = FreshenerFactory::with_builtins();
        let mut policy = factory.policy("fresh.policy.ShelfLife").unwrap();
        let column = ColumnId::parse("info:a").unwrap();
        let parameters = BTreeMap::from([("shelf_life_ms".to_string(), "soon".to_string())]);
        let context = FreshenerContext::new("T", &column, &parameters);
        assert!(matches!(
            policy.setup(&context),
            Err(RegistryError::InvalidParameter { .. })
        ));
    }
}
