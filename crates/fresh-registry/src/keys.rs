//! Mapping between columns and metadata keys.
//!
//! Keys look like `<prefix>.<family>` or `<prefix>.<family>.<qualifier>`.
//! Family names never contain `.`, so the first `.` after the prefix always
//! ends the family and the rest is the qualifier verbatim.

use fresh_core::{ColumnId, CoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMapper {
    prefix: String,
}

impl KeyMapper {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn to_key(&self, column: &ColumnId) -> String {
        match column.qualifier() {
            Some(qualifier) => format!("{}.{}.{qualifier}", self.prefix, column.family_name()),
            None => format!("{}.{}", self.prefix, column.family_name()),
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColumn`] if `key` is not a registry key or
    /// its remainder is not a legal column.
    pub fn from_key(&self, key: &str) -> Result<ColumnId, CoreError> {
        let rest = self.strip(key).ok_or_else(|| CoreError::InvalidColumn {
            name: key.to_string(),
            reason: format!("not a registry key under '{}'", self.prefix),
        })?;
        match rest.split_once('.') {
            Some((family, qualifier)) => ColumnId::qualified(family, qualifier),
            None => ColumnId::family(rest),
        }
    }

    #[must_use]
    pub fn is_registry_key(&self, key: &str) -> bool {
        self.strip(key).is_some()
    }

    fn strip<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.prefix.as_str())?.strip_prefix('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn mapper() -> KeyMapper {
        KeyMapper::new("fresh.registry")
    }

    #[rstest]
    #[case("model", "fresh.registry.model")]
    #[case("model:predictor", "fresh.registry.model.predictor")]
    #[case("info:a.b:c", "fresh.registry.info.a.b:c")]
    fn key_and_back(#[case] column: &str, #[case] key: &str) {
        let column = ColumnId::parse(column).unwrap();
        assert_eq!(mapper().to_key(&column), key);
        assert_eq!(mapper().from_key(key).unwrap(), column);
    }

    #[rstest]
    #[case("fresh.registry.model", true)]
    #[case("fresh.registry", false)]
    #[case("fresh.registryx.model", false)]
    #[case("other.metadata", false)]
    #[case("", false)]
    fn recognizes_registry_keys(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(mapper().is_registry_key(key), expected);
    }

    #[test]
    fn foreign_key_does_not_parse() {
        assert!(mapper().from_key("layout.version").is_err());
    }
}
