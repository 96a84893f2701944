//! Aggregated validation results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::ValidationFailure;

/// The set of validation failures for one proposed attachment, each with a
/// human-readable cause.
///
/// At most one cause is kept per failure kind; inserting or merging a kind
/// that is already present replaces its cause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureSet(BTreeMap<ValidationFailure, String>);

impl FailureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ValidationFailure, cause: impl Into<String>) {
        self.0.insert(kind, cause.into());
    }

    /// Union `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains(&self, kind: ValidationFailure) -> bool {
        self.0.contains_key(&kind)
    }

    #[must_use]
    pub fn cause(&self, kind: ValidationFailure) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// The failure kinds present, in a stable order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ValidationFailure> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ValidationFailure, &str)> {
        self.0.iter().map(|(kind, cause)| (*kind, cause.as_str()))
    }
}

impl FromIterator<(ValidationFailure, String)> for FailureSet {
    fn from_iter<I: IntoIterator<Item = (ValidationFailure, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One `KIND: cause` line per failure.
impl fmt::Display for FailureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (kind, cause)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{kind}: {cause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn merge_unions_kinds() {
        let mut left = FailureSet::new();
        left.insert(ValidationFailure::BadPolicyName, "bad policy");
        let mut right = FailureSet::new();
        right.insert(ValidationFailure::NoColumnInTable, "no column");
        right.insert(ValidationFailure::BadPolicyName, "bad policy again");

        left.merge(right);
        assert_eq!(
            left.kinds(),
            vec![
                ValidationFailure::BadPolicyName,
                ValidationFailure::NoColumnInTable
            ]
        );
        assert_eq!(
            left.cause(ValidationFailure::BadPolicyName),
            Some("bad policy again")
        );
    }

    #[test]
    fn display_lists_every_failure() {
        let mut set = FailureSet::new();
        set.insert(ValidationFailure::VersionTooHigh, "too new");
        set.insert(ValidationFailure::GroupFamilyAttachment, "group family");
        assert_eq!(
            set.to_string(),
            "GROUP_FAMILY_ATTACHMENT: group family\nVERSION_TOO_HIGH: too new"
        );
    }

    #[test]
    fn json_is_a_kind_keyed_object() {
        let mut set = FailureSet::new();
        set.insert(ValidationFailure::FreshenerAlreadyAttached, "taken");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!({"FRESHENER_ALREADY_ATTACHED": "taken"}));
    }
}
