//! The persisted freshener record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::ParameterScope;

/// Describes one configuration parameter a policy or score function accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescription {
    /// Declared value type, e.g. `"long"` or `"string"`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub scope: ParameterScope,
}

impl ParameterDescription {
    #[must_use]
    pub fn new(type_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: description.into(),
            required: false,
            default_value: None,
            scope: ParameterScope::default(),
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: ParameterScope) -> Self {
        self.scope = scope;
        self
    }
}

/// A freshener attachment: which policy decides staleness, which score
/// function recomputes the value, and the parameters they are configured with.
///
/// Maps are ordered so that the binary encoding is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshenerRecord {
    /// `<protocol>-<major>.<minor>` version string.
    pub record_version: String,
    /// Dotted identifier of the staleness policy.
    pub policy_class: String,
    /// Dotted identifier of the score function.
    pub score_function_class: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, ParameterDescription>,
}

impl FreshenerRecord {
    #[must_use]
    pub fn new(
        record_version: impl Into<String>,
        policy_class: impl Into<String>,
        score_function_class: impl Into<String>,
    ) -> Self {
        Self {
            record_version: record_version.into(),
            policy_class: policy_class.into(),
            score_function_class: score_function_class.into(),
            parameters: BTreeMap::new(),
            descriptions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_descriptions(
        mut self,
        descriptions: BTreeMap<String, ParameterDescription>,
    ) -> Self {
        self.descriptions = descriptions;
        self
    }

    /// Name of the first required field that is empty, if any.
    ///
    /// A record with a missing field may not be encoded or validated.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.record_version.is_empty() {
            Some("record_version")
        } else if self.policy_class.is_empty() {
            Some("policy_class")
        } else if self.score_function_class.is_empty() {
            Some("score_function_class")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_field_reports_first_empty() {
        let record = FreshenerRecord::new("", "", "");
        assert_eq!(record.missing_field(), Some("record_version"));

        let record = FreshenerRecord::new("freshenerrecord-0.1", "", "pkg.Score");
        assert_eq!(record.missing_field(), Some("policy_class"));

        let record = FreshenerRecord::new("freshenerrecord-0.1", "pkg.Policy", "");
        assert_eq!(record.missing_field(), Some("score_function_class"));

        let record = FreshenerRecord::new("freshenerrecord-0.1", "pkg.Policy", "pkg.Score");
        assert_eq!(record.missing_field(), None);
    }

    #[test]
    fn json_defaults_empty_maps() {
        let json = r#"{
            "record_version": "freshenerrecord-0.1",
            "policy_class": "pkg.Policy",
            "score_function_class": "pkg.Score"
        }"#;
        let record: FreshenerRecord = serde_json::from_str(json).unwrap();
        assert!(record.parameters.is_empty());
        assert!(record.descriptions.is_empty());
    }

    #[test]
    fn description_json_uses_type_key() {
        let desc = ParameterDescription::new("long", "shelf life in ms")
            .required()
            .with_default("1000")
            .with_scope(ParameterScope::Scoring);
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "long",
                "description": "shelf life in ms",
                "required": true,
                "default_value": "1000",
                "scope": "SCORING"
            })
        );
    }
}
