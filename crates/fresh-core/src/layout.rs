//! Table schema view consulted during validation.
//!
//! Group-type families declare their qualifiers up front; map-type families
//! accept any qualifier and declare none.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::errors::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyLayout {
    /// Whether qualifiers are declared by the schema rather than free-form.
    #[serde(default)]
    pub group_type: bool,
    /// Declared qualifiers. Always empty for map-type families.
    #[serde(default)]
    pub qualifiers: BTreeSet<String>,
}

impl FamilyLayout {
    #[must_use]
    pub fn group<I, S>(qualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_type: true,
            qualifiers: qualifiers.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn map() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub name: String,
    #[serde(default)]
    pub families: BTreeMap<String, FamilyLayout>,
}

impl TableLayout {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            families: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_family(mut self, family: impl Into<String>, layout: FamilyLayout) -> Self {
        self.families.insert(family.into(), layout);
        self
    }

    #[must_use]
    pub fn family(&self, family: &str) -> Option<&FamilyLayout> {
        self.families.get(family)
    }

    /// Whether the schema declares `column`.
    ///
    /// A family-only column exists when its family exists. A qualified column
    /// in a group family must be declared; in a map family any qualifier exists.
    #[must_use]
    pub fn contains(&self, column: &ColumnId) -> bool {
        match (self.family(column.family_name()), column.qualifier()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(family), Some(qualifier)) => {
                !family.group_type || family.qualifiers.contains(qualifier)
            }
        }
    }

    /// Check naming rules and group/map consistency.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidLayout` for an empty table name, an illegal
    /// family name, an empty qualifier, or a map family declaring qualifiers.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::InvalidLayout {
            table: self.name.clone(),
            reason,
        };
        if self.name.is_empty() {
            return Err(invalid("table name may not be empty".to_string()));
        }
        for (name, family) in &self.families {
            ColumnId::family(name.as_str()).map_err(|e| invalid(e.to_string()))?;
            if !family.group_type && !family.qualifiers.is_empty() {
                return Err(invalid(format!(
                    "map-type family '{name}' may not declare qualifiers"
                )));
            }
            if family.qualifiers.iter().any(String::is_empty) {
                return Err(invalid(format!("family '{name}' declares an empty qualifier")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TableLayout {
        TableLayout::new("T")
            .with_family("model", FamilyLayout::group(["predictor"]))
            .with_family("info", FamilyLayout::map())
    }

    #[test]
    fn contains_respects_family_type() {
        let layout = layout();
        assert!(layout.contains(&ColumnId::parse("model").unwrap()));
        assert!(layout.contains(&ColumnId::parse("model:predictor").unwrap()));
        assert!(!layout.contains(&ColumnId::parse("model:other").unwrap()));
        assert!(layout.contains(&ColumnId::parse("info:anything").unwrap()));
        assert!(!layout.contains(&ColumnId::parse("missing:q").unwrap()));
    }

    #[test]
    fn validate_accepts_well_formed_layout() {
        assert!(layout().validate().is_ok());
    }

    #[test]
    fn validate_rejects_map_family_with_qualifiers() {
        let mut bad = layout();
        bad.families.insert(
            "info".to_string(),
            FamilyLayout {
                group_type: false,
                qualifiers: ["q".to_string()].into(),
            },
        );
        assert!(matches!(bad.validate(), Err(CoreError::InvalidLayout { .. })));
    }

    #[test]
    fn validate_rejects_bad_family_name() {
        let bad = layout().with_family("bad-name", FamilyLayout::map());
        assert!(bad.validate().is_err());
    }

    #[test]
    fn layout_deserializes_from_json() {
        let json = r#"{
            "name": "T",
            "families": {
                "model": {"group_type": true, "qualifiers": ["predictor"]},
                "info": {}
            }
        }"#;
        let parsed: TableLayout = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, layout());
    }
}
