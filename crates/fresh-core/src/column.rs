//! Column addressing.
//!
//! A column is addressed by a family and an optional qualifier. The textual
//! form is `family` for a whole family and `family:qualifier` for a single
//! column. Family names are restricted to `[A-Za-z_][A-Za-z0-9_]*` so that
//! they never contain the separators used by metadata keys; qualifiers are
//! free-form but must be non-empty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Separator between family and qualifier in the textual column form.
pub const QUALIFIER_SEPARATOR: char = ':';

/// A family-only or fully-qualified column identifier.
///
/// Family-only identifiers mean "every qualifier under this family".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnId {
    family: String,
    qualifier: Option<String>,
}

impl ColumnId {
    /// Build a family-only identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidColumn` if `family` is not a legal family name.
    pub fn family(family: impl Into<String>) -> Result<Self, CoreError> {
        let family = family.into();
        check_family(&family, &family)?;
        Ok(Self {
            family,
            qualifier: None,
        })
    }

    /// Build a fully-qualified identifier.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidColumn` if the family is illegal or the
    /// qualifier is empty.
    pub fn qualified(
        family: impl Into<String>,
        qualifier: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let family = family.into();
        let qualifier = qualifier.into();
        let display = format!("{family}{QUALIFIER_SEPARATOR}{qualifier}");
        check_family(&family, &display)?;
        if qualifier.is_empty() {
            return Err(CoreError::InvalidColumn {
                name: display,
                reason: "qualifier may not be empty".to_string(),
            });
        }
        Ok(Self {
            family,
            qualifier: Some(qualifier),
        })
    }

    /// Parse `family` or `family:qualifier`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidColumn` for malformed names.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name.split_once(QUALIFIER_SEPARATOR) {
            Some((family, qualifier)) => Self::qualified(family, qualifier),
            None => Self::family(name),
        }
    }

    #[must_use]
    pub fn family_name(&self) -> &str {
        &self.family
    }

    #[must_use]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Whether this identifier names a single column rather than a family.
    #[must_use]
    pub const fn is_fully_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    /// The family-only identifier for this column's family.
    #[must_use]
    pub fn family_column(&self) -> Self {
        Self {
            family: self.family.clone(),
            qualifier: None,
        }
    }
}

fn check_family(family: &str, display: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidColumn {
        name: display.to_string(),
        reason: reason.to_string(),
    };
    let mut chars = family.chars();
    match chars.next() {
        None => return Err(invalid("family may not be empty")),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return Err(invalid("family must start with a letter or '_'"));
        }
        Some(_) => {}
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(invalid("family may only contain letters, digits and '_'"))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}{QUALIFIER_SEPARATOR}{qualifier}", self.family),
            None => f.write_str(&self.family),
        }
    }
}

impl FromStr for ColumnId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColumnId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColumnId> for String {
    fn from(value: ColumnId) -> Self {
        value.to_string()
    }
}
