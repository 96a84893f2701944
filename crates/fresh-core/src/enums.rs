//! Validation failure kinds and parameter scopes.
//!
//! Both enums serialize in `SCREAMING_SNAKE_CASE`, which is also the form
//! `as_str()` returns and the form printed in aggregated validation messages.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ValidationFailure
// ---------------------------------------------------------------------------

/// A single reason an attachment is not legal.
///
/// Failures are never raised one at a time; they are collected into a
/// [`crate::FailureSet`] so a caller sees every problem in a single pass.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationFailure {
    /// A family-only attachment was requested on a group-type family.
    GroupFamilyAttachment,
    /// The policy identifier is not a valid dotted identifier.
    BadPolicyName,
    /// The score function identifier is not a valid dotted identifier.
    BadScoreFunctionName,
    /// Another freshener already covers the requested column.
    FreshenerAlreadyAttached,
    /// The family or qualifier does not exist in the table layout.
    NoColumnInTable,
    /// The record version is below the supported minimum.
    VersionTooLow,
    /// The record version is above the supported maximum.
    VersionTooHigh,
}

impl ValidationFailure {
    /// Every failure kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::GroupFamilyAttachment,
        Self::BadPolicyName,
        Self::BadScoreFunctionName,
        Self::FreshenerAlreadyAttached,
        Self::NoColumnInTable,
        Self::VersionTooLow,
        Self::VersionTooHigh,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GroupFamilyAttachment => "GROUP_FAMILY_ATTACHMENT",
            Self::BadPolicyName => "BAD_POLICY_NAME",
            Self::BadScoreFunctionName => "BAD_SCORE_FUNCTION_NAME",
            Self::FreshenerAlreadyAttached => "FRESHENER_ALREADY_ATTACHED",
            Self::NoColumnInTable => "NO_COLUMN_IN_TABLE",
            Self::VersionTooLow => "VERSION_TOO_LOW",
            Self::VersionTooHigh => "VERSION_TOO_HIGH",
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ParameterScope
// ---------------------------------------------------------------------------

/// Which phase of the freshening pipeline reads a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterScope {
    Setup,
    Scoring,
    #[default]
    SetupAndScoring,
}

impl ParameterScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "SETUP",
            Self::Scoring => "SCORING",
            Self::SetupAndScoring => "SETUP_AND_SCORING",
        }
    }
}

impl fmt::Display for ParameterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
