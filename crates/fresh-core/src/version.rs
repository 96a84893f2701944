//! Protocol version strings of the form `<protocol>-<major>[.<minor>[.<revision>]]`.
//!
//! Two versions are only comparable when their protocol names match;
//! `PartialOrd` returns `None` across protocols.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing or comparing protocol versions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    /// The string is not `<protocol>-<major>[.<minor>[.<revision>]]`.
    #[error("Malformed protocol version '{input}': {reason}")]
    Malformed { input: String, reason: String },

    /// The version belongs to a different protocol.
    #[error("Protocol mismatch: expected '{expected}', found '{found}' in '{version}'")]
    ProtocolMismatch {
        expected: String,
        found: String,
        version: String,
    },
}

/// A parsed protocol version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    protocol: String,
    major: u32,
    minor: u32,
    revision: u32,
}

impl ProtocolVersion {
    #[must_use]
    pub fn new(protocol: impl Into<String>, major: u32, minor: u32) -> Self {
        Self {
            protocol: protocol.into(),
            major,
            minor,
            revision: 0,
        }
    }

    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::Malformed` if the protocol name is empty or the
    /// numeric part has more than three components or a non-numeric component.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let malformed = |reason: &str| VersionError::Malformed {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (protocol, numbers) = input
            .rsplit_once('-')
            .ok_or_else(|| malformed("missing '-' between protocol and version"))?;
        if protocol.is_empty() {
            return Err(malformed("protocol name is empty"));
        }

        let parts = numbers
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| malformed("version components must be unsigned integers"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if parts.len() > 3 {
            return Err(malformed("at most three version components are allowed"));
        }

        Ok(Self {
            protocol: protocol.to_string(),
            major: parts[0],
            minor: parts.get(1).copied().unwrap_or(0),
            revision: parts.get(2).copied().unwrap_or(0),
        })
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    #[must_use]
    pub const fn revision(&self) -> u32 {
        self.revision
    }

    /// Fail unless this version belongs to `protocol`.
    ///
    /// # Errors
    ///
    /// Returns `VersionError::ProtocolMismatch` when the names differ.
    pub fn expect_protocol(&self, protocol: &str) -> Result<(), VersionError> {
        if self.protocol == protocol {
            Ok(())
        } else {
            Err(VersionError::ProtocolMismatch {
                expected: protocol.to_string(),
                found: self.protocol.clone(),
                version: self.to_string(),
            })
        }
    }

    const fn numeric(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.revision)
    }
}

impl PartialOrd for ProtocolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.protocol == other.protocol).then(|| self.numeric().cmp(&other.numeric()))
    }
}

/// Canonical form: the revision is omitted when it is zero.
impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.protocol, self.major, self.minor)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        Ok(())
    }
}

impl FromStr for ProtocolVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
