//! Supported record-version window.

use fresh_config::RegistryConfig;
use fresh_core::{ProtocolVersion, VersionError};

/// A closed `[min, max]` interval of record versions within one protocol.
///
/// `max` is the version stamped on records this registry creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    min: ProtocolVersion,
    max: ProtocolVersion,
}

impl VersionGate {
    /// # Errors
    ///
    /// Returns [`VersionError::Malformed`] if either bound does not parse or
    /// `min > max`, and [`VersionError::ProtocolMismatch`] if the bounds name
    /// different protocols.
    pub fn new(min: &str, max: &str) -> Result<Self, VersionError> {
        let min = ProtocolVersion::parse(min)?;
        let max = ProtocolVersion::parse(max)?;
        max.expect_protocol(min.protocol())?;
        if min > max {
            return Err(VersionError::Malformed {
                input: min.to_string(),
                reason: format!("minimum version exceeds maximum '{max}'"),
            });
        }
        Ok(Self { min, max })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self, VersionError> {
        Self::new(&config.min_record_version, &config.max_record_version)
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        self.min.protocol()
    }

    #[must_use]
    pub const fn min(&self) -> &ProtocolVersion {
        &self.min
    }

    #[must_use]
    pub const fn max(&self) -> &ProtocolVersion {
        &self.max
    }

    /// Version string for newly created records.
    #[must_use]
    pub fn current(&self) -> String {
        self.max.to_string()
    }

    /// # Errors
    ///
    /// Returns [`VersionError`] if `version` is malformed or from another protocol.
    pub fn is_too_low(&self, version: &str) -> Result<bool, VersionError> {
        Ok(self.parse(version)? < self.min)
    }

    /// # Errors
    ///
    /// Returns [`VersionError`] if `version` is malformed or from another protocol.
    pub fn is_too_high(&self, version: &str) -> Result<bool, VersionError> {
        Ok(self.parse(version)? > self.max)
    }

    fn parse(&self, version: &str) -> Result<ProtocolVersion, VersionError> {
        let parsed = ProtocolVersion::parse(version)?;
        parsed.expect_protocol(self.protocol())?;
        Ok(parsed)
    }
}
