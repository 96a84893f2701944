//! Binary encoding of freshener records.
//!
//! Records are encoded with bincode. Maps in [`FreshenerRecord`] are ordered,
//! so equal records always encode to equal bytes.

use fresh_core::FreshenerRecord;

use crate::RegistryError;

/// Encode a record for storage.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidRecord`] if a required field is empty, and
/// [`RegistryError::MalformedRecord`] if serialization fails.
pub fn encode(record: &FreshenerRecord) -> Result<Vec<u8>, RegistryError> {
    if let Some(field) = record.missing_field() {
        return Err(RegistryError::InvalidRecord(field));
    }
    bincode::serialize(record).map_err(|e| RegistryError::MalformedRecord(e.to_string()))
}

/// Decode stored bytes.
///
/// # Errors
///
/// Returns [`RegistryError::MalformedRecord`] if the bytes do not decode to a
/// record or decode to one with an empty required field.
pub fn decode(bytes: &[u8]) -> Result<FreshenerRecord, RegistryError> {
    let record: FreshenerRecord =
        bincode::deserialize(bytes).map_err(|e| RegistryError::MalformedRecord(e.to_string()))?;
    if let Some(field) = record.missing_field() {
        return Err(RegistryError::MalformedRecord(format!(
            "stored record has an empty '{field}'"
        )));
    }
    Ok(record)
}
