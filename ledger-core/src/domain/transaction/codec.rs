//! Stable binary encoding for bodies, envelopes and responses.

use crate::foundation::LedgerError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    Ok(bincode::serialize(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LedgerError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Like [`decode`], but the value must consume every input byte. Used when
/// probing which of several untagged shapes a buffer holds.
pub fn decode_exact<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LedgerError> {
    Ok(bincode::DefaultOptions::new().with_fixint_encoding().reject_trailing_bytes().deserialize(bytes)?)
}
