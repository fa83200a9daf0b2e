//! Hex codec for varbinary columns.
//!
//! Remote varbinary values arrive as `0x`-prefixed hex strings and must
//! round-trip byte-for-byte through the database.

use crate::error::MappingError;

/// Decode a `0x`-prefixed hex string into raw bytes.
///
/// `"0x"` alone decodes to an empty byte sequence.
///
/// # Errors
///
/// Returns [`MappingError::InvalidHex`] when the lowercase `0x` prefix is
/// missing, the digit count is odd, or a non-hex character appears.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, MappingError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| MappingError::InvalidHex(raw.to_string()))?;
    hex::decode(digits).map_err(|_| MappingError::InvalidHex(raw.to_string()))
}

/// Encode raw bytes as a `0x`-prefixed lowercase hex string.
///
/// Round-trips through [`decode_hex`]: `decode_hex(&encode_hex(b))? == b`.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
