//! Byte-list string encoding used for identity ids and key exports.
//!
//! Keys leave the process as comma-separated decimal byte lists, e.g.
//! `"203,57,32"`. Identity ids are the byte list of the signing public key.

use crate::error::{CoreError, Result};

/// Render bytes as a comma-separated decimal list.
pub fn to_byte_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-separated decimal list back into bytes.
///
/// The empty string parses to an empty vector.
pub fn parse_byte_list(s: &str) -> Result<Vec<u8>> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<u8>()
                .map_err(|e| CoreError::MalformedKey(format!("{:?}: {}", part, e)))
        })
        .collect()
}

/// Parse a byte list that must have exactly `N` entries.
pub fn parse_byte_array<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = parse_byte_list(s)?;
    bytes.as_slice().try_into().map_err(|_| {
        CoreError::MalformedKey(format!("expected {} bytes, got {}", N, bytes.len()))
    })
}
