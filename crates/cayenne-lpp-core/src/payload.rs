//! Textual payload encodings (hex and base64) as delivered by network
//! servers and typed by operators.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Parse hex text into bytes.
///
/// Whitespace is ignored and an optional `0x` prefix is accepted, so both
/// `03 67 01 10` and `0x03670110` work. Error positions count hex digits
/// only.
pub fn from_hex(text: &str) -> Result<Vec<u8>, PayloadError> {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(digits)?)
}

/// Decode standard (padded) base64 text.
pub fn from_base64(text: &str) -> Result<Vec<u8>, PayloadError> {
    Ok(STANDARD.decode(text.trim())?)
}

/// Render bytes as lowercase hex without separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
