//! Byte codecs shared by identifiers, delegations and request signatures.
//!
//! Identifiers use base58btc in its multibase form, but with the single
//! leading multibase marker (`z`) removed. The rule is applied in exactly one
//! place: [`encode_identifier_body`] strips the marker and
//! [`decode_identifier_body`] puts it back before decoding.

use base58::{FromBase58, ToBase58};
use base64::prelude::*;
use thiserror::Error;

/// The multibase marker character for base58btc.
pub const BASE58BTC_PREFIX: char = 'z';

/// Errors produced while decoding a multibase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MultibaseError {
    /// The string does not start with the base58btc marker.
    #[error("missing base58btc multibase prefix '{BASE58BTC_PREFIX}'")]
    MissingPrefix,

    /// The payload is not valid base58.
    #[error("invalid base58 encoding")]
    InvalidBase58,
}

/// Encode bytes as standard, padded base64.
pub fn encode_base64(bytes: impl AsRef<[u8]>) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode standard, padded base64.
///
/// # Errors
///
/// Returns the underlying [`base64::DecodeError`] for malformed input.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64_STANDARD.decode(encoded)
}

/// Encode bytes as a base58btc multibase string (`z` followed by base58).
pub fn encode_multibase(bytes: &[u8]) -> String {
    format!("{BASE58BTC_PREFIX}{}", bytes.to_base58())
}

/// Decode a base58btc multibase string.
///
/// # Errors
///
/// Fails when the marker is missing or the payload is not base58.
pub fn decode_multibase(encoded: &str) -> Result<Vec<u8>, MultibaseError> {
    let payload = encoded
        .strip_prefix(BASE58BTC_PREFIX)
        .ok_or(MultibaseError::MissingPrefix)?;
    if !payload.is_ascii() {
        return Err(MultibaseError::InvalidBase58);
    }
    payload
        .from_base58()
        .map_err(|_| MultibaseError::InvalidBase58)
}

/// Encode bytes as an identifier body: multibase base58btc without its
/// leading marker.
pub fn encode_identifier_body(bytes: &[u8]) -> String {
    let multibase = encode_multibase(bytes);
    multibase
        .strip_prefix(BASE58BTC_PREFIX)
        .unwrap_or(&multibase)
        .to_owned()
}

/// Decode an identifier body produced by [`encode_identifier_body`].
///
/// # Errors
///
/// Fails when the body is not valid base58.
pub fn decode_identifier_body(body: &str) -> Result<Vec<u8>, MultibaseError> {
    decode_multibase(&format!("{BASE58BTC_PREFIX}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_strips_exactly_one_marker_from_the_multibase_form() {
        let bytes = [7u8; 32];
        let multibase = encode_multibase(&bytes);
        let body = encode_identifier_body(&bytes);

        assert_eq!(multibase.len(), body.len() + 1);
        assert_eq!(&multibase[1..], body);
    }

    #[test]
    fn it_keeps_leading_zero_bytes() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;

        let body = encode_identifier_body(&bytes);
        assert!(body.starts_with("1111"));
        assert_eq!(decode_identifier_body(&body).unwrap(), bytes.to_vec());
    }

    #[test]
    fn it_rejects_multibase_without_marker() {
        assert_eq!(
            decode_multibase("abc"),
            Err(MultibaseError::MissingPrefix)
        );
    }

    #[test]
    fn it_rejects_characters_outside_the_bitcoin_alphabet() {
        // '0', 'O', 'I' and 'l' are excluded from base58btc
        assert_eq!(
            decode_identifier_body("0OIl"),
            Err(MultibaseError::InvalidBase58)
        );
    }

    #[test]
    fn it_encodes_padded_standard_base64() {
        assert_eq!(encode_base64(b"testsig"), "dGVzdHNpZw==");
        assert_eq!(decode_base64("dGVzdHNpZw==").unwrap(), b"testsig");
        assert!(decode_base64("not base64!").is_err());
    }
}
