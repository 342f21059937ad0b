//! Base64 encode/decode over the standard alphabet with padding.
//!
//! Thin wrappers so callers get a stable keel-local error type instead of
//! the engine's.

use std::fmt;

use ::base64::Engine as _;
use ::base64::engine::general_purpose::STANDARD;

/// Decode failure: the input was not valid standard-alphabet Base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Base64Error(String);

impl fmt::Display for Base64Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid base64: {}", self.0)
    }
}

impl std::error::Error for Base64Error {}

/// Encode bytes as padded standard-alphabet Base64.
#[must_use]
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode padded standard-alphabet Base64.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    STANDARD
        .decode(encoded)
        .map_err(|e| Base64Error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_basic() {
        let data = b"keel support library";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn known_vector() {
        assert_eq!(encode(b"foobar"), "Zm9vYmFy");
        assert_eq!(encode(b"fo"), "Zm8=");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("not base64!!").is_err());
    }
}
