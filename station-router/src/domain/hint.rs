//! Engine hint tokens.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Error returned when a hint token is not valid URL-safe base64.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hint: {reason}")]
pub struct InvalidHint {
    reason: &'static str,
}

/// Opaque locator the routing engine hands out for a snapped point.
///
/// Passing it back with a later query lets the engine skip its own nearest
/// search for that position. The content is engine-internal; the only thing
/// checked here is that it is non-empty URL-safe base64, which is what OSRM
/// emits.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hint(String);

impl Hint {
    /// Parse a hint token, accepting it with or without `=` padding.
    pub fn parse(s: &str) -> Result<Self, InvalidHint> {
        let unpadded = s.trim_end_matches('=');
        if unpadded.is_empty() {
            return Err(InvalidHint {
                reason: "must not be empty",
            });
        }

        URL_SAFE_NO_PAD
            .decode(unpadded)
            .map_err(|_| InvalidHint {
                reason: "must be URL-safe base64",
            })?;

        Ok(Hint(s.to_string()))
    }

    /// Build a hint from raw bytes.
    pub fn encode(bytes: &[u8]) -> Self {
        Hint(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Decode the token back into bytes.
    pub fn decode(&self) -> Result<Vec<u8>, InvalidHint> {
        URL_SAFE_NO_PAD
            .decode(self.0.trim_end_matches('='))
            .map_err(|_| InvalidHint {
                reason: "must be URL-safe base64",
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hint {
    type Error = InvalidHint;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Hint::parse(&s)
    }
}

impl From<Hint> for String {
    fn from(h: Hint) -> Self {
        h.0
    }
}

impl fmt::Debug for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hint({})", self.0)
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_osrm_style_hint() {
        let raw = "uQcAgP___38AAAAAJgAAAAAAAAAAAAAA";
        let hint = Hint::parse(raw).unwrap();
        assert_eq!(hint.as_str(), raw);
    }

    #[test]
    fn parse_accepts_padding() {
        assert!(Hint::parse("bm9kZTox").is_ok());
        assert!(Hint::parse("bm9kZQ==").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(Hint::parse("").is_err());
        assert!(Hint::parse("==").is_err());
    }

    #[test]
    fn reject_non_base64() {
        assert!(Hint::parse("not a hint!").is_err());
        assert!(Hint::parse("abc+/def").is_err());
    }

    #[test]
    fn encode_decode() {
        let hint = Hint::encode(b"node:42");
        assert_eq!(hint.decode().unwrap(), b"node:42");
        assert!(Hint::parse(hint.as_str()).is_ok());
    }

    #[test]
    fn serde_validates() {
        let hint: Hint = serde_json::from_str("\"bm9kZTox\"").unwrap();
        assert_eq!(hint.as_str(), "bm9kZTox");
        assert!(serde_json::from_str::<Hint>("\"\"").is_err());
    }
}
