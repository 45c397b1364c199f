use std::{fmt, str::FromStr};

use base58::{FromBase58, ToBase58};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::StorageError;

/// Length of a [`ContentId`] digest.
pub const CONTENT_ID_LENGTH: usize = 32;

/// The BLAKE3 digest of a block, rendered as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; CONTENT_ID_LENGTH]);

impl ContentId {
    /// Derive the id of `bytes`.
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(bytes.as_ref()).as_bytes())
    }

    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; CONTENT_ID_LENGTH] {
        &self.0
    }
}

impl From<[u8; CONTENT_ID_LENGTH]> for ContentId {
    fn from(digest: [u8; CONTENT_ID_LENGTH]) -> Self {
        Self(digest)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_base58())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({self})")
    }
}

impl FromStr for ContentId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() {
            return Err(StorageError::InvalidContentId(s.to_owned()));
        }
        let bytes = s
            .from_base58()
            .map_err(|_| StorageError::InvalidContentId(s.to_owned()))?;
        <[u8; CONTENT_ID_LENGTH]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| StorageError::InvalidContentId(s.to_owned()))
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_deterministic_and_content_sensitive() {
        assert_eq!(ContentId::of(b"block"), ContentId::of(b"block"));
        assert_ne!(ContentId::of(b"block"), ContentId::of(b"blocks"));
    }

    #[test]
    fn ids_parse_from_their_rendering() {
        let id = ContentId::of(b"block");
        assert_eq!(id.to_string().parse::<ContentId>().unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for input in ["", "0OIl", "abc", "ümlaut"] {
            assert!(input.parse::<ContentId>().is_err(), "{input}");
        }
    }

    #[test]
    fn ids_serialize_as_strings() {
        let id = ContentId::of(b"block");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<ContentId>(&json).unwrap(), id);
    }
}
