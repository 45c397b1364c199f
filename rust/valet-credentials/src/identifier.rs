//! Textual identifiers for agents and principals.
//!
//! ```text
//! agent:ed25519:<body>     agent identifier
//! ed25519:<body>           principal identifier
//! ```
//!
//! `<body>` is the base58btc encoding of the raw 32-byte public key, i.e.
//! the multibase form with its leading `z` removed (see
//! [`crate::codec::encode_identifier_body`]).

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    codec::{decode_identifier_body, encode_identifier_body},
    error::IdentifierError,
    key::PUBLIC_KEY_LENGTH,
};

/// Namespace prefix of agent identifiers.
pub const AGENT_ID_PREFIX: &str = "agent:ed25519:";

/// Namespace prefix of principal identifiers.
pub const PRINCIPAL_ID_PREFIX: &str = "ed25519:";

fn encode(prefix: &str, public_key: &[u8; PUBLIC_KEY_LENGTH]) -> String {
    format!("{prefix}{}", encode_identifier_body(public_key))
}

fn decode(
    prefix: &'static str,
    identifier: &str,
) -> Result<[u8; PUBLIC_KEY_LENGTH], IdentifierError> {
    let body = identifier
        .strip_prefix(prefix)
        .ok_or(IdentifierError::InvalidHeader { expected: prefix })?;
    let bytes = decode_identifier_body(body)?;
    <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice())
        .map_err(|_| IdentifierError::InvalidKeyLength(bytes.len()))
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $prefix:ident, $expecting:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; PUBLIC_KEY_LENGTH]);

        impl $name {
            /// Wrap a raw public key.
            #[must_use]
            pub const fn from_public_key(public_key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
                Self(public_key)
            }

            /// The raw public key this identifier names.
            #[must_use]
            pub const fn public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
                &self.0
            }
        }

        impl From<[u8; PUBLIC_KEY_LENGTH]> for $name {
            fn from(public_key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
                Self(public_key)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&encode($prefix, &self.0))
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode($prefix, s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct IdentifierVisitor;

                impl serde::de::Visitor<'_> for IdentifierVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: serde::de::Error,
                    {
                        v.parse().map_err(E::custom)
                    }
                }

                deserializer.deserialize_str(IdentifierVisitor)
            }
        }
    };
}

identifier!(
    /// An `agent:ed25519:<body>` identifier.
    AgentId,
    AGENT_ID_PREFIX,
    "an agent:ed25519 identifier"
);

identifier!(
    /// An `ed25519:<body>` identifier.
    PrincipalId,
    PRINCIPAL_ID_PREFIX,
    "an ed25519 principal identifier"
);

/// Encode a public key as an agent identifier string.
#[must_use]
pub fn agent_id_from_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> String {
    AgentId::from_public_key(*public_key).to_string()
}

/// Encode a public key as a principal identifier string.
#[must_use]
pub fn principal_id_from_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH]) -> String {
    PrincipalId::from_public_key(*public_key).to_string()
}

/// Decode an agent identifier string back into its public key.
///
/// # Errors
///
/// Fails if the header is not `agent:ed25519:`, the body is not base58, or
/// the body does not decode to exactly 32 bytes.
pub fn public_key_from_agent_id(
    agent_id: &str,
) -> Result<[u8; PUBLIC_KEY_LENGTH], IdentifierError> {
    decode(AGENT_ID_PREFIX, agent_id)
}

/// Decode a principal identifier string back into its public key.
///
/// # Errors
///
/// Fails if the header is not `ed25519:`, the body is not base58, or the
/// body does not decode to exactly 32 bytes.
pub fn public_key_from_principal_id(
    principal_id: &str,
) -> Result<[u8; PUBLIC_KEY_LENGTH], IdentifierError> {
    decode(PRINCIPAL_ID_PREFIX, principal_id)
}
