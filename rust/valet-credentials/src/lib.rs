//! Key material and identifiers for VALET principals and agents.
//!
//! A principal delegates authority to an agent; both are plain ed25519 key
//! pairs. This crate provides:
//!
//! - [`KeyPair`]: generation, hex key files, signing
//! - [`AgentId`] / [`PrincipalId`]: the `agent:ed25519:<body>` and
//!   `ed25519:<body>` textual identifiers
//! - [`codec`]: the explicit base64 and base58btc codecs everything else uses
//! - [`verify`]: detached signature verification against a raw public key

#![warn(missing_docs)]

pub mod codec;

mod error;
mod identifier;
mod key;
mod verify;

pub use error::{IdentifierError, KeyError, KeyFileError, VerificationError};
pub use identifier::*;
pub use key::{KeyPair, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
pub use verify::{SIGNATURE_LENGTH, verify};
