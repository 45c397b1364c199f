//! Error types for key and identifier operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::MultibaseError;

/// Errors from [`crate::KeyPair::generate`].
#[derive(Debug, Error)]
pub enum KeyError {
    /// The operating system random source failed.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),
}

/// Errors from loading or persisting a private key file.
#[derive(Debug, Error)]
pub enum KeyFileError {
    /// No key file exists at the given path.
    #[error("key file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing the key file failed.
    #[error("key file I/O failed for {}: {source}", path.display())]
    Io {
        /// The key file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The key file does not contain hex.
    #[error("key file is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded key has the wrong length (expected 32).
    #[error("expected 32 private key bytes, got {0}")]
    InvalidSeedLength(usize),

    /// Generating a fresh key failed.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Errors produced when parsing an [`crate::AgentId`] or [`crate::PrincipalId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IdentifierError {
    /// The identifier does not start with the expected namespace.
    #[error("invalid identifier header, expected '{expected}'")]
    InvalidHeader {
        /// The namespace the parser was looking for.
        expected: &'static str,
    },

    /// The identifier body is not valid base58.
    #[error("invalid base58 encoding")]
    InvalidBase58,

    /// The decoded body is not a 32-byte public key.
    #[error("expected 32 public key bytes, got {0}")]
    InvalidKeyLength(usize),
}

impl From<MultibaseError> for IdentifierError {
    fn from(_: MultibaseError) -> Self {
        IdentifierError::InvalidBase58
    }
}

/// Reasons a detached signature failed to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The public key bytes are not a valid ed25519 point.
    #[error("invalid ed25519 public key")]
    InvalidPublicKey,

    /// The signature is not 64 bytes long.
    #[error("expected 64 signature bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// The signature does not match the message under the given key.
    #[error("signature mismatch")]
    Mismatch,
}
