//! Detached ed25519 signature verification.

use ed25519_dalek::{Signature, VerifyingKey};
use signature::Verifier;

use crate::{error::VerificationError, key::PUBLIC_KEY_LENGTH};

/// Length of an ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Verify `signature` over `message` under the raw `public_key`.
///
/// # Errors
///
/// Reports why verification failed. Callers on untrusted input usually
/// collapse this to a boolean.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature: &[u8],
) -> Result<(), VerificationError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key).map_err(|_| VerificationError::InvalidPublicKey)?;
    let signature = <[u8; SIGNATURE_LENGTH]>::try_from(signature)
        .map_err(|_| VerificationError::InvalidSignatureLength(signature.len()))?;

    verifying_key
        .verify(message, &Signature::from_bytes(&signature))
        .map_err(|_| VerificationError::Mismatch)
}
