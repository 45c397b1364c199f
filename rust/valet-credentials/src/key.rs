//! ed25519 key pairs and their on-disk hex form.

use std::{
    fmt,
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use ed25519_dalek::{SigningKey, VerifyingKey};
use signature::Signer;

use crate::{
    error::{KeyError, KeyFileError},
    identifier::{AgentId, PrincipalId},
};

/// Length of an ed25519 private key seed.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Length of an ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// An ed25519 key pair.
///
/// The public key is always derived from the 32-byte private seed, so the
/// two can never disagree.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the operating system's random source.
    ///
    /// # Errors
    ///
    /// Returns an error only if the random source fails.
    pub fn generate() -> Result<Self, KeyError> {
        let mut seed = [0u8; PRIVATE_KEY_LENGTH];
        getrandom::getrandom(&mut seed).map_err(KeyError::Rng)?;
        Ok(Self::from_seed(&seed))
    }

    /// Restore a key pair from its private seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Read a hex-encoded private key from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyFileError::NotFound`] when no file exists at `path`, and
    /// other variants when the file cannot be read or does not hold a
    /// 32-byte hex seed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KeyFileError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => KeyFileError::NotFound(path.to_owned()),
            _ => KeyFileError::Io {
                path: path.to_owned(),
                source,
            },
        })?;

        let bytes = hex::decode(contents.trim())?;
        let seed = <[u8; PRIVATE_KEY_LENGTH]>::try_from(bytes.as_slice())
            .map_err(|_| KeyFileError::InvalidSeedLength(bytes.len()))?;

        Ok(Self::from_seed(&seed))
    }

    /// Load the key at `path`, or generate one and persist it there if the
    /// file does not exist yet.
    ///
    /// # Errors
    ///
    /// Propagates load, generation and save failures.
    pub fn load_or_generate(path: impl AsRef<Path>) -> Result<Self, KeyFileError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(KeyFileError::NotFound(_)) => {
                let key_pair = Self::generate()?;
                key_pair.save(path)?;
                tracing::debug!(path = %path.display(), "generated new key file");
                Ok(key_pair)
            }
            result => result,
        }
    }

    /// Write the private seed to `path` as lowercase hex, creating parent
    /// directories as needed. On unix the file is created with mode `0600`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyFileError::Io`] if the directory or file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), KeyFileError> {
        let path = path.as_ref();
        let io_error = |source| KeyFileError::Io {
            path: path.to_owned(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(io_error)?;
        file.write_all(hex::encode(self.private_key()).as_bytes())
            .map_err(io_error)
    }

    /// The 32-byte private seed.
    #[must_use]
    pub fn private_key(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// The 32-byte public key.
    #[must_use]
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The ed25519 verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// This key pair named as an agent.
    #[must_use]
    pub fn agent_id(&self) -> AgentId {
        AgentId::from_public_key(self.public_key())
    }

    /// This key pair named as a principal.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        PrincipalId::from_public_key(self.public_key())
    }

    /// Sign `message`, returning the 64-byte signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.agent_id().to_string())
            .finish_non_exhaustive()
    }
}

impl From<SigningKey> for KeyPair {
    fn from(signing_key: SigningKey) -> Self {
        Self { signing_key }
    }
}
