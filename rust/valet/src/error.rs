use thiserror::Error;
use valet_credentials::KeyFileError;
use valet_delegation::DelegationError;
use valet_signer::SignerError;
use valet_storage::StorageError;

use crate::config::ConfigError;

/// Errors from wiring an agent together.
#[derive(Debug, Error)]
pub enum ValetError {
    /// The configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The agent key could not be loaded or created.
    #[error(transparent)]
    Key(#[from] KeyFileError),

    /// A delegation could not be issued, for example from an invalid
    /// configured duration.
    #[error(transparent)]
    Delegation(#[from] DelegationError),

    /// A request could not be signed.
    #[error(transparent)]
    Signer(#[from] SignerError),

    /// The block store could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A request was signed before any delegation was installed.
    #[error("no delegation installed; set one before signing requests")]
    NoDelegation,
}
