use thiserror::Error;
use valet_delegation::DelegationError;

use crate::ContentId;

/// The error type shared by stores, publishers and the registry.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying storage substrate failed.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A stored block does not hash to the id it was stored under.
    #[error("Block {expected} failed verification, content hashes to {actual}")]
    Verification {
        /// The id the block was requested by.
        expected: ContentId,
        /// The id its bytes actually hash to.
        actual: ContentId,
    },

    /// No block exists for the id.
    #[error("Block {0} not found")]
    NotFound(ContentId),

    /// A content id string could not be parsed.
    #[error("Invalid content id: {0}")]
    InvalidContentId(String),

    /// Publishing a name pointer failed.
    #[error("Failed to publish {name}: {reason}")]
    Publish {
        /// The name being published.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A block could not be encoded or decoded as JSON.
    #[error("Failed to encode or decode a block: {0}")]
    Json(#[from] serde_json::Error),

    /// Issuing a delegation failed.
    #[error(transparent)]
    Delegation(#[from] DelegationError),
}
