use thiserror::Error;
use valet_storage::StorageError;

/// Errors from tracking activity.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// `flush` was called with nothing buffered.
    #[error("No activity records to flush")]
    Empty,

    /// The block store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
