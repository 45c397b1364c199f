use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;

use crate::{ContentId, StorageError};

/// A store of immutable blocks addressed by their [`ContentId`].
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Store `bytes` and return their id. Storing the same bytes twice
    /// returns the same id.
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentId, StorageError>;

    /// Retrieve the block stored under `id`, if any.
    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError>;
}

#[async_trait]
impl<T> BlockStore for Arc<T>
where
    T: BlockStore + ?Sized,
{
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentId, StorageError> {
        self.as_ref().put(bytes).await
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError> {
        self.as_ref().get(id).await
    }
}

/// JSON helpers available on every [`BlockStore`].
#[async_trait]
pub trait BlockStoreExt: BlockStore {
    /// Store `value` as pretty-printed JSON.
    async fn put_json<T>(&self, value: &T) -> Result<ContentId, StorageError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.put(bytes).await
    }

    /// Fetch and deserialize the JSON block at `id`.
    ///
    /// A missing block is [`StorageError::NotFound`].
    async fn get_json<T>(&self, id: &ContentId) -> Result<T, StorageError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get(id).await?.ok_or(StorageError::NotFound(*id))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl<S> BlockStoreExt for S where S: BlockStore + ?Sized {}

/// A [`BlockStore`] backed by a [`HashMap`]; blocks live only as long as the
/// store and its clones.
#[derive(Clone, Default)]
pub struct MemoryBlockStore {
    blocks: Arc<RwLock<HashMap<ContentId, Vec<u8>>>>,
}

impl MemoryBlockStore {
    /// The number of distinct blocks held.
    pub async fn len(&self) -> usize {
        self.blocks.read().await.len()
    }

    /// Whether the store holds no blocks.
    pub async fn is_empty(&self) -> bool {
        self.blocks.read().await.is_empty()
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentId, StorageError> {
        let id = ContentId::of(&bytes);
        self.blocks.write().await.entry(id).or_insert(bytes);
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.blocks.read().await.get(id).cloned())
    }
}

/// A [`BlockStore`] that keeps each block in a file under a root directory,
/// named after its base58 id.
///
/// Blocks are re-hashed on read, so a file that was altered on disk is
/// reported as [`StorageError::Verification`] rather than returned. Every
/// `put` rewrites the file through a staging file and a rename, so putting
/// the right bytes again repairs a damaged block.
#[derive(Clone, Debug)]
pub struct FileSystemBlockStore {
    root_dir: PathBuf,
}

impl FileSystemBlockStore {
    /// Open a store rooted at `root_dir`, creating the directory if needed.
    pub async fn new(root_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root_dir = root_dir.as_ref().to_owned();
        tokio::fs::create_dir_all(&root_dir)
            .await
            .map_err(|error| StorageError::Backend(format!("{error}")))?;
        Ok(Self { root_dir })
    }

    /// The directory blocks are written to.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn make_path(&self, id: &ContentId) -> PathBuf {
        self.root_dir.join(id.to_string())
    }

    // Unique per process and call, so concurrent puts never share one.
    fn make_staging_path(&self, id: &ContentId) -> PathBuf {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let sequence = NEXT.fetch_add(1, Ordering::Relaxed);
        self.root_dir
            .join(format!(".{id}.{}.{sequence}.tmp", std::process::id()))
    }
}

#[async_trait]
impl BlockStore for FileSystemBlockStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<ContentId, StorageError> {
        let id = ContentId::of(&bytes);
        let path = self.make_path(&id);
        let staging = self.make_staging_path(&id);

        let written = match tokio::fs::write(&staging, bytes).await {
            Ok(()) => tokio::fs::rename(&staging, &path).await,
            Err(error) => Err(error),
        };
        if let Err(error) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                tracing::debug!(path = %staging.display(), %cleanup, "staging file not removed");
            }
            return Err(StorageError::Backend(format!("{error}")));
        }

        tracing::debug!(%id, path = %path.display(), "wrote block");
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>, StorageError> {
        let bytes = match tokio::fs::read(self.make_path(id)).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StorageError::Backend(format!("{error}"))),
        };

        let actual = ContentId::of(&bytes);
        if actual != *id {
            return Err(StorageError::Verification {
                expected: *id,
                actual,
            });
        }
        Ok(Some(bytes))
    }
}
