use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{ContentId, StorageError};

/// Prefix of the names returned by [`NamePublisher::publish`].
pub const NAME_PREFIX: &str = "/ipns/";

/// Format the published path for `name`.
pub fn published_path(name: &str) -> String {
    format!("{NAME_PREFIX}{name}")
}

/// Points a stable, mutable name at the latest content id.
#[async_trait]
pub trait NamePublisher: Send + Sync {
    /// Point `name` at `id` and return the resolvable path, e.g.
    /// `/ipns/valet-delegations`.
    async fn publish(&self, id: &ContentId, name: &str) -> Result<String, StorageError>;
}

#[async_trait]
impl<T> NamePublisher for Arc<T>
where
    T: NamePublisher + ?Sized,
{
    async fn publish(&self, id: &ContentId, name: &str) -> Result<String, StorageError> {
        self.as_ref().publish(id, name).await
    }
}

/// A [`NamePublisher`] that keeps the latest pointer per name in memory.
#[derive(Clone, Default)]
pub struct MemoryNamePublisher {
    pointers: Arc<RwLock<HashMap<String, ContentId>>>,
}

impl MemoryNamePublisher {
    /// The id `name` currently points at.
    pub async fn resolve(&self, name: &str) -> Option<ContentId> {
        self.pointers.read().await.get(name).copied()
    }
}

#[async_trait]
impl NamePublisher for MemoryNamePublisher {
    async fn publish(&self, id: &ContentId, name: &str) -> Result<String, StorageError> {
        self.pointers.write().await.insert(name.to_owned(), *id);
        tracing::debug!(%id, name, "published name");
        Ok(published_path(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn the_latest_publish_wins() -> Result<()> {
        let publisher = MemoryNamePublisher::default();
        let first = ContentId::of(b"first");
        let second = ContentId::of(b"second");

        assert_eq!(
            publisher.publish(&first, "valet-delegations").await?,
            "/ipns/valet-delegations"
        );
        publisher.publish(&second, "valet-delegations").await?;

        assert_eq!(publisher.resolve("valet-delegations").await, Some(second));
        assert_eq!(publisher.resolve("other").await, None);
        Ok(())
    }
}
