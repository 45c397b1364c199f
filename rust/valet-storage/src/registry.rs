use valet_delegation::{Delegation, DelegationManager, TimeDelta};

use crate::{BlockStore, BlockStoreExt, ContentId, NamePublisher, StorageError};

/// The name the latest delegation is published under by default.
pub const DEFAULT_POINTER_NAME: &str = "valet-delegations";

/// A delegation after it has been stored and announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedDelegation {
    /// The signed delegation.
    pub delegation: Delegation,
    /// Where its JSON is stored.
    pub content_id: ContentId,
    /// The published name that now points at it.
    pub name: String,
}

/// Issues delegations and makes them retrievable.
///
/// Each issue stores the delegation's pretty JSON in the block store, then
/// points the registry's name at it. Neither step is retried; a failed
/// publish leaves the stored block in place and surfaces the error.
pub struct DelegationRegistry<S, P> {
    manager: DelegationManager,
    store: S,
    publisher: P,
    pointer_name: String,
}

impl<S, P> DelegationRegistry<S, P>
where
    S: BlockStore,
    P: NamePublisher,
{
    /// Build a registry publishing under [`DEFAULT_POINTER_NAME`].
    pub fn new(manager: DelegationManager, store: S, publisher: P) -> Self {
        Self::with_pointer_name(manager, store, publisher, DEFAULT_POINTER_NAME)
    }

    /// Build a registry publishing under `pointer_name`.
    pub fn with_pointer_name(
        manager: DelegationManager,
        store: S,
        publisher: P,
        pointer_name: impl Into<String>,
    ) -> Self {
        Self {
            manager,
            store,
            publisher,
            pointer_name: pointer_name.into(),
        }
    }

    /// The manager that signs issued delegations.
    pub fn manager(&self) -> &DelegationManager {
        &self.manager
    }

    /// The name delegations are published under.
    pub fn pointer_name(&self) -> &str {
        &self.pointer_name
    }

    /// Issue, store and publish a delegation for `agent_public_key`.
    pub async fn issue(
        &self,
        agent_public_key: &[u8; 32],
        duration: TimeDelta,
    ) -> Result<PublishedDelegation, StorageError> {
        let delegation = self.manager.create_delegation(agent_public_key, duration)?;
        self.publish(delegation).await
    }

    /// Store and publish an already issued delegation.
    pub async fn publish(&self, delegation: Delegation) -> Result<PublishedDelegation, StorageError> {
        let content_id = self.store.put_json(&delegation).await?;
        let name = self
            .publisher
            .publish(&content_id, &self.pointer_name)
            .await?;

        tracing::debug!(
            agent_id = %delegation.agent_id,
            %content_id,
            %name,
            "published delegation"
        );

        Ok(PublishedDelegation {
            delegation,
            content_id,
            name,
        })
    }

    /// Load the delegation stored under `id`.
    pub async fn fetch(&self, id: &ContentId) -> Result<Delegation, StorageError> {
        self.store.get_json(id).await
    }
}
