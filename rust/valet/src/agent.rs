use valet_activity::{ActivitySource, ActivityTracker};
use valet_credentials::{AgentId, KeyPair};
use valet_delegation::{Delegation, DelegationManager};
use valet_signer::{RequestSigner, SignedRequest};
use valet_storage::{BlockStore, DelegationRegistry, FileSystemBlockStore, NamePublisher};

use crate::{
    ValetError,
    config::{ConfigStore, ValetConfig},
};

/// The local agent: its key, the delegation it acts under, and its activity
/// log.
pub struct Agent<S> {
    signer: RequestSigner,
    delegation: Option<Delegation>,
    record_url: String,
    activity: Option<ActivityTracker<S>>,
}

impl<S> Agent<S>
where
    S: BlockStore,
{
    /// Open the agent key named in `config`, generating and saving one on
    /// first use. The agent id is written back to the configuration the
    /// first time.
    ///
    /// Activity is tracked into `store` when enabled in the configuration.
    pub fn open(config: &mut ConfigStore, store: S) -> Result<Self, ValetError> {
        let key = KeyPair::load_or_generate(&config.get().agent.private_key_path)?;
        let agent_id = key.agent_id().to_string();

        if config.get().agent.agent_id.as_deref() != Some(agent_id.as_str()) {
            tracing::debug!(%agent_id, "recording agent id in config");
            config.update(|settings| settings.agent.agent_id = Some(agent_id.clone()))?;
        }

        Ok(Self::new(key, store, config.get()))
    }

    /// Build an agent from an in-memory key.
    pub fn new(key: KeyPair, store: S, config: &ValetConfig) -> Self {
        let agent_id = key.agent_id().to_string();
        let activity = config
            .activity
            .enabled
            .then(|| ActivityTracker::new(store, agent_id));

        Self {
            signer: RequestSigner::new(key),
            delegation: None,
            record_url: String::new(),
            activity,
        }
    }

    /// The agent identifier.
    pub fn agent_id(&self) -> &AgentId {
        self.signer.agent_id()
    }

    /// The agent public key, the one a principal delegates to.
    pub fn public_key(&self) -> [u8; 32] {
        self.signer.public_key()
    }

    /// The delegation currently in use.
    pub fn delegation(&self) -> Option<&Delegation> {
        self.delegation.as_ref()
    }

    /// Act under `delegation`, announcing `record_url` in `VALET-Agent`.
    pub fn set_delegation(&mut self, delegation: Delegation, record_url: impl Into<String>) {
        if delegation.agent_id != self.agent_id().to_string() {
            tracing::warn!(
                delegated = %delegation.agent_id,
                agent_id = %self.agent_id(),
                "installed a delegation issued to another agent"
            );
        }
        self.delegation = Some(delegation);
        self.record_url = record_url.into();
    }

    /// Sign a request under the current delegation.
    ///
    /// The method is upper-cased before signing so the relying party can
    /// verify against the canonical form.
    pub fn sign_request(&self, method: &str, path: &str) -> Result<SignedRequest, ValetError> {
        let delegation = self.delegation.as_ref().ok_or(ValetError::NoDelegation)?;
        Ok(self.signer.sign_request(
            &method.to_uppercase(),
            path,
            delegation,
            &self.record_url,
        )?)
    }

    /// Log the outcome of a request, if activity tracking is enabled.
    pub fn record_activity(&mut self, service: &str, method: &str, path: &str, status: u16) {
        if let Some(tracker) = &mut self.activity {
            tracker.record(service, method, path, status, ActivitySource::Agent);
        }
    }

    /// The activity tracker, if enabled.
    pub fn activity(&mut self) -> Option<&mut ActivityTracker<S>> {
        self.activity.as_mut()
    }
}

/// Build a delegation registry over the file-system store configured in
/// `config`, publishing under the configured pointer name.
pub async fn open_registry<P>(
    config: &ValetConfig,
    manager: DelegationManager,
    publisher: P,
) -> Result<DelegationRegistry<FileSystemBlockStore, P>, ValetError>
where
    P: NamePublisher,
{
    let store = FileSystemBlockStore::new(&config.storage.root).await?;
    Ok(DelegationRegistry::with_pointer_name(
        manager,
        store,
        publisher,
        config.delegation.pointer_name.clone(),
    ))
}
