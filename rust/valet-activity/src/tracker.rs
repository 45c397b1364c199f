use chrono::{SecondsFormat, Utc};
use valet_storage::{BlockStore, BlockStoreExt, ContentId};

use crate::{ActivityError, ActivityRecord, ActivitySource};

/// Buffers an agent's activity and flushes it to a [`BlockStore`].
pub struct ActivityTracker<S> {
    store: S,
    agent_id: String,
    buffer: Vec<ActivityRecord>,
}

impl<S> ActivityTracker<S>
where
    S: BlockStore,
{
    /// Track activity for `agent_id`, flushing into `store`.
    pub fn new(store: S, agent_id: impl Into<String>) -> Self {
        Self {
            store,
            agent_id: agent_id.into(),
            buffer: Vec::new(),
        }
    }

    /// The agent records are attributed to.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Buffer a record stamped with the current time. The method is
    /// upper-cased.
    pub fn record(
        &mut self,
        service: &str,
        method: &str,
        path: &str,
        status: u16,
        source: ActivitySource,
    ) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.buffer.push(ActivityRecord {
            agent_id: self.agent_id.clone(),
            timestamp,
            service: service.to_owned(),
            method: method.to_uppercase(),
            path: path.to_owned(),
            status,
            source,
        });
    }

    /// The number of buffered records.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The buffered records, oldest first.
    pub fn pending(&self) -> &[ActivityRecord] {
        &self.buffer
    }

    /// Store every buffered record as one JSON array and clear the buffer.
    ///
    /// The buffer is kept if storing fails.
    pub async fn flush(&mut self) -> Result<ContentId, ActivityError> {
        if self.buffer.is_empty() {
            return Err(ActivityError::Empty);
        }

        let id = self.store.put_json(&self.buffer).await?;
        tracing::debug!(%id, records = self.buffer.len(), "flushed activity");
        self.buffer.clear();
        Ok(id)
    }

    /// Load a previously flushed batch.
    pub async fn fetch(&self, id: &ContentId) -> Result<Vec<ActivityRecord>, ActivityError> {
        Ok(self.store.get_json(id).await?)
    }
}
