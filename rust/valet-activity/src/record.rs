use serde::{Deserialize, Serialize};

/// Who reported a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    /// The agent logged its own request.
    #[default]
    Agent,
    /// A relying party logged a request it verified.
    Service,
}

/// One request made under a delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// The agent that made the request.
    pub agent_id: String,
    /// When it was recorded, RFC 3339 UTC.
    pub timestamp: String,
    /// The service contacted, e.g. `api.example.com`.
    pub service: String,
    /// Upper-cased HTTP method.
    pub method: String,
    /// The request path.
    pub path: String,
    /// The HTTP status the service answered with.
    pub status: u16,
    /// Who reported it.
    pub source: ActivitySource,
}

impl ActivityRecord {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is 4xx or 5xx.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}
