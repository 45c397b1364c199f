//! The delegation certificate and its verification.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use valet_credentials::codec::decode_base64;

use crate::DelegationError;

/// A principal's signed grant of authority to an agent.
///
/// The JSON form has exactly these five fields. Timestamps are RFC 3339 in
/// UTC with millisecond precision (`2026-02-14T08:00:00.000Z`), and
/// `delegation_signature` is the base64 of a 64-byte ed25519 signature.
///
/// Fields are kept as received so that verification runs over exactly the
/// bytes the principal signed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Delegation {
    /// The agent receiving authority, as `agent:ed25519:<body>`.
    pub agent_id: String,
    /// The principal granting authority, as `ed25519:<body>`.
    pub principal_id: String,
    /// When the delegation was issued.
    pub issued_at: String,
    /// When the delegation stops being usable.
    pub expires_at: String,
    /// Base64 principal signature over `agent_id ‖ issued_at ‖ expires_at`.
    pub delegation_signature: String,
}

impl Delegation {
    /// The bytes the principal signs for this delegation.
    #[must_use]
    pub fn signing_message(&self) -> Vec<u8> {
        signing_message(&self.agent_id, &self.issued_at, &self.expires_at)
    }

    /// Parse `issued_at`.
    ///
    /// # Errors
    ///
    /// Fails if the field is not RFC 3339.
    pub fn issued_at_time(&self) -> Result<DateTime<Utc>, DelegationError> {
        parse_timestamp("issued_at", &self.issued_at)
    }

    /// Parse `expires_at`.
    ///
    /// # Errors
    ///
    /// Fails if the field is not RFC 3339.
    pub fn expires_at_time(&self) -> Result<DateTime<Utc>, DelegationError> {
        parse_timestamp("expires_at", &self.expires_at)
    }

    /// See [`verify_delegation`].
    #[must_use]
    pub fn verify(&self, principal_public_key: &[u8; 32]) -> bool {
        verify_delegation(self, principal_public_key)
    }

    /// See [`is_expired`].
    #[must_use]
    pub fn is_expired(&self) -> bool {
        is_expired(self)
    }

    /// Whether the delegation has expired as of `now`.
    ///
    /// An unparseable `expires_at` counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at_time() {
            Ok(expires_at) => now >= expires_at,
            Err(error) => {
                tracing::debug!(%error, "treating delegation with unreadable expiry as expired");
                true
            }
        }
    }

    /// Serialize as compact JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, DelegationError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize as indented JSON, the form delegations are stored in.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json_pretty(&self) -> Result<String, DelegationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, missing fields or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, DelegationError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The message a principal signs: `agent_id ‖ issued_at ‖ expires_at`.
#[must_use]
pub fn signing_message(agent_id: &str, issued_at: &str, expires_at: &str) -> Vec<u8> {
    [agent_id, issued_at, expires_at].concat().into_bytes()
}

/// Format a timestamp the way delegations carry it.
#[must_use]
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DelegationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|source| DelegationError::Timestamp { field, source })
}

/// Check the principal's signature on `delegation`.
///
/// Returns `false`, never an error, when the signature is not base64, is the
/// wrong length, or does not match. Neither `principal_id` nor the expiry is
/// checked here.
#[must_use]
pub fn verify_delegation(delegation: &Delegation, principal_public_key: &[u8; 32]) -> bool {
    let signature = match decode_base64(&delegation.delegation_signature) {
        Ok(signature) => signature,
        Err(error) => {
            tracing::debug!(%error, "delegation signature is not base64");
            return false;
        }
    };

    match valet_credentials::verify(
        principal_public_key,
        &delegation.signing_message(),
        &signature,
    ) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, agent_id = %delegation.agent_id, "delegation rejected");
            false
        }
    }
}

/// Whether the current wall-clock time is at or past `expires_at`.
#[must_use]
pub fn is_expired(delegation: &Delegation) -> bool {
    delegation.is_expired_at(Utc::now())
}
