//! Issuing delegations with a principal key.

use chrono::{DateTime, TimeDelta, Utc};
use valet_credentials::{AgentId, KeyPair, PrincipalId, codec::encode_base64};

use crate::{Delegation, DelegationError, delegation::format_timestamp};

/// Lifetime of a delegation, in hours, when the caller has no preference.
pub const DEFAULT_DURATION_HOURS: f64 = 24.0;

const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Convert a possibly fractional number of hours to a duration, to the
/// millisecond. Negative values are kept.
///
/// # Errors
///
/// Fails when `hours` is not finite or does not fit in a [`TimeDelta`].
pub fn duration_from_hours(hours: f64) -> Result<TimeDelta, DelegationError> {
    let out_of_range = || DelegationError::DurationOutOfRange(format!("{hours} hours"));

    let millis = (hours * MILLIS_PER_HOUR).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    TimeDelta::try_milliseconds(millis as i64).ok_or_else(out_of_range)
}

/// Issues delegations signed by a held principal key.
#[derive(Debug, Clone)]
pub struct DelegationManager {
    principal: KeyPair,
}

impl DelegationManager {
    /// Create a manager that signs with `principal`.
    #[must_use]
    pub fn new(principal: KeyPair) -> Self {
        Self { principal }
    }

    /// The identifier written into every delegation this manager issues.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        self.principal.principal_id()
    }

    /// The principal public key relying parties verify against.
    #[must_use]
    pub fn principal_public_key(&self) -> [u8; 32] {
        self.principal.public_key()
    }

    /// Delegate to `agent_public_key` from now for `duration`.
    ///
    /// The duration is taken as given: zero or negative values produce a
    /// delegation that is already expired. Use [`duration_from_hours`] for
    /// hour counts, including fractional ones.
    ///
    /// # Errors
    ///
    /// Fails only if the expiry falls outside the representable time range.
    pub fn create_delegation(
        &self,
        agent_public_key: &[u8; 32],
        duration: TimeDelta,
    ) -> Result<Delegation, DelegationError> {
        self.create_delegation_at(agent_public_key, Utc::now(), duration)
    }

    /// Delegate to `agent_public_key` as if issued at `issued_at`.
    ///
    /// # Errors
    ///
    /// Fails only if the expiry falls outside the representable time range.
    pub fn create_delegation_at(
        &self,
        agent_public_key: &[u8; 32],
        issued_at: DateTime<Utc>,
        duration: TimeDelta,
    ) -> Result<Delegation, DelegationError> {
        if duration <= TimeDelta::zero() {
            tracing::warn!(%duration, "issuing a delegation that is already expired");
        }

        let expires_at = issued_at
            .checked_add_signed(duration)
            .ok_or_else(|| DelegationError::DurationOutOfRange(duration.to_string()))?;

        let agent_id = AgentId::from_public_key(*agent_public_key).to_string();
        let issued_at = format_timestamp(issued_at);
        let expires_at = format_timestamp(expires_at);

        let message = crate::signing_message(&agent_id, &issued_at, &expires_at);
        let signature = self.principal.sign(&message);

        tracing::debug!(%agent_id, %expires_at, "issued delegation");

        Ok(Delegation {
            agent_id,
            principal_id: self.principal_id().to_string(),
            issued_at,
            expires_at,
            delegation_signature: encode_base64(signature),
        })
    }
}
