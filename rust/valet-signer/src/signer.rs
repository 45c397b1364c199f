//! Producing and checking request signatures.

use std::path::Path;

use chrono::{DateTime, Utc};
use valet_credentials::{AgentId, KeyPair};
use valet_delegation::Delegation;

use crate::{
    RequestVerificationError, SignatureBase, SignatureParams, SignedRequest, SignerError,
    decode_signature_value, encode_agent_record, encode_authorization, encode_signature_value,
};

/// Signs outgoing requests with an agent key.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    key: KeyPair,
    agent_id: AgentId,
}

impl RequestSigner {
    /// Sign with `key`.
    #[must_use]
    pub fn new(key: KeyPair) -> Self {
        let agent_id = key.agent_id();
        Self { key, agent_id }
    }

    /// Sign with the hex-encoded private key stored at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file is missing or does not hold a 32-byte hex key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SignerError> {
        Ok(Self::new(KeyPair::load(path)?))
    }

    /// The agent identifier placed in `keyid`.
    #[must_use]
    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// The agent public key.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.key.public_key()
    }

    /// Sign a request now.
    ///
    /// `method` and `path` are signed exactly as given. The delegation is
    /// embedded as is; it is not checked against this signer's key.
    ///
    /// # Errors
    ///
    /// Fails only if the delegation cannot be serialized.
    pub fn sign_request(
        &self,
        method: &str,
        path: &str,
        delegation: &Delegation,
        record_url: &str,
    ) -> Result<SignedRequest, SignerError> {
        self.sign_request_at(method, path, delegation, record_url, unix_seconds(Utc::now()))
    }

    /// Sign a request with an explicit `created` time in unix seconds.
    ///
    /// # Errors
    ///
    /// Fails only if the delegation cannot be serialized.
    pub fn sign_request_at(
        &self,
        method: &str,
        path: &str,
        delegation: &Delegation,
        record_url: &str,
        created: u64,
    ) -> Result<SignedRequest, SignerError> {
        let keyid = self.agent_id.to_string();
        if delegation.agent_id != keyid {
            tracing::warn!(
                delegated = %delegation.agent_id,
                signer = %keyid,
                "signing with a delegation issued to another agent"
            );
        }

        let valet_authorization = encode_authorization(delegation)?;
        let params = SignatureParams::new(created, keyid);
        let base = SignatureBase::new(method, path, &valet_authorization, &params);
        let signature = self.key.sign(base.as_bytes());

        tracing::debug!(%method, %path, created, "signed request");

        Ok(SignedRequest {
            valet_authorization,
            valet_agent: encode_agent_record(record_url),
            signature_input: params.to_header(),
            signature: encode_signature_value(&signature),
        })
    }
}

fn unix_seconds(now: DateTime<Utc>) -> u64 {
    u64::try_from(now.timestamp()).unwrap_or_default()
}

/// What a valid request signature establishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSignature {
    /// The agent that holds the signing key.
    pub agent_id: AgentId,
    /// When the agent claims to have signed, in unix seconds. Freshness is
    /// the caller's policy.
    pub created: u64,
}

/// Check a request signature, reporting why it failed.
///
/// The verifying key is derived from `keyid` alone. `method` and `path` must
/// be the values the relying party observed, in the same casing the signer
/// used.
///
/// # Errors
///
/// Names the first check that failed.
pub fn check_request(
    method: &str,
    path: &str,
    valet_authorization: &str,
    signature_input: &str,
    signature_value: &str,
) -> Result<VerifiedSignature, RequestVerificationError> {
    let params = SignatureParams::parse_header(signature_input)?;
    let agent_id: AgentId = params.keyid.parse()?;
    let signature = decode_signature_value(signature_value)?;

    let base = SignatureBase::new(method, path, valet_authorization, &params);
    valet_credentials::verify(agent_id.public_key(), base.as_bytes(), &signature)?;

    Ok(VerifiedSignature {
        agent_id,
        created: params.created,
    })
}

/// Whether a request signature is valid. Never errors: every failure,
/// including malformed headers, is `false`.
#[must_use]
pub fn verify_request(
    method: &str,
    path: &str,
    valet_authorization: &str,
    signature_input: &str,
    signature_value: &str,
) -> bool {
    match check_request(
        method,
        path,
        valet_authorization,
        signature_input,
        signature_value,
    ) {
        Ok(_) => true,
        Err(error) => {
            tracing::debug!(%error, %method, %path, "request signature rejected");
            false
        }
    }
}
