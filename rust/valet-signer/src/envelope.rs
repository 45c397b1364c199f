//! The four-header signed-request envelope.

use valet_credentials::codec::{decode_base64, encode_base64};
use valet_delegation::{Delegation, DelegationError};

use crate::{AuthorizationPayloadError, MissingHeader, SIGNATURE_LABEL, SignatureValueError};

/// Carries the base64 delegation JSON.
pub const VALET_AUTHORIZATION_HEADER: &str = "VALET-Authorization";

/// Carries `record=<url>` pointing at the agent's published record.
pub const VALET_AGENT_HEADER: &str = "VALET-Agent";

/// Carries the signature parameters.
pub const SIGNATURE_INPUT_HEADER: &str = "Signature-Input";

/// Carries the signature itself.
pub const SIGNATURE_HEADER: &str = "Signature";

const RECORD_PREFIX: &str = "record=";

/// The header values attached to a signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// `VALET-Authorization`: base64 of the delegation JSON.
    pub valet_authorization: String,
    /// `VALET-Agent`: `record=<url>`.
    pub valet_agent: String,
    /// `Signature-Input`: `valet=(...);created=…;keyid="…";alg="ed25519";v="1.0"`.
    pub signature_input: String,
    /// `Signature`: `valet=:<base64>:`.
    pub signature: String,
}

impl SignedRequest {
    /// The envelope as `(header name, value)` pairs.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 4] {
        [
            (VALET_AUTHORIZATION_HEADER, &self.valet_authorization),
            (VALET_AGENT_HEADER, &self.valet_agent),
            (SIGNATURE_INPUT_HEADER, &self.signature_input),
            (SIGNATURE_HEADER, &self.signature),
        ]
    }

    /// Collect the envelope from received headers. Header names match
    /// case-insensitively; when a header repeats, the last value wins.
    ///
    /// # Errors
    ///
    /// Names the first envelope header that is absent.
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, MissingHeader>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut valet_authorization = None;
        let mut valet_agent = None;
        let mut signature_input = None;
        let mut signature = None;

        for (name, value) in headers {
            let slot = if name.eq_ignore_ascii_case(VALET_AUTHORIZATION_HEADER) {
                &mut valet_authorization
            } else if name.eq_ignore_ascii_case(VALET_AGENT_HEADER) {
                &mut valet_agent
            } else if name.eq_ignore_ascii_case(SIGNATURE_INPUT_HEADER) {
                &mut signature_input
            } else if name.eq_ignore_ascii_case(SIGNATURE_HEADER) {
                &mut signature
            } else {
                continue;
            };
            *slot = Some(value.to_owned());
        }

        Ok(Self {
            valet_authorization: valet_authorization
                .ok_or(MissingHeader(VALET_AUTHORIZATION_HEADER))?,
            valet_agent: valet_agent.ok_or(MissingHeader(VALET_AGENT_HEADER))?,
            signature_input: signature_input.ok_or(MissingHeader(SIGNATURE_INPUT_HEADER))?,
            signature: signature.ok_or(MissingHeader(SIGNATURE_HEADER))?,
        })
    }

    /// The URL in `VALET-Agent`, if it has the `record=` form.
    #[must_use]
    pub fn record_url(&self) -> Option<&str> {
        self.valet_agent.strip_prefix(RECORD_PREFIX)
    }
}

/// Format the `VALET-Agent` value for `record_url`.
#[must_use]
pub fn encode_agent_record(record_url: &str) -> String {
    format!("{RECORD_PREFIX}{record_url}")
}

/// Encode a delegation for `VALET-Authorization`: base64 of its JSON.
///
/// # Errors
///
/// Propagates JSON serialization failures.
pub fn encode_authorization(delegation: &Delegation) -> Result<String, DelegationError> {
    Ok(encode_base64(delegation.to_json()?))
}

/// Decode a `VALET-Authorization` value back into a delegation.
///
/// # Errors
///
/// Fails when the value is not base64, not UTF-8, or not delegation JSON.
pub fn decode_authorization(value: &str) -> Result<Delegation, AuthorizationPayloadError> {
    let json = String::from_utf8(decode_base64(value)?)?;
    Ok(Delegation::from_json(&json)?)
}

/// Format the `Signature` value: `valet=:<base64>:`.
#[must_use]
pub fn encode_signature_value(signature: &[u8]) -> String {
    format!("{SIGNATURE_LABEL}=:{}:", encode_base64(signature))
}

/// Extract the signature bytes from a `Signature` value.
///
/// # Errors
///
/// Fails unless the value is exactly `valet=:<base64>:` with a non-empty
/// base64 payload.
pub fn decode_signature_value(value: &str) -> Result<Vec<u8>, SignatureValueError> {
    let encoded = value
        .strip_prefix(SIGNATURE_LABEL)
        .and_then(|rest| rest.strip_prefix("=:"))
        .and_then(|rest| rest.strip_suffix(':'))
        .filter(|encoded| !encoded.is_empty() && !encoded.contains(':'))
        .ok_or(SignatureValueError::Malformed)?;
    Ok(decode_base64(encoded)?)
}
