use thiserror::Error;
use valet_credentials::{IdentifierError, KeyFileError, VerificationError};
use valet_delegation::DelegationError;

/// Errors while signing a request.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signing key could not be loaded.
    #[error(transparent)]
    Key(#[from] KeyFileError),

    /// The delegation could not be serialized.
    #[error("failed to encode delegation: {0}")]
    Delegation(#[from] DelegationError),
}

/// Reasons a `Signature-Input` value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureInputError {
    /// The value does not follow the `valet=(...);k=v` grammar.
    #[error("malformed signature input")]
    Malformed,

    /// The covered components differ from the fixed list.
    #[error("unexpected covered components: {0:?}")]
    UnexpectedComponents(Vec<String>),

    /// A parameter appeared that the envelope does not define.
    #[error("unexpected signature parameter '{0}'")]
    UnexpectedParameter(String),

    /// A parameter appeared twice.
    #[error("duplicate signature parameter '{0}'")]
    DuplicateParameter(String),

    /// A parameter has the wrong type (integer versus string).
    #[error("signature parameter '{0}' has the wrong type")]
    InvalidParameter(&'static str),

    /// A required parameter is absent.
    #[error("missing signature parameter '{0}'")]
    MissingParameter(&'static str),

    /// `alg` names something other than ed25519.
    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// `v` names an unknown envelope version.
    #[error("unsupported envelope version '{0}'")]
    UnsupportedVersion(String),
}

/// Reasons a `Signature` value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureValueError {
    /// The value is not `valet=:<base64>:`.
    #[error("malformed signature value")]
    Malformed,

    /// The signature bytes are not base64.
    #[error("signature is not base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Reasons a signed request failed to verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestVerificationError {
    /// The `Signature-Input` value was rejected.
    #[error(transparent)]
    SignatureInput(#[from] SignatureInputError),

    /// The `Signature` value was rejected.
    #[error(transparent)]
    SignatureValue(#[from] SignatureValueError),

    /// `keyid` is not an agent identifier.
    #[error("invalid keyid: {0}")]
    KeyId(#[from] IdentifierError),

    /// The signature does not verify under the `keyid` key.
    #[error(transparent)]
    Signature(#[from] VerificationError),
}

/// A required envelope header is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing {0} header")]
pub struct MissingHeader(pub &'static str);

/// Reasons the `VALET-Authorization` payload could not be decoded.
#[derive(Debug, Error)]
pub enum AuthorizationPayloadError {
    /// The payload is not base64.
    #[error("authorization payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The payload is not UTF-8.
    #[error("authorization payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The payload is not a delegation.
    #[error(transparent)]
    Delegation(#[from] DelegationError),
}

/// Why a relying party refused a request.
///
/// Each variant names the layer that rejected it: sender authentication,
/// delegation decoding, agent binding, principal signature, or expiry.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The request signature did not verify.
    #[error("request signature rejected: {0}")]
    RequestSignature(#[from] RequestVerificationError),

    /// `VALET-Authorization` does not hold a delegation.
    #[error("malformed authorization: {0}")]
    MalformedAuthorization(#[from] AuthorizationPayloadError),

    /// The delegation names a different agent than the request signer.
    #[error("delegation is for {delegated} but the request was signed by {signer}")]
    AgentMismatch {
        /// The `agent_id` inside the delegation.
        delegated: String,
        /// The `keyid` the request was signed with.
        signer: String,
    },

    /// The principal signature on the delegation did not verify.
    #[error("delegation signature rejected")]
    DelegationSignature,

    /// The delegation has expired.
    #[error("delegation expired at {0}")]
    Expired(String),
}
