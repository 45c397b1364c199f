//! Relying-party check: authenticate the sender, then authorize it.

use chrono::{DateTime, Utc};
use valet_credentials::AgentId;
use valet_delegation::{Delegation, verify_delegation};

use crate::{AuthorizationError, SignedRequest, check_request, decode_authorization};

/// A request that passed every relying-party check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedRequest {
    /// The agent that signed the request.
    pub agent_id: AgentId,
    /// The delegation it presented.
    pub delegation: Delegation,
    /// When the agent signed, in unix seconds.
    pub created: u64,
    /// The record URL from `VALET-Agent`, if present.
    pub record_url: Option<String>,
}

/// Authenticate and authorize a request against a known principal key.
///
/// # Errors
///
/// See [`verify_authorized_request_at`].
pub fn verify_authorized_request(
    method: &str,
    path: &str,
    request: &SignedRequest,
    principal_public_key: &[u8; 32],
) -> Result<AuthorizedRequest, AuthorizationError> {
    verify_authorized_request_at(method, path, request, principal_public_key, Utc::now())
}

/// [`verify_authorized_request`] with an explicit current time.
///
/// Checks run in order and stop at the first failure:
///
/// 1. the request signature verifies under `keyid`;
/// 2. `VALET-Authorization` decodes to a delegation;
/// 3. the delegation names the same agent as `keyid`;
/// 4. the principal signature on the delegation verifies;
/// 5. the delegation has not expired at `now`.
///
/// # Errors
///
/// Returns the [`AuthorizationError`] for the first failing step.
pub fn verify_authorized_request_at(
    method: &str,
    path: &str,
    request: &SignedRequest,
    principal_public_key: &[u8; 32],
    now: DateTime<Utc>,
) -> Result<AuthorizedRequest, AuthorizationError> {
    let verified = check_request(
        method,
        path,
        &request.valet_authorization,
        &request.signature_input,
        &request.signature,
    )?;

    let delegation = decode_authorization(&request.valet_authorization)?;

    let signer = verified.agent_id.to_string();
    if delegation.agent_id != signer {
        return Err(AuthorizationError::AgentMismatch {
            delegated: delegation.agent_id,
            signer,
        });
    }

    if !verify_delegation(&delegation, principal_public_key) {
        return Err(AuthorizationError::DelegationSignature);
    }

    if delegation.is_expired_at(now) {
        return Err(AuthorizationError::Expired(delegation.expires_at));
    }

    tracing::debug!(agent_id = %signer, %method, %path, "request authorized");

    Ok(AuthorizedRequest {
        agent_id: verified.agent_id,
        record_url: request.record_url().map(str::to_owned),
        created: verified.created,
        delegation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestSigner, RequestVerificationError, encode_authorization};
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;
    use valet_credentials::KeyPair;
    use valet_delegation::DelegationManager;

    struct Fixture {
        manager: DelegationManager,
        signer: RequestSigner,
        issued_at: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> TestResult<Self> {
            Ok(Self {
                manager: DelegationManager::new(KeyPair::from_seed(&[1; 32])),
                signer: RequestSigner::new(KeyPair::from_seed(&[2; 32])),
                issued_at: DateTime::parse_from_rfc3339("2026-02-14T08:00:00Z")?
                    .with_timezone(&Utc),
            })
        }

        fn delegation(&self) -> TestResult<Delegation> {
            Ok(self
                .manager
                .create_delegation_at(
                    &self.signer.public_key(),
                    self.issued_at,
                    TimeDelta::hours(24),
                )?)
        }

        fn principal(&self) -> [u8; 32] {
            self.manager.principal_public_key()
        }

        fn an_hour_in(&self) -> DateTime<Utc> {
            self.issued_at + TimeDelta::hours(1)
        }
    }

    #[test]
    fn it_authorizes_a_properly_delegated_request() -> TestResult {
        let fixture = Fixture::new()?;
        let delegation = fixture.delegation()?;
        let request = fixture.signer.sign_request_at(
            "GET",
            "/api/data",
            &delegation,
            "https://records.example/agent",
            1_771_056_000,
        )?;

        let authorized = verify_authorized_request_at(
            "GET",
            "/api/data",
            &request,
            &fixture.principal(),
            fixture.an_hour_in(),
        )?;

        assert_eq!(
            authorized,
            AuthorizedRequest {
                agent_id: *fixture.signer.agent_id(),
                delegation,
                created: 1_771_056_000,
                record_url: Some("https://records.example/agent".into()),
            }
        );
        Ok(())
    }

    #[test]
    fn it_rejects_a_bad_request_signature_first() -> TestResult {
        let fixture = Fixture::new()?;
        let request = fixture
            .signer
            .sign_request("GET", "/api/data", &fixture.delegation()?, "u")?;

        let result = verify_authorized_request_at(
            "POST",
            "/api/data",
            &request,
            &fixture.principal(),
            fixture.an_hour_in(),
        );
        assert!(matches!(
            result,
            Err(AuthorizationError::RequestSignature(
                RequestVerificationError::Signature(_)
            ))
        ));
        Ok(())
    }

    #[test]
    fn it_rejects_a_delegation_for_another_agent() -> TestResult {
        let fixture = Fixture::new()?;
        let thief = RequestSigner::new(KeyPair::from_seed(&[3; 32]));
        let request = thief.sign_request("GET", "/", &fixture.delegation()?, "u")?;

        let result = verify_authorized_request_at(
            "GET",
            "/",
            &request,
            &fixture.principal(),
            fixture.an_hour_in(),
        );
        assert!(matches!(result, Err(AuthorizationError::AgentMismatch { .. })));
        Ok(())
    }

    #[test]
    fn it_rejects_a_delegation_from_another_principal() -> TestResult {
        let fixture = Fixture::new()?;
        let request = fixture
            .signer
            .sign_request("GET", "/", &fixture.delegation()?, "u")?;
        let stranger = KeyPair::from_seed(&[4; 32]).public_key();

        let result =
            verify_authorized_request_at("GET", "/", &request, &stranger, fixture.an_hour_in());
        assert!(matches!(result, Err(AuthorizationError::DelegationSignature)));
        Ok(())
    }

    #[test]
    fn it_rejects_a_delegation_with_an_extended_expiry() -> TestResult {
        let fixture = Fixture::new()?;
        let mut delegation = fixture.delegation()?;
        delegation.expires_at = "2099-01-01T00:00:00.000Z".into();
        // Re-signed by the agent, so only the principal signature catches it.
        let request = fixture.signer.sign_request("GET", "/", &delegation, "u")?;

        let result = verify_authorized_request_at(
            "GET",
            "/",
            &request,
            &fixture.principal(),
            fixture.an_hour_in(),
        );
        assert!(matches!(result, Err(AuthorizationError::DelegationSignature)));
        Ok(())
    }

    #[test]
    fn it_rejects_an_expired_delegation() -> TestResult {
        let fixture = Fixture::new()?;
        let delegation = fixture.delegation()?;
        let request = fixture.signer.sign_request("GET", "/", &delegation, "u")?;

        let result = verify_authorized_request_at(
            "GET",
            "/",
            &request,
            &fixture.principal(),
            fixture.issued_at + TimeDelta::hours(24),
        );
        match result {
            Err(AuthorizationError::Expired(expires_at)) => {
                assert_eq!(expires_at, delegation.expires_at);
            }
            other => panic!("expected expiry, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn it_rejects_an_authorization_that_is_not_a_delegation() -> TestResult {
        let fixture = Fixture::new()?;
        let request = fixture
            .signer
            .sign_request("GET", "/", &fixture.delegation()?, "u")?;

        // A correctly signed request whose authorization header is junk.
        let junk = valet_credentials::codec::encode_base64("not json");
        let params = crate::SignatureParams::parse_header(&request.signature_input)?;
        let key = KeyPair::from_seed(&[2; 32]);
        let base = crate::SignatureBase::new("GET", "/", &junk, &params);
        let forged = SignedRequest {
            valet_authorization: junk,
            signature: crate::encode_signature_value(&key.sign(base.as_bytes())),
            ..request
        };

        let result = verify_authorized_request_at(
            "GET",
            "/",
            &forged,
            &fixture.principal(),
            fixture.an_hour_in(),
        );
        assert!(matches!(
            result,
            Err(AuthorizationError::MalformedAuthorization(_))
        ));
        Ok(())
    }

    #[test]
    fn a_request_without_a_record_url_is_still_authorized() -> TestResult {
        let fixture = Fixture::new()?;
        let delegation = fixture.delegation()?;
        let request = SignedRequest {
            valet_agent: String::new(),
            ..fixture.signer.sign_request("GET", "/", &delegation, "u")?
        };
        assert_eq!(
            encode_authorization(&delegation)?,
            request.valet_authorization
        );

        let authorized = verify_authorized_request_at(
            "GET",
            "/",
            &request,
            &fixture.principal(),
            fixture.an_hour_in(),
        )?;
        assert_eq!(authorized.record_url, None);
        Ok(())
    }
}
