//! Property tests for request signing and verification.

use proptest::prelude::*;
use valet_credentials::KeyPair;
use valet_delegation::{DelegationManager, TimeDelta};
use valet_signer::{RequestSigner, SignedRequest, verify_request};

fn verify(method: &str, path: &str, request: &SignedRequest) -> bool {
    verify_request(
        method,
        path,
        &request.valet_authorization,
        &request.signature_input,
        &request.signature,
    )
}

proptest! {
    #[test]
    fn signed_requests_verify_for_any_inputs(
        method in "[A-Za-z]{1,10}",
        path in "/\\PC*",
        record_url in "https://[a-z]{1,12}\\.example/\\PC*",
        agent_seed in any::<[u8; 32]>(),
        principal_seed in any::<[u8; 32]>(),
        hours in 1i64..=72,
        created in any::<u32>(),
    ) {
        let signer = RequestSigner::new(KeyPair::from_seed(&agent_seed));
        let delegation = DelegationManager::new(KeyPair::from_seed(&principal_seed))
            .create_delegation(&signer.public_key(), TimeDelta::hours(hours))
            .unwrap();

        let request = signer
            .sign_request_at(&method, &path, &delegation, &record_url, u64::from(created))
            .unwrap();

        prop_assert!(verify(&method, &path, &request));
        prop_assert_eq!(request.record_url(), Some(record_url.as_str()));
    }

    #[test]
    fn another_method_or_path_never_verifies(
        method in "[A-Z]{1,10}",
        other_method in "[A-Z]{1,10}",
        path in "/[a-z0-9/]{0,24}",
        other_path in "/[a-z0-9/]{0,24}",
        agent_seed in any::<[u8; 32]>(),
    ) {
        prop_assume!(method != other_method && path != other_path);

        let signer = RequestSigner::new(KeyPair::from_seed(&agent_seed));
        let delegation = DelegationManager::new(KeyPair::from_seed(&[1; 32]))
            .create_delegation(&signer.public_key(), TimeDelta::hours(24))
            .unwrap();
        let request = signer
            .sign_request(&method, &path, &delegation, "https://gateway.example/ipfs/x")
            .unwrap();

        prop_assert!(!verify(&other_method, &path, &request));
        prop_assert!(!verify(&method, &other_path, &request));
    }

    #[test]
    fn arbitrary_envelopes_are_rejected_without_panicking(
        method in "\\PC*",
        path in "\\PC*",
        valet_authorization in "\\PC*",
        signature_input in "\\PC*",
        signature in "\\PC*",
    ) {
        prop_assert!(!verify_request(
            &method,
            &path,
            &valet_authorization,
            &signature_input,
            &signature,
        ));
    }

    #[test]
    fn well_formed_but_forged_signatures_are_rejected(
        signature_bytes in any::<[u8; 64]>(),
        agent_seed in any::<[u8; 32]>(),
        created in any::<u32>(),
    ) {
        let signer = RequestSigner::new(KeyPair::from_seed(&agent_seed));
        let delegation = DelegationManager::new(KeyPair::from_seed(&[1; 32]))
            .create_delegation(&signer.public_key(), TimeDelta::hours(24))
            .unwrap();
        let request = signer
            .sign_request_at("GET", "/api/data", &delegation, "https://gateway.example/ipfs/x", u64::from(created))
            .unwrap();
        let forged = valet_signer::encode_signature_value(&signature_bytes);
        prop_assume!(forged != request.signature);

        prop_assert!(!verify_request(
            "GET",
            "/api/data",
            &request.valet_authorization,
            &request.signature_input,
            &forged,
        ));
    }
}
