//! Property tests for the identifier codec.

use proptest::prelude::*;
use valet_credentials::{
    AgentId, PrincipalId, agent_id_from_public_key, principal_id_from_public_key,
    public_key_from_agent_id, public_key_from_principal_id,
};

proptest! {
    #[test]
    fn agent_ids_decode_to_the_encoded_key(key in any::<[u8; 32]>()) {
        let id = agent_id_from_public_key(&key);
        prop_assert_eq!(public_key_from_agent_id(&id).unwrap(), key);
    }

    #[test]
    fn principal_ids_decode_to_the_encoded_key(key in any::<[u8; 32]>()) {
        let id = principal_id_from_public_key(&key);
        prop_assert_eq!(public_key_from_principal_id(&id).unwrap(), key);
    }

    #[test]
    fn well_formed_identifiers_reencode_unchanged(key in any::<[u8; 32]>()) {
        let text = agent_id_from_public_key(&key);
        let parsed: AgentId = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), text);

        let text = principal_id_from_public_key(&key);
        let parsed: PrincipalId = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), text);
    }

    #[test]
    fn arbitrary_strings_never_panic(text in "\\PC*") {
        let _ = public_key_from_agent_id(&text);
        let _ = public_key_from_principal_id(&text);
    }
}

#[test]
fn leading_zero_keys_roundtrip() {
    let key = [0u8; 32];
    let id = agent_id_from_public_key(&key);

    assert_eq!(id, format!("agent:ed25519:{}", "1".repeat(32)));
    assert_eq!(public_key_from_agent_id(&id).unwrap(), key);
}
