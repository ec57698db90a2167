//! Property-based tests for the session codec.
//!
//! Verifies the core invariants over arbitrary session contents:
//!
//! 1. **Round-trip**: decode(encode(m)) == m for all serializable maps
//! 2. **Tamper detection**: any corrupted ciphertext fails closed
//! 3. **Key isolation**: no key but the configured ones decodes a cookie

mod common;

use common::single_registry;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,32}".prop_map(Value::from),
        prop::collection::vec("[a-z]{0,8}", 0..4).prop_map(Value::from),
    ]
}

fn session_data_strategy() -> impl Strategy<Value = HashMap<String, Value>> {
    prop::collection::hash_map("[a-z][a-z0-9_]{0,11}", value_strategy(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_encode_decode_roundtrip(data in session_data_strategy()) {
        let registry = single_registry(1);

        let map: Map<String, Value> = data.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let session = registry.create_session("session", map.clone()).unwrap();
        let cookie = registry.encode_session("session", &session).unwrap();

        let decoded = registry
            .decode_session("session", &cookie)
            .unwrap()
            .expect("freshly encoded cookie must decode");
        prop_assert_eq!(decoded.data(), map);
    }

    #[test]
    fn prop_corrupted_byte_fails_closed(
        data in session_data_strategy(),
        corrupt_at in any::<prop::sample::Index>(),
        corrupt_with in 1u8..=255,
    ) {
        let registry = single_registry(1);

        let map: Map<String, Value> = data.into_iter().collect();
        let session = registry.create_session("session", map).unwrap();
        let cookie = registry.encode_session("session", &session).unwrap();

        use base64::{Engine as _, engine::general_purpose::STANDARD};
        let (cipher_b64, nonce_b64) = cookie.split_once(';').unwrap();
        let mut cipher = STANDARD.decode(cipher_b64).unwrap();
        let index = corrupt_at.index(cipher.len());
        cipher[index] ^= corrupt_with;

        let tampered = format!("{};{}", STANDARD.encode(&cipher), nonce_b64);
        prop_assert!(registry.decode_session("session", &tampered).unwrap().is_none());
    }

    #[test]
    fn prop_foreign_key_never_decodes(data in session_data_strategy(), fill in 2u8..=255) {
        let ours = single_registry(1);
        let theirs = single_registry(fill);

        let map: Map<String, Value> = data.into_iter().collect();
        let session = ours.create_session("session", map).unwrap();
        let cookie = ours.encode_session("session", &session).unwrap();

        prop_assert!(theirs.decode_session("session", &cookie).unwrap().is_none());
    }
}
