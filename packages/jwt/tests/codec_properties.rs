//! Property tests for the codec

mod common;

use common::*;
use cryypt_jwt_codec::{Algorithm, JwtCodec, JwtError, claims::is_registered};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn custom_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 _./-]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn custom_claims() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,10}", custom_value(), 0..6).prop_map(|map| {
        map.into_iter()
            .filter(|(name, _)| !is_registered(name))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_hs256_round_trip(
        claims in custom_claims(),
        subject in "[a-z0-9-]{1,16}",
        exp in 0i64..4_102_444_800,
    ) {
        let codec = JwtCodec::new(Algorithm::HS256, keys_for(Algorithm::HS256));
        let mut input = claims.clone();
        input.insert("sub".to_string(), Value::from(subject.clone()));
        input.insert("exp".to_string(), Value::from(exp));

        let token = codec.encode(&input).expect("encode");
        let decoded = codec.decode(&token).expect("decode");

        prop_assert_eq!(decoded.get("sub"), Some(&Value::from(subject)));
        prop_assert_eq!(decoded.get("exp"), Some(&Value::from(exp)));
        for (name, value) in &claims {
            prop_assert_eq!(decoded.get(name), Some(value));
        }
        prop_assert_eq!(decoded.len(), claims.len() + 2);
    }

    #[test]
    fn prop_tampered_signature_is_rejected(
        index in any::<usize>(),
        mask in 1u8..=255,
        alg_index in 0usize..Algorithm::ALL.len(),
    ) {
        let alg = Algorithm::ALL[alg_index];
        let codec = JwtCodec::new(alg, keys_for(alg));
        let token = codec.encode(&full_claims()).expect("encode");

        let tampered = tamper_signature(&token, index, mask);
        prop_assert!(tampered != token);
        prop_assert!(matches!(codec.decode(&tampered), Err(JwtError::InvalidSignature)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_es256_round_trip(claims in custom_claims()) {
        let codec = JwtCodec::new(Algorithm::ES256, keys_for(Algorithm::ES256));

        let token = codec.encode(&claims).expect("encode");
        let decoded = codec.decode(&token).expect("decode");

        prop_assert_eq!(decoded, claims);
    }
}
