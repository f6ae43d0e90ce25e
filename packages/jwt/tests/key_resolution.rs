//! Key resolution for symmetric and asymmetric algorithms

mod common;

use common::*;
use cryypt_jwt_codec::{
    Algorithm, JwtCodec, KeyError, KeyMaterial, SigningKey, VerificationKey, signing_key,
    verification_key,
};
use serde_json::json;

#[test]
fn test_symmetric_keys_are_the_same_secret() {
    let keys = KeyMaterial::symmetric("secret");

    let signing = signing_key(Algorithm::HS384, &keys).expect("signing key");
    let verifying = verification_key(Algorithm::HS384, &keys).expect("verification key");

    match (signing, verifying) {
        (SigningKey::Hmac(a), VerificationKey::Hmac(b)) => {
            assert_eq!(a.as_slice(), b"secret");
            assert_eq!(a.as_slice(), b.as_slice());
        }
        other => panic!("unexpected key handles: {other:?}"),
    }
}

#[test]
fn test_asymmetric_keys_resolve_per_family_and_curve() {
    for alg in Algorithm::ALL {
        let keys = keys_for(alg);
        let signing = signing_key(alg, &keys).expect("signing key");
        let verifying = verification_key(alg, &keys).expect("verification key");
        assert!(signing.supports(alg), "{alg}");
        assert!(verifying.supports(alg), "{alg}");
    }

    let p384 = signing_key(Algorithm::ES384, &keys_for(Algorithm::ES384)).expect("p384");
    assert!(matches!(p384, SigningKey::P384(_)));
    assert!(!p384.supports(Algorithm::ES256));
    assert!(!p384.supports(Algorithm::RS384));
}

#[test]
fn test_missing_secret() {
    let err = signing_key(Algorithm::HS256, &KeyMaterial::symmetric(Vec::new()))
        .expect_err("empty secret");
    assert!(matches!(
        err,
        KeyError::MissingKeyMaterial {
            algorithm: Algorithm::HS256,
            ..
        }
    ));

    let err = verification_key(Algorithm::HS512, &KeyMaterial::public_only(RSA_PUBLIC))
        .expect_err("asymmetric material for HMAC");
    assert!(matches!(err, KeyError::MissingKeyMaterial { .. }));
}

#[test]
fn test_missing_asymmetric_halves() {
    let public_only = KeyMaterial::public_only(P256_PUBLIC);
    assert!(matches!(
        signing_key(Algorithm::ES256, &public_only),
        Err(KeyError::MissingKeyMaterial { .. })
    ));

    let private_only = KeyMaterial::private_only(P256_PRIVATE);
    assert!(matches!(
        verification_key(Algorithm::ES256, &private_only),
        Err(KeyError::MissingKeyMaterial { .. })
    ));

    let empty = KeyMaterial::key_pair("", "");
    assert!(matches!(
        signing_key(Algorithm::RS256, &empty),
        Err(KeyError::MissingKeyMaterial { .. })
    ));

    let secret = KeyMaterial::symmetric(HMAC_SECRET);
    assert!(matches!(
        signing_key(Algorithm::RS256, &secret),
        Err(KeyError::MissingKeyMaterial { .. })
    ));
}

#[test]
fn test_verification_never_needs_the_private_key() {
    // A garbage private key must not matter for verification.
    let keys = KeyMaterial::key_pair("not a key", RSA_PUBLIC);
    assert!(verification_key(Algorithm::RS256, &keys).is_ok());
    assert!(matches!(
        signing_key(Algorithm::RS256, &keys),
        Err(KeyError::InvalidKeyFormat { .. })
    ));
}

#[test]
fn test_key_of_wrong_type_is_invalid_format() {
    let cases = [
        (Algorithm::ES256, KeyMaterial::key_pair(P384_PRIVATE, P384_PUBLIC)),
        (Algorithm::ES512, KeyMaterial::key_pair(P256_PRIVATE, P256_PUBLIC)),
        (Algorithm::ES384, KeyMaterial::key_pair(RSA_PRIVATE, RSA_PUBLIC)),
        (Algorithm::RS256, KeyMaterial::key_pair(P256_PRIVATE, P256_PUBLIC)),
        (Algorithm::RS256, KeyMaterial::key_pair(RSA_PUBLIC, RSA_PRIVATE)),
        (Algorithm::RS256, KeyMaterial::key_pair("garbage", "garbage")),
        (Algorithm::ES256, KeyMaterial::key_pair(vec![0xff, 0xfe], vec![0xff, 0xfe])),
    ];

    for (alg, keys) in cases {
        assert!(
            matches!(signing_key(alg, &keys), Err(KeyError::InvalidKeyFormat { .. })),
            "signing {alg} with {keys:?}"
        );
        assert!(
            matches!(verification_key(alg, &keys), Err(KeyError::InvalidKeyFormat { .. })),
            "verifying {alg} with {keys:?}"
        );
    }
}

#[test]
fn test_small_rsa_keys_are_rejected() {
    let keys = KeyMaterial::key_pair(RSA_1024_PRIVATE, RSA_1024_PUBLIC);
    assert!(matches!(
        signing_key(Algorithm::RS256, &keys),
        Err(KeyError::InvalidKeyFormat { .. })
    ));
    assert!(matches!(
        verification_key(Algorithm::RS256, &keys),
        Err(KeyError::InvalidKeyFormat { .. })
    ));
}

#[test]
fn test_encrypted_private_key_with_passphrase() {
    let keys = KeyMaterial::key_pair(RSA_PRIVATE_ENCRYPTED, RSA_PUBLIC).with_passphrase(RSA_PASSPHRASE);
    let codec = JwtCodec::new(Algorithm::RS256, keys);

    let token = codec
        .encode(&object(json!({ "sub": "encrypted" })))
        .expect("encode");
    let claims = codec.decode(&token).expect("decode");
    assert_eq!(claims["sub"], json!("encrypted"));

    // Same key, unencrypted: identical deterministic signature.
    let plain = JwtCodec::new(Algorithm::RS256, keys_for(Algorithm::RS256))
        .encode(&object(json!({ "sub": "encrypted" })))
        .expect("encode");
    assert_eq!(token, plain);
}

#[test]
fn test_encrypted_private_key_without_or_with_wrong_passphrase() {
    let no_passphrase = KeyMaterial::private_only(RSA_PRIVATE_ENCRYPTED);
    let empty_passphrase = KeyMaterial::private_only(RSA_PRIVATE_ENCRYPTED).with_passphrase("");
    let wrong_passphrase =
        KeyMaterial::private_only(RSA_PRIVATE_ENCRYPTED).with_passphrase("battery-staple");

    for keys in [no_passphrase, empty_passphrase, wrong_passphrase] {
        let err = JwtCodec::new(Algorithm::RS256, keys)
            .encode(&object(json!({ "sub": "x" })))
            .expect_err("undecryptable key");
        assert!(matches!(
            err.key_error(),
            Some(KeyError::InvalidKeyFormat { .. })
        ));
    }
}

#[test]
fn test_legacy_pem_encodings() {
    let pkcs1 = KeyMaterial::key_pair(RSA_PRIVATE_PKCS1, RSA_PUBLIC_PKCS1);
    let token = JwtCodec::new(Algorithm::RS384, pkcs1)
        .encode(&full_claims())
        .expect("encode with PKCS#1");
    assert!(JwtCodec::new(Algorithm::RS384, keys_for(Algorithm::RS384))
        .decode(&token)
        .is_ok());

    let sec1 = KeyMaterial::key_pair(P256_PRIVATE_SEC1, P256_PUBLIC);
    let token = JwtCodec::new(Algorithm::ES256, sec1)
        .encode(&full_claims())
        .expect("encode with SEC1");
    assert!(JwtCodec::new(Algorithm::ES256, keys_for(Algorithm::ES256))
        .decode(&token)
        .is_ok());
}

#[test]
fn test_debug_output_redacts_secrets() {
    let symmetric = format!("{:?}", KeyMaterial::symmetric("super-secret-value"));
    assert!(!symmetric.contains("super-secret-value"));
    assert!(symmetric.contains("<redacted>"));

    let asymmetric = format!(
        "{:?}",
        KeyMaterial::key_pair(RSA_PRIVATE, RSA_PUBLIC).with_passphrase("hunter2")
    );
    assert!(!asymmetric.contains("PRIVATE KEY"));
    assert!(!asymmetric.contains("hunter2"));

    let handle = signing_key(Algorithm::HS256, &KeyMaterial::symmetric("super-secret-value"))
        .expect("signing key");
    assert!(!format!("{handle:?}").contains("super-secret-value"));
}
