//! Shared fixtures for the integration tests

#![allow(dead_code)]

use cryypt_jwt_codec::{Algorithm, KeyMaterial};
use serde_json::{Map, Value, json};

pub const HMAC_SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const OTHER_HMAC_SECRET: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

pub const RSA_PRIVATE: &str = include_str!("../fixtures/rsa_private.pem");
pub const RSA_PUBLIC: &str = include_str!("../fixtures/rsa_public.pem");
pub const RSA_PRIVATE_PKCS1: &str = include_str!("../fixtures/rsa_private_pkcs1.pem");
pub const RSA_PUBLIC_PKCS1: &str = include_str!("../fixtures/rsa_public_pkcs1.pem");
pub const RSA_PRIVATE_ENCRYPTED: &str = include_str!("../fixtures/rsa_private_encrypted.pem");
pub const RSA_PASSPHRASE: &str = "correct-horse";
pub const RSA_OTHER_PRIVATE: &str = include_str!("../fixtures/rsa_other_private.pem");
pub const RSA_OTHER_PUBLIC: &str = include_str!("../fixtures/rsa_other_public.pem");
pub const RSA_1024_PRIVATE: &str = include_str!("../fixtures/rsa_1024_private.pem");
pub const RSA_1024_PUBLIC: &str = include_str!("../fixtures/rsa_1024_public.pem");

pub const P256_PRIVATE: &str = include_str!("../fixtures/ec_p256_private.pem");
pub const P256_PRIVATE_SEC1: &str = include_str!("../fixtures/ec_p256_private_sec1.pem");
pub const P256_PUBLIC: &str = include_str!("../fixtures/ec_p256_public.pem");
pub const P256_OTHER_PRIVATE: &str = include_str!("../fixtures/ec_p256_other_private.pem");
pub const P256_OTHER_PUBLIC: &str = include_str!("../fixtures/ec_p256_other_public.pem");
pub const P384_PRIVATE: &str = include_str!("../fixtures/ec_p384_private.pem");
pub const P384_PUBLIC: &str = include_str!("../fixtures/ec_p384_public.pem");
pub const P384_OTHER_PRIVATE: &str = include_str!("../fixtures/ec_p384_other_private.pem");
pub const P384_OTHER_PUBLIC: &str = include_str!("../fixtures/ec_p384_other_public.pem");
pub const P521_PRIVATE: &str = include_str!("../fixtures/ec_p521_private.pem");
pub const P521_PUBLIC: &str = include_str!("../fixtures/ec_p521_public.pem");
pub const P521_OTHER_PRIVATE: &str = include_str!("../fixtures/ec_p521_other_private.pem");
pub const P521_OTHER_PUBLIC: &str = include_str!("../fixtures/ec_p521_other_public.pem");

/// Primary key set for `alg`
pub fn keys_for(alg: Algorithm) -> KeyMaterial {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            KeyMaterial::symmetric(HMAC_SECRET)
        }
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
            KeyMaterial::key_pair(RSA_PRIVATE, RSA_PUBLIC)
        }
        Algorithm::ES256 => KeyMaterial::key_pair(P256_PRIVATE, P256_PUBLIC),
        Algorithm::ES384 => KeyMaterial::key_pair(P384_PRIVATE, P384_PUBLIC),
        Algorithm::ES512 => KeyMaterial::key_pair(P521_PRIVATE, P521_PUBLIC),
    }
}

/// A different, equally valid key set for `alg`
pub fn other_keys_for(alg: Algorithm) -> KeyMaterial {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            KeyMaterial::symmetric(OTHER_HMAC_SECRET)
        }
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
            KeyMaterial::key_pair(RSA_OTHER_PRIVATE, RSA_OTHER_PUBLIC)
        }
        Algorithm::ES256 => KeyMaterial::key_pair(P256_OTHER_PRIVATE, P256_OTHER_PUBLIC),
        Algorithm::ES384 => KeyMaterial::key_pair(P384_OTHER_PRIVATE, P384_OTHER_PUBLIC),
        Algorithm::ES512 => KeyMaterial::key_pair(P521_OTHER_PRIVATE, P521_OTHER_PUBLIC),
    }
}

/// Public half only of the primary key set (secret for HMAC)
pub fn verify_only_keys_for(alg: Algorithm) -> KeyMaterial {
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            KeyMaterial::symmetric(HMAC_SECRET)
        }
        Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
            KeyMaterial::public_only(RSA_PUBLIC)
        }
        Algorithm::ES256 => KeyMaterial::public_only(P256_PUBLIC),
        Algorithm::ES384 => KeyMaterial::public_only(P384_PUBLIC),
        Algorithm::ES512 => KeyMaterial::public_only(P521_PUBLIC),
    }
}

pub const NOW: i64 = 1_700_000_000;

/// A claim mapping touching every registered claim plus custom ones
pub fn full_claims() -> Map<String, Value> {
    object(json!({
        "sub": "user-1",
        "iss": "/foo",
        "jti": "8f14e45f",
        "iat": NOW,
        "nbf": NOW,
        "exp": NOW + 3600,
        "aud": ["api", "web"],
        "role": "admin",
        "permissions": ["read", "write"],
        "profile": { "name": "Ada", "age": 36 }
    }))
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Flip one byte of the signature segment, keeping valid base64url
pub fn tamper_signature(token: &str, index: usize, mask: u8) -> String {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    let (signing_input, signature) = token.rsplit_once('.').unwrap_or((token, ""));
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap_or_default();
    if !bytes.is_empty() {
        let index = index % bytes.len();
        bytes[index] ^= mask.max(1);
    }
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Encode `value` as a base64url JSON segment
pub fn segment(value: &Value) -> String {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    URL_SAFE_NO_PAD.encode(value.to_string())
}
