//! Signing and verification primitives
//!
//! One module per family. Dispatch is a `match` over the resolved key
//! handle; the algorithm only contributes the hash strength.

mod ecdsa;
mod hmac;
mod rsa;
pub(crate) mod utils;

use crate::algorithm::Algorithm;
use crate::error::EncodeError;
use crate::keys::{SigningKey, VerificationKey};

/// Sign `message` (the `header.payload` bytes) with `key`
pub(crate) fn sign(alg: Algorithm, key: &SigningKey, message: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if !key.supports(alg) {
        return Err(EncodeError::Signing(format!(
            "{key:?} key cannot sign {alg} tokens"
        )));
    }
    match key {
        SigningKey::Hmac(secret) => hmac::sign(alg.strength(), message, secret),
        SigningKey::Rsa(private_key) => rsa::sign(alg.strength(), message, private_key),
        SigningKey::P256(signing_key) => ecdsa::sign_p256(message, signing_key),
        SigningKey::P384(signing_key) => ecdsa::sign_p384(message, signing_key),
        SigningKey::P521(signing_key) => ecdsa::sign_p521(message, signing_key),
    }
}

/// Check `signature` over `message` with `key`
///
/// Any mismatch, including a key of the wrong family or a signature block
/// of the wrong length, is reported as `false`.
pub(crate) fn verify(alg: Algorithm, key: &VerificationKey, message: &[u8], signature: &[u8]) -> bool {
    if !key.supports(alg) {
        return false;
    }
    match key {
        VerificationKey::Hmac(secret) => hmac::verify(alg.strength(), message, signature, secret),
        VerificationKey::Rsa(public_key) => rsa::verify(alg.strength(), message, signature, public_key),
        VerificationKey::P256(verifying_key) => ecdsa::verify_p256(message, signature, verifying_key),
        VerificationKey::P384(verifying_key) => ecdsa::verify_p384(message, signature, verifying_key),
        VerificationKey::P521(verifying_key) => ecdsa::verify_p521(message, signature, verifying_key),
    }
}
