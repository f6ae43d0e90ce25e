//! RSASSA-PKCS1-v1_5 (RS256, RS384, RS512)
//!
//! Keys are used by reference; the digest is computed here and handed to
//! the padding scheme, so no key material is copied per call.

use crate::algorithm::Strength;
use crate::error::EncodeError;
use rsa::sha2::{Digest, Sha256, Sha384, Sha512};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};

/// Padding scheme and message digest for `strength`
fn scheme(strength: Strength, message: &[u8]) -> (Pkcs1v15Sign, Vec<u8>) {
    match strength {
        Strength::Sha256 => (Pkcs1v15Sign::new::<Sha256>(), Sha256::digest(message).to_vec()),
        Strength::Sha384 => (Pkcs1v15Sign::new::<Sha384>(), Sha384::digest(message).to_vec()),
        Strength::Sha512 => (Pkcs1v15Sign::new::<Sha512>(), Sha512::digest(message).to_vec()),
    }
}

pub(super) fn sign(
    strength: Strength,
    message: &[u8],
    private_key: &RsaPrivateKey,
) -> Result<Vec<u8>, EncodeError> {
    let (padding, digest) = scheme(strength, message);
    private_key
        .sign(padding, &digest)
        .map_err(|e| EncodeError::Signing(format!("RSA signing failed: {e}")))
}

pub(super) fn verify(
    strength: Strength,
    message: &[u8],
    signature: &[u8],
    public_key: &RsaPublicKey,
) -> bool {
    let (padding, digest) = scheme(strength, message);
    public_key.verify(padding, &digest, signature).is_ok()
}
