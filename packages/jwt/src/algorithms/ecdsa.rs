//! ECDSA (ES256 on P-256, ES384 on P-384, ES512 on P-521)
//!
//! JWS carries ECDSA signatures as the fixed-width big-endian `r || s`
//! concatenation, not DER. All three curves sign with RFC 6979 nonces, so
//! the same key and message always give the same signature.

use crate::error::EncodeError;
use ::ecdsa::hazmat::{bits2field, sign_prehashed};
use p256::ecdsa::signature::{Signer, Verifier};
use p521::NistP521;
use rfc6979::HmacDrbg;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

fn signing_failed(e: impl std::fmt::Display) -> EncodeError {
    EncodeError::Signing(format!("ECDSA signing failed: {e}"))
}

pub(super) fn sign_p256(message: &[u8], key: &p256::ecdsa::SigningKey) -> Result<Vec<u8>, EncodeError> {
    let signature: p256::ecdsa::Signature = key.try_sign(message).map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

pub(super) fn sign_p384(message: &[u8], key: &p384::ecdsa::SigningKey) -> Result<Vec<u8>, EncodeError> {
    let signature: p384::ecdsa::Signature = key.try_sign(message).map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

/// ES512 with an RFC 6979 nonce
///
/// `p521::ecdsa::SigningKey` only signs with a random nonce, so the
/// deterministic construction is spelled out here: HMAC-DRBG over SHA-512
/// seeded with the key and the 64-byte digest, each 66-byte output shifted
/// down to 521 bits until it lands in `[1, n)`.
pub(super) fn sign_p521(message: &[u8], key: &p521::ecdsa::SigningKey) -> Result<Vec<u8>, EncodeError> {
    let digest = Sha512::digest(message);
    // The digest is shorter than the group order, so it is already reduced.
    let z = bits2field::<NistP521>(&digest).map_err(signing_failed)?;
    let secret = Zeroizing::new(key.to_bytes());

    let mut drbg = HmacDrbg::<Sha512>::new(&secret, &z, &[]);
    let k = loop {
        let mut t = Zeroizing::new(p521::FieldBytes::default());
        drbg.fill_bytes(&mut t);
        let candidate = Zeroizing::new(shift_to_521_bits(&t));
        if let Some(k) = Option::<p521::NonZeroScalar>::from(p521::NonZeroScalar::from_repr(*candidate)) {
            break k;
        }
    };

    let (signature, _) = sign_prehashed::<NistP521, p521::Scalar>(
        key.as_nonzero_scalar().as_ref(),
        *k.as_ref(),
        &z,
    )
    .map_err(signing_failed)?;
    Ok(signature.to_bytes().to_vec())
}

/// `bits2int` for a 528-bit DRBG block: drop the low 7 bits
fn shift_to_521_bits(block: &p521::FieldBytes) -> p521::FieldBytes {
    let mut out = p521::FieldBytes::default();
    let mut previous = 0u8;
    for (out, &byte) in out.iter_mut().zip(block.iter()) {
        *out = (previous << 1) | (byte >> 7);
        previous = byte;
    }
    out
}

pub(super) fn verify_p256(message: &[u8], signature: &[u8], key: &p256::ecdsa::VerifyingKey) -> bool {
    p256::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

pub(super) fn verify_p384(message: &[u8], signature: &[u8], key: &p384::ecdsa::VerifyingKey) -> bool {
    p384::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}

pub(super) fn verify_p521(message: &[u8], signature: &[u8], key: &p521::ecdsa::VerifyingKey) -> bool {
    p521::ecdsa::Signature::from_slice(signature)
        .is_ok_and(|signature| key.verify(message, &signature).is_ok())
}
