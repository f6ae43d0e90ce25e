//! HMAC-SHA2 (HS256, HS384, HS512)

use crate::algorithm::Strength;
use crate::error::EncodeError;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

#[inline]
fn mac<M: Mac + hmac::digest::KeyInit>(message: &[u8], secret: &[u8]) -> Result<M, EncodeError> {
    let mut mac = <M as Mac>::new_from_slice(secret)
        .map_err(|_| EncodeError::Signing("invalid HMAC key length".to_string()))?;
    mac.update(message);
    Ok(mac)
}

pub(super) fn sign(strength: Strength, message: &[u8], secret: &[u8]) -> Result<Vec<u8>, EncodeError> {
    Ok(match strength {
        Strength::Sha256 => mac::<HmacSha256>(message, secret)?.finalize().into_bytes().to_vec(),
        Strength::Sha384 => mac::<HmacSha384>(message, secret)?.finalize().into_bytes().to_vec(),
        Strength::Sha512 => mac::<HmacSha512>(message, secret)?.finalize().into_bytes().to_vec(),
    })
}

/// Constant-time comparison against the recomputed tag
pub(super) fn verify(strength: Strength, message: &[u8], signature: &[u8], secret: &[u8]) -> bool {
    match strength {
        Strength::Sha256 => mac::<HmacSha256>(message, secret)
            .is_ok_and(|mac| mac.verify_slice(signature).is_ok()),
        Strength::Sha384 => mac::<HmacSha384>(message, secret)
            .is_ok_and(|mac| mac.verify_slice(signature).is_ok()),
        Strength::Sha512 => mac::<HmacSha512>(message, secret)
            .is_ok_and(|mac| mac.verify_slice(signature).is_ok()),
    }
}
