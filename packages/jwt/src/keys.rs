//! Key material and key resolution
//!
//! [`KeyMaterial`] is what the application configures. [`signing_key`] and
//! [`verification_key`] turn it into a concrete handle for one operation.
//! The two are resolved independently: for HMAC both happen to be the
//! shared secret, for RSA/ECDSA they come from different PEM documents.

use crate::algorithm::{Algorithm, Family, Strength};
use crate::error::KeyError;
use pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use zeroize::Zeroizing;

/// Smallest RSA modulus accepted for signing or verification
pub const MIN_RSA_BITS: usize = 2048;

const LABEL_PKCS8: &str = "PRIVATE KEY";
const LABEL_PKCS8_ENCRYPTED: &str = "ENCRYPTED PRIVATE KEY";
const LABEL_PKCS1_PRIVATE: &str = "RSA PRIVATE KEY";
const LABEL_PKCS1_PUBLIC: &str = "RSA PUBLIC KEY";
const LABEL_SEC1: &str = "EC PRIVATE KEY";
const LABEL_SPKI: &str = "PUBLIC KEY";

/// Configured key material
///
/// Built once from configuration and shared read-only by every encode and
/// decode call. Rotating keys means building a new value.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared secret for the HMAC family
    Symmetric {
        /// Raw secret bytes; empty means "not configured"
        secret: Zeroizing<Vec<u8>>,
    },
    /// PEM documents for the RSA and ECDSA families
    Asymmetric {
        /// Private key PEM, needed for signing only
        private_key: Option<Zeroizing<Vec<u8>>>,
        /// Public key PEM, needed for verification only
        public_key: Option<Vec<u8>>,
        /// Passphrase for an encrypted private key
        passphrase: Option<Zeroizing<Vec<u8>>>,
    },
}

impl KeyMaterial {
    /// Shared secret for HS256/HS384/HS512
    #[must_use]
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Symmetric {
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Private and public key PEM documents
    #[must_use]
    pub fn key_pair(private_pem: impl Into<Vec<u8>>, public_pem: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Asymmetric {
            private_key: non_empty(private_pem.into()).map(Zeroizing::new),
            public_key: non_empty(public_pem.into()),
            passphrase: None,
        }
    }

    /// Public key only; enough to verify, never to sign
    #[must_use]
    pub fn public_only(public_pem: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Asymmetric {
            private_key: None,
            public_key: non_empty(public_pem.into()),
            passphrase: None,
        }
    }

    /// Private key only; enough to sign, never to verify
    #[must_use]
    pub fn private_only(private_pem: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Asymmetric {
            private_key: non_empty(private_pem.into()).map(Zeroizing::new),
            public_key: None,
            passphrase: None,
        }
    }

    /// Attach the passphrase of an encrypted private key
    ///
    /// An empty passphrase means "no decryption". No effect on symmetric
    /// material.
    #[must_use]
    pub fn with_passphrase(self, passphrase: impl Into<Vec<u8>>) -> Self {
        match self {
            KeyMaterial::Asymmetric {
                private_key,
                public_key,
                ..
            } => KeyMaterial::Asymmetric {
                private_key,
                public_key,
                passphrase: non_empty(passphrase.into()).map(Zeroizing::new),
            },
            symmetric @ KeyMaterial::Symmetric { .. } => symmetric,
        }
    }

    /// Whether this material carries a shared secret
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        matches!(self, KeyMaterial::Symmetric { .. })
    }

    fn secret(&self) -> Option<&[u8]> {
        match self {
            KeyMaterial::Symmetric { secret } if !secret.is_empty() => Some(secret.as_slice()),
            _ => None,
        }
    }

    fn private_pem(&self) -> Option<&[u8]> {
        match self {
            KeyMaterial::Asymmetric {
                private_key: Some(key),
                ..
            } if !key.is_empty() => Some(key.as_slice()),
            _ => None,
        }
    }

    fn public_pem(&self) -> Option<&[u8]> {
        match self {
            KeyMaterial::Asymmetric {
                public_key: Some(key),
                ..
            } if !key.is_empty() => Some(key.as_slice()),
            _ => None,
        }
    }

    fn passphrase(&self) -> Option<&[u8]> {
        match self {
            KeyMaterial::Asymmetric {
                passphrase: Some(pass),
                ..
            } if !pass.is_empty() => Some(pass.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Symmetric { secret } => f
                .debug_struct("Symmetric")
                .field("secret", &Redacted(!secret.is_empty()))
                .finish(),
            KeyMaterial::Asymmetric {
                private_key,
                public_key,
                passphrase,
            } => f
                .debug_struct("Asymmetric")
                .field("private_key", &Redacted(private_key.is_some()))
                .field("public_key", &public_key.as_ref().map(Vec::len))
                .field("passphrase", &Redacted(passphrase.is_some()))
                .finish(),
        }
    }
}

struct Redacted(bool);

impl fmt::Debug for Redacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "<redacted>" } else { "<none>" })
    }
}

/// Key handle used to produce a signature
pub enum SigningKey {
    /// HMAC shared secret
    Hmac(Zeroizing<Vec<u8>>),
    /// RSA private key
    Rsa(Box<RsaPrivateKey>),
    /// P-256 private key
    P256(p256::ecdsa::SigningKey),
    /// P-384 private key
    P384(p384::ecdsa::SigningKey),
    /// P-521 private key
    P521(p521::ecdsa::SigningKey),
}

/// Key handle used to check a signature
pub enum VerificationKey {
    /// HMAC shared secret
    Hmac(Zeroizing<Vec<u8>>),
    /// RSA public key
    Rsa(Box<RsaPublicKey>),
    /// P-256 public key
    P256(p256::ecdsa::VerifyingKey),
    /// P-384 public key
    P384(p384::ecdsa::VerifyingKey),
    /// P-521 public key
    P521(p521::ecdsa::VerifyingKey),
}

impl SigningKey {
    /// Whether this handle can sign for `alg`
    #[must_use]
    pub fn supports(&self, alg: Algorithm) -> bool {
        matches!(
            (self, alg.family(), alg.strength()),
            (SigningKey::Hmac(_), Family::Hmac, _)
                | (SigningKey::Rsa(_), Family::Rsa, _)
                | (SigningKey::P256(_), Family::Ecdsa, Strength::Sha256)
                | (SigningKey::P384(_), Family::Ecdsa, Strength::Sha384)
                | (SigningKey::P521(_), Family::Ecdsa, Strength::Sha512)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            SigningKey::Hmac(_) => "Hmac",
            SigningKey::Rsa(_) => "Rsa",
            SigningKey::P256(_) => "P256",
            SigningKey::P384(_) => "P384",
            SigningKey::P521(_) => "P521",
        }
    }
}

impl VerificationKey {
    /// Whether this handle can verify for `alg`
    #[must_use]
    pub fn supports(&self, alg: Algorithm) -> bool {
        matches!(
            (self, alg.family(), alg.strength()),
            (VerificationKey::Hmac(_), Family::Hmac, _)
                | (VerificationKey::Rsa(_), Family::Rsa, _)
                | (VerificationKey::P256(_), Family::Ecdsa, Strength::Sha256)
                | (VerificationKey::P384(_), Family::Ecdsa, Strength::Sha384)
                | (VerificationKey::P521(_), Family::Ecdsa, Strength::Sha512)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            VerificationKey::Hmac(_) => "Hmac",
            VerificationKey::Rsa(_) => "Rsa",
            VerificationKey::P256(_) => "P256",
            VerificationKey::P384(_) => "P384",
            VerificationKey::P521(_) => "P521",
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind()).field(&Redacted(true)).finish()
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.kind()).finish()
    }
}

/// Resolve the key used to sign tokens with `alg`
///
/// # Errors
/// [`KeyError::MissingKeyMaterial`] when the secret or private key is not
/// configured, [`KeyError::InvalidKeyFormat`] when the private key cannot
/// be parsed (or decrypted) as a key for `alg`.
pub fn signing_key(alg: Algorithm, keys: &KeyMaterial) -> Result<SigningKey, KeyError> {
    tracing::trace!(alg = %alg, "resolving signing key");
    match alg.family() {
        Family::Hmac => shared_secret(alg, keys).map(SigningKey::Hmac),
        Family::Rsa | Family::Ecdsa => {
            let pem = keys
                .private_pem()
                .ok_or_else(|| KeyError::missing(alg, "a private key"))?;
            let pem = pem_text(alg, pem)?;
            let passphrase = keys.passphrase();
            match (alg.family(), alg.strength()) {
                (Family::Rsa, _) => rsa_private_key(alg, pem, passphrase)
                    .map(|key| SigningKey::Rsa(Box::new(key))),
                (_, Strength::Sha256) => {
                    let secret: p256::SecretKey =
                        ec_private_key(alg, pem, passphrase, p256::SecretKey::from_sec1_pem)?;
                    Ok(SigningKey::P256(secret.into()))
                }
                (_, Strength::Sha384) => {
                    let secret: p384::SecretKey =
                        ec_private_key(alg, pem, passphrase, p384::SecretKey::from_sec1_pem)?;
                    Ok(SigningKey::P384(secret.into()))
                }
                (_, Strength::Sha512) => {
                    let secret: p521::SecretKey =
                        ec_private_key(alg, pem, passphrase, p521::SecretKey::from_sec1_pem)?;
                    p521::ecdsa::SigningKey::from_slice(secret.to_bytes().as_slice())
                        .map(SigningKey::P521)
                        .map_err(|e| KeyError::invalid(alg, format!("invalid P-521 scalar: {e}")))
                }
            }
        }
    }
}

/// Resolve the key used to verify tokens signed with `alg`
///
/// Never touches the private key.
///
/// # Errors
/// [`KeyError::MissingKeyMaterial`] when the secret or public key is not
/// configured, [`KeyError::InvalidKeyFormat`] when the public key cannot be
/// parsed as a key for `alg`.
pub fn verification_key(alg: Algorithm, keys: &KeyMaterial) -> Result<VerificationKey, KeyError> {
    tracing::trace!(alg = %alg, "resolving verification key");
    match alg.family() {
        Family::Hmac => shared_secret(alg, keys).map(VerificationKey::Hmac),
        Family::Rsa | Family::Ecdsa => {
            let pem = keys
                .public_pem()
                .ok_or_else(|| KeyError::missing(alg, "a public key"))?;
            let pem = pem_text(alg, pem)?;
            match (alg.family(), alg.strength()) {
                (Family::Rsa, _) => {
                    rsa_public_key(alg, pem).map(|key| VerificationKey::Rsa(Box::new(key)))
                }
                (_, Strength::Sha256) => {
                    let public: p256::PublicKey = spki_public_key(alg, pem)?;
                    Ok(VerificationKey::P256(public.into()))
                }
                (_, Strength::Sha384) => {
                    let public: p384::PublicKey = spki_public_key(alg, pem)?;
                    Ok(VerificationKey::P384(public.into()))
                }
                (_, Strength::Sha512) => {
                    use p521::elliptic_curve::sec1::ToEncodedPoint;

                    let public: p521::PublicKey = spki_public_key(alg, pem)?;
                    p521::ecdsa::VerifyingKey::from_sec1_bytes(
                        public.to_encoded_point(false).as_bytes(),
                    )
                    .map(VerificationKey::P521)
                    .map_err(|e| KeyError::invalid(alg, format!("invalid P-521 point: {e}")))
                }
            }
        }
    }
}

/// Single code path for both halves of a symmetric key
fn shared_secret(alg: Algorithm, keys: &KeyMaterial) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    let secret = keys
        .secret()
        .ok_or_else(|| KeyError::missing(alg, "a secret"))?;
    if secret.len() < alg.strength().digest_len() {
        tracing::warn!(
            alg = %alg,
            secret_len = secret.len(),
            recommended = alg.strength().digest_len(),
            "HMAC secret is shorter than the digest output"
        );
    }
    Ok(Zeroizing::new(secret.to_vec()))
}

fn rsa_private_key(
    alg: Algorithm,
    pem: &str,
    passphrase: Option<&[u8]>,
) -> Result<RsaPrivateKey, KeyError> {
    let key = if pem_label(pem) == Some(LABEL_PKCS1_PRIVATE) {
        RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| KeyError::invalid(alg, format!("invalid PKCS#1 private key: {e}")))?
    } else {
        pkcs8_private_key(alg, pem, passphrase)?
    };
    ensure_rsa_size(alg, key.size())?;
    Ok(key)
}

fn rsa_public_key(alg: Algorithm, pem: &str) -> Result<RsaPublicKey, KeyError> {
    let key = if pem_label(pem) == Some(LABEL_PKCS1_PUBLIC) {
        RsaPublicKey::from_pkcs1_pem(pem)
            .map_err(|e| KeyError::invalid(alg, format!("invalid PKCS#1 public key: {e}")))?
    } else {
        spki_public_key(alg, pem)?
    };
    ensure_rsa_size(alg, key.size())?;
    Ok(key)
}

fn ensure_rsa_size(alg: Algorithm, modulus_bytes: usize) -> Result<(), KeyError> {
    let bits = modulus_bytes * 8;
    if bits < MIN_RSA_BITS {
        return Err(KeyError::invalid(
            alg,
            format!("RSA modulus is {bits} bits, at least {MIN_RSA_BITS} required"),
        ));
    }
    Ok(())
}

fn ec_private_key<K, E>(
    alg: Algorithm,
    pem: &str,
    passphrase: Option<&[u8]>,
    from_sec1: impl FnOnce(&str) -> Result<K, E>,
) -> Result<K, KeyError>
where
    K: DecodePrivateKey,
    E: fmt::Display,
{
    if pem_label(pem) == Some(LABEL_SEC1) {
        return from_sec1(pem)
            .map_err(|e| KeyError::invalid(alg, format!("invalid SEC1 private key: {e}")));
    }
    pkcs8_private_key(alg, pem, passphrase)
}

fn pkcs8_private_key<K: DecodePrivateKey>(
    alg: Algorithm,
    pem: &str,
    passphrase: Option<&[u8]>,
) -> Result<K, KeyError> {
    match pem_label(pem) {
        Some(LABEL_PKCS8_ENCRYPTED) => {
            let passphrase = passphrase.ok_or_else(|| {
                KeyError::invalid(alg, "private key is encrypted but no passphrase is set")
            })?;
            K::from_pkcs8_encrypted_pem(pem, passphrase)
                .map_err(|e| KeyError::invalid(alg, format!("could not decrypt private key: {e}")))
        }
        Some(LABEL_PKCS8) => K::from_pkcs8_pem(pem)
            .map_err(|e| KeyError::invalid(alg, format!("invalid PKCS#8 private key: {e}"))),
        Some(other) => Err(KeyError::invalid(
            alg,
            format!("unexpected PEM label `{other}` for a private key"),
        )),
        None => Err(KeyError::invalid(alg, "private key is not PEM encoded")),
    }
}

fn spki_public_key<K: DecodePublicKey>(alg: Algorithm, pem: &str) -> Result<K, KeyError> {
    match pem_label(pem) {
        Some(LABEL_SPKI) => K::from_public_key_pem(pem)
            .map_err(|e| KeyError::invalid(alg, format!("invalid public key: {e}"))),
        Some(other) => Err(KeyError::invalid(
            alg,
            format!("unexpected PEM label `{other}` for a public key"),
        )),
        None => Err(KeyError::invalid(alg, "public key is not PEM encoded")),
    }
}

fn pem_text(alg: Algorithm, pem: &[u8]) -> Result<&str, KeyError> {
    std::str::from_utf8(pem)
        .map(str::trim)
        .map_err(|_| KeyError::invalid(alg, "key is not valid UTF-8 PEM text"))
}

/// Label of the first PEM block, e.g. `PRIVATE KEY`
fn pem_label(pem: &str) -> Option<&str> {
    let start = pem.find("-----BEGIN ")? + "-----BEGIN ".len();
    let rest = &pem[start..];
    let end = rest.find("-----")?;
    Some(&rest[..end])
}

fn non_empty(bytes: Vec<u8>) -> Option<Vec<u8>> {
    if bytes.is_empty() { None } else { Some(bytes) }
}
