//! Algorithm registry
//!
//! The set of supported algorithms is closed: every identifier maps to
//! exactly one [`Algorithm`] variant, and family and hash strength are
//! derived from the variant rather than kept in a parallel table.

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signature algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// HMAC with SHA-2, shared secret
    Hmac,
    /// RSASSA-PKCS1-v1_5 with SHA-2
    Rsa,
    /// ECDSA over the NIST prime curves
    Ecdsa,
}

impl Family {
    /// RSA and ECDSA sign with a private key and verify with a public key
    #[inline]
    #[must_use]
    pub const fn is_asymmetric(self) -> bool {
        !matches!(self, Family::Hmac)
    }
}

/// Hash strength of an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strength {
    /// SHA-256 (P-256 for ECDSA)
    Sha256,
    /// SHA-384 (P-384 for ECDSA)
    Sha384,
    /// SHA-512 (P-521 for ECDSA)
    Sha512,
}

impl Strength {
    /// Digest output size in bytes
    #[inline]
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Strength::Sha256 => 32,
            Strength::Sha384 => 48,
            Strength::Sha512 => 64,
        }
    }
}

/// A registered JWS signature algorithm
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    RS512,
    /// ECDSA using P-256 and SHA-256
    ES256,
    /// ECDSA using P-384 and SHA-384
    ES384,
    /// ECDSA using P-521 and SHA-512
    ES512,
}

impl Algorithm {
    /// Every registered algorithm
    pub const ALL: [Algorithm; 9] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
    ];

    /// Resolve an algorithm from its identifier
    ///
    /// Matching is exact and case-sensitive; there is no default.
    ///
    /// # Errors
    /// Returns [`JwtError::UnsupportedAlgorithm`] for any other name.
    pub fn resolve(name: &str) -> JwtResult<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == name)
            .ok_or_else(|| JwtError::unsupported_algorithm(name))
    }

    /// The `alg` header value
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
        }
    }

    /// Signature family
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Family::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => Family::Rsa,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => Family::Ecdsa,
        }
    }

    /// Hash strength
    #[must_use]
    pub const fn strength(self) -> Strength {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::ES256 => Strength::Sha256,
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::ES384 => Strength::Sha384,
            Algorithm::HS512 | Algorithm::RS512 | Algorithm::ES512 => Strength::Sha512,
        }
    }

    /// Whether signing and verification use different keys
    #[inline]
    #[must_use]
    pub const fn is_asymmetric(self) -> bool {
        self.family().is_asymmetric()
    }
}

/// Free-function form of [`Algorithm::resolve`]
///
/// # Errors
/// Returns [`JwtError::UnsupportedAlgorithm`] for unknown names.
pub fn resolve(name: &str) -> JwtResult<Algorithm> {
    Algorithm::resolve(name)
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::resolve(s)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
