//! JWT error types
//!
//! The boundary type [`JwtError`] is deliberately coarse: one kind per
//! failure a caller has to react to differently. The inner kinds
//! ([`KeyError`], [`ClaimError`], [`EncodeError`], [`DecodeError`]) keep the
//! precise cause and are reachable through [`std::error::Error::source`].

use crate::algorithm::Algorithm;
use std::path::PathBuf;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// Errors surfaced to callers of the codec
#[derive(Debug, Error)]
pub enum JwtError {
    /// Configured algorithm name is not one of the nine registered identifiers
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key material referenced by the configuration could not be loaded
    #[error("invalid JWT configuration: {0}")]
    Configuration(#[source] KeyError),

    /// Token could not be produced
    #[error("could not create token: {0}")]
    Encoding(#[source] EncodeError),

    /// Token is structurally malformed, or its verification setup failed
    #[error("could not decode token: {0}")]
    Decoding(#[source] DecodeError),

    /// Token is well formed but its signature does not verify
    #[error("token signature could not be verified")]
    InvalidSignature,
}

impl JwtError {
    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        JwtError::UnsupportedAlgorithm(alg.to_string())
    }

    /// True when the token was rejected by signature verification
    #[must_use]
    pub fn is_invalid_signature(&self) -> bool {
        matches!(self, JwtError::InvalidSignature)
    }

    /// True for encode-side failures
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, JwtError::Encoding(_))
    }

    /// True for decode-side failures other than a bad signature
    #[must_use]
    pub fn is_decoding(&self) -> bool {
        matches!(self, JwtError::Decoding(_))
    }

    /// The key resolution failure underneath this error, if any
    #[must_use]
    pub fn key_error(&self) -> Option<&KeyError> {
        match self {
            JwtError::Configuration(err)
            | JwtError::Encoding(EncodeError::Key(err))
            | JwtError::Decoding(DecodeError::Key(err)) => Some(err),
            _ => None,
        }
    }

    /// The claim validation failure underneath this error, if any
    #[must_use]
    pub fn claim_error(&self) -> Option<&ClaimError> {
        match self {
            JwtError::Encoding(EncodeError::Claim(err))
            | JwtError::Decoding(DecodeError::Claim(err)) => Some(err),
            _ => None,
        }
    }
}

/// Failures while resolving signing or verification keys
#[derive(Debug, Error)]
pub enum KeyError {
    /// The secret or key file the algorithm needs was not configured
    #[error("{algorithm} requires {what}, but none was configured")]
    MissingKeyMaterial {
        /// Algorithm the key was resolved for
        algorithm: Algorithm,
        /// Which piece of key material is absent
        what: &'static str,
    },

    /// Key bytes could not be parsed as a key of the expected type
    #[error("invalid key for {algorithm}: {reason}")]
    InvalidKeyFormat {
        /// Algorithm the key was resolved for
        algorithm: Algorithm,
        /// What was wrong with the key
        reason: String,
    },

    /// A `file://` key reference could not be read
    #[error("could not read key file {}", path.display())]
    Unreadable {
        /// Path taken from the configuration
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

impl KeyError {
    pub(crate) fn missing(algorithm: Algorithm, what: &'static str) -> Self {
        KeyError::MissingKeyMaterial { algorithm, what }
    }

    pub(crate) fn invalid(algorithm: Algorithm, reason: impl Into<String>) -> Self {
        KeyError::InvalidKeyFormat {
            algorithm,
            reason: reason.into(),
        }
    }
}

/// Claim shape violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    /// A registered claim carries a value of the wrong shape
    #[error("invalid `{name}` claim: {reason}")]
    InvalidClaim {
        /// Claim name
        name: String,
        /// Expected shape
        reason: &'static str,
    },

    /// The claims did not serialize to a JSON object
    #[error("claims must serialize to a JSON object")]
    NotAnObject,
}

impl ClaimError {
    pub(crate) fn invalid(name: &str, reason: &'static str) -> Self {
        ClaimError::InvalidClaim {
            name: name.to_string(),
            reason,
        }
    }
}

/// Precise cause of an [`JwtError::Encoding`]
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Signing key could not be resolved
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Claim set could not be built
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// Header or payload could not be serialized
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The signing primitive rejected the input
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Precise cause of an [`JwtError::Decoding`]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Token structure is broken (segment count, base64url or JSON)
    #[error("malformed token: {0}")]
    Malformed(&'static str),

    /// Verification key could not be resolved
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The verified payload carries an ill-shaped registered claim
    #[error(transparent)]
    Claim(#[from] ClaimError),
}

impl From<EncodeError> for JwtError {
    fn from(err: EncodeError) -> Self {
        JwtError::Encoding(err)
    }
}

impl From<DecodeError> for JwtError {
    fn from(err: DecodeError) -> Self {
        JwtError::Decoding(err)
    }
}
