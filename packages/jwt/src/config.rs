//! Codec configuration
//!
//! Mirrors the application's auth configuration:
//! `{ secret, algorithm, keys: { private, public, passphrase } }`.
//! Key entries hold either inline PEM text or a `file://` reference that
//! is read once, when [`JwtConfig::key_material`] runs.

use crate::algorithm::Algorithm;
use crate::error::{JwtResult, KeyError};
use crate::keys::KeyMaterial;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use zeroize::Zeroizing;

/// Algorithm used when none is configured
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// Prefix marking a key entry as a path to read
pub const FILE_PREFIX: &str = "file://";

/// Environment variable names read by [`JwtConfig::from_env`]
pub mod env {
    /// Shared secret
    pub const SECRET: &str = "JWT_SECRET";
    /// Algorithm identifier
    pub const ALGORITHM: &str = "JWT_ALGO";
    /// Private key PEM or `file://` path
    pub const PRIVATE_KEY: &str = "JWT_PRIVATE_KEY";
    /// Public key PEM or `file://` path
    pub const PUBLIC_KEY: &str = "JWT_PUBLIC_KEY";
    /// Private key passphrase
    pub const PASSPHRASE: &str = "JWT_PASSPHRASE";
}

/// JWT configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret for the HMAC family
    pub secret: Option<String>,
    /// One of the nine registered algorithm names
    pub algorithm: String,
    /// Asymmetric key entries
    pub keys: KeysConfig,
}

/// Asymmetric key entries
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Private key PEM or `file://` path
    pub private: Option<String>,
    /// Public key PEM or `file://` path
    pub public: Option<String>,
    /// Passphrase for an encrypted private key
    pub passphrase: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: DEFAULT_ALGORITHM.to_string(),
            keys: KeysConfig::default(),
        }
    }
}

impl JwtConfig {
    /// Symmetric configuration
    #[must_use]
    pub fn with_secret(algorithm: &str, secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            algorithm: algorithm.to_string(),
            keys: KeysConfig::default(),
        }
    }

    /// Asymmetric configuration
    #[must_use]
    pub fn with_keys(algorithm: &str, keys: KeysConfig) -> Self {
        Self {
            secret: None,
            algorithm: algorithm.to_string(),
            keys,
        }
    }

    /// Read `JWT_SECRET`, `JWT_ALGO`, `JWT_PRIVATE_KEY`, `JWT_PUBLIC_KEY`
    /// and `JWT_PASSPHRASE` from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`JwtConfig::from_env`] with a custom variable source
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.is_empty());
        Self {
            secret: read(env::SECRET),
            algorithm: read(env::ALGORITHM).unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
            keys: KeysConfig {
                private: read(env::PRIVATE_KEY),
                public: read(env::PUBLIC_KEY),
                passphrase: read(env::PASSPHRASE),
            },
        }
    }

    /// Resolve the configured algorithm name
    ///
    /// # Errors
    /// [`crate::JwtError::UnsupportedAlgorithm`] for unknown names.
    pub fn algorithm(&self) -> JwtResult<Algorithm> {
        Algorithm::resolve(&self.algorithm)
    }

    /// Build the key material matching `algorithm`'s family
    ///
    /// HMAC algorithms take `secret`; RSA and ECDSA take the `keys` entries,
    /// reading any `file://` references now.
    ///
    /// # Errors
    /// [`KeyError::Unreadable`] when a referenced key file cannot be read.
    /// Missing entries are not an error here; they surface when the key is
    /// resolved for an operation that needs it.
    pub fn key_material(&self, algorithm: Algorithm) -> Result<KeyMaterial, KeyError> {
        if !algorithm.is_asymmetric() {
            let secret = self.secret.as_deref().unwrap_or_default();
            return Ok(KeyMaterial::symmetric(secret.as_bytes()));
        }

        let private_key = self
            .keys
            .private
            .as_deref()
            .map(load_key)
            .transpose()?
            .filter(|pem| !pem.is_empty())
            .map(Zeroizing::new);
        let public_key = self
            .keys
            .public
            .as_deref()
            .map(load_key)
            .transpose()?
            .filter(|pem| !pem.is_empty());
        let passphrase = self
            .keys
            .passphrase
            .as_deref()
            .filter(|pass| !pass.is_empty())
            .map(|pass| Zeroizing::new(pass.as_bytes().to_vec()));

        Ok(KeyMaterial::Asymmetric {
            private_key,
            public_key,
            passphrase,
        })
    }
}

/// Inline PEM text, or the contents of a `file://` path
fn load_key(entry: &str) -> Result<Vec<u8>, KeyError> {
    match entry.strip_prefix(FILE_PREFIX) {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::debug!(path = %path.display(), "loading key file");
            std::fs::read(&path).map_err(|source| KeyError::Unreadable { path, source })
        }
        None => Ok(entry.as_bytes().to_vec()),
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("keys", &self.keys)
            .finish()
    }
}

impl fmt::Debug for KeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let describe = |entry: &Option<String>| {
            entry.as_deref().map(|value| {
                if value.starts_with(FILE_PREFIX) {
                    value.to_string()
                } else {
                    "<inline>".to_string()
                }
            })
        };
        f.debug_struct("KeysConfig")
            .field("private", &describe(&self.private))
            .field("public", &describe(&self.public))
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
