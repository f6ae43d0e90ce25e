//! JSON Web Token codec
//!
//! This crate provides:
//! - HS256/384/512, RS256/384/512 and ES256/384/512 signing and verification
//! - Key resolution from shared secrets or PEM documents (PKCS#8, encrypted
//!   PKCS#8, PKCS#1, SEC1, SPKI)
//! - Normalisation of the registered claims (`aud`, `iss`, `sub`, `jti`,
//!   `iat`, `nbf`, `exp`) next to arbitrary custom claims
//! - A stateless, thread-safe [`JwtCodec`]
//!
//! ```no_run
//! use cryypt_jwt_codec::{Algorithm, JwtCodec, KeyMaterial};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), cryypt_jwt_codec::JwtError> {
//! let codec = JwtCodec::new(Algorithm::HS256, KeyMaterial::symmetric("secret"));
//! let token = codec.encode_from(&json!({ "sub": "42", "iss": "/login" }))?;
//! let claims = codec.decode(&token)?;
//! assert_eq!(claims["sub"], "42");
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
mod algorithms;
pub mod claims;
mod codec;
pub mod config;
mod error;
pub mod keys;
mod types;

pub use algorithm::{Algorithm, Family, Strength, resolve};
pub use claims::{Audience, ClaimSet, RegisteredClaims};
pub use codec::{CodecOptions, JwtCodec, decode, encode};
pub use config::{JwtConfig, KeysConfig};
pub use error::*;
pub use keys::{KeyMaterial, SigningKey, VerificationKey, signing_key, verification_key};
pub use types::{Header, TOKEN_TYPE};
