//! Token codec: claims to signed compact JWS and back

use crate::algorithm::Algorithm;
use crate::algorithms::{self, utils::base64_url_encode};
use crate::claims::ClaimSet;
use crate::config::JwtConfig;
use crate::error::{DecodeError, EncodeError, JwtError, JwtResult};
use crate::keys::{self, KeyMaterial};
use crate::types::{Header, UnverifiedToken};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Wire-format switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    /// Copy every claim into the JOSE header as well as the payload
    ///
    /// Only needed to stay byte-compatible with issuers that do this;
    /// headers otherwise carry just `alg` and `typ`.
    pub mirror_claims_in_header: bool,
}

impl CodecOptions {
    /// Options reproducing claim-mirroring headers
    #[must_use]
    pub fn mirrored() -> Self {
        Self {
            mirror_claims_in_header: true,
        }
    }
}

/// Stateless JWT encoder/decoder bound to one algorithm and key set
///
/// Cloning is cheap and every method takes `&self`, so one codec can be
/// shared across threads. To rotate keys, build a new codec.
#[derive(Debug, Clone)]
pub struct JwtCodec {
    algorithm: Algorithm,
    keys: Arc<KeyMaterial>,
    options: CodecOptions,
}

impl JwtCodec {
    /// Codec for `algorithm` using `keys`
    #[must_use]
    pub fn new(algorithm: Algorithm, keys: KeyMaterial) -> Self {
        Self {
            algorithm,
            keys: Arc::new(keys),
            options: CodecOptions::default(),
        }
    }

    /// Resolve algorithm and key material from configuration
    ///
    /// # Errors
    /// [`JwtError::UnsupportedAlgorithm`] for an unknown algorithm name,
    /// [`JwtError::Configuration`] when a `file://` key cannot be read.
    pub fn from_config(config: &JwtConfig) -> JwtResult<Self> {
        let algorithm = config.algorithm()?;
        let keys = config
            .key_material(algorithm)
            .map_err(JwtError::Configuration)?;
        tracing::debug!(alg = %algorithm, "JWT codec configured");
        Ok(Self::new(algorithm, keys))
    }

    /// Same codec with different wire options
    #[must_use]
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// New codec sharing these keys under another algorithm
    #[must_use]
    pub fn with_algorithm(&self, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            keys: Arc::clone(&self.keys),
            options: self.options,
        }
    }

    /// New codec with replacement key material
    #[must_use]
    pub fn with_keys(&self, keys: KeyMaterial) -> Self {
        Self {
            algorithm: self.algorithm,
            keys: Arc::new(keys),
            options: self.options,
        }
    }

    /// Configured algorithm
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured wire options
    #[must_use]
    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Sign a claim mapping into a compact token
    ///
    /// # Errors
    /// [`JwtError::Encoding`] wrapping the key, claim or signing failure.
    pub fn encode(&self, claims: &Map<String, Value>) -> JwtResult<String> {
        encode_with(self.algorithm, &self.keys, self.options, claims)
    }

    /// Sign any value that serializes to a JSON object
    ///
    /// # Errors
    /// As [`JwtCodec::encode`]; a non-object value is an invalid claim set.
    pub fn encode_from<T: Serialize + ?Sized>(&self, claims: &T) -> JwtResult<String> {
        match serde_json::to_value(claims) {
            Ok(Value::Object(map)) => self.encode(&map),
            Ok(_) => Err(EncodeError::Claim(crate::error::ClaimError::NotAnObject).into()),
            Err(e) => Err(EncodeError::Serialization(e).into()),
        }
    }

    /// Sign an already validated claim set
    ///
    /// # Errors
    /// [`JwtError::Encoding`] wrapping the key or signing failure.
    pub fn encode_claim_set(&self, claims: &ClaimSet) -> JwtResult<String> {
        self.encode(&claims.extract())
    }

    /// Verify a token and return its claims
    ///
    /// # Errors
    /// [`JwtError::Decoding`] for a malformed token or unusable
    /// verification key, [`JwtError::InvalidSignature`] when the signature
    /// does not verify under the configured algorithm.
    pub fn decode(&self, token: &str) -> JwtResult<Map<String, Value>> {
        self.decode_claim_set(token).map(|claims| claims.extract())
    }

    /// Verify a token and return its claims as a [`ClaimSet`]
    ///
    /// # Errors
    /// As [`JwtCodec::decode`].
    pub fn decode_claim_set(&self, token: &str) -> JwtResult<ClaimSet> {
        decode_with(self.algorithm, &self.keys, token)
    }

    /// Parse the header of a token without verifying anything
    ///
    /// Claims are never exposed this way.
    ///
    /// # Errors
    /// [`JwtError::Decoding`] when the header segment is malformed.
    pub fn peek_header(token: &str) -> JwtResult<Header> {
        Ok(UnverifiedToken::parse_header(token)?)
    }
}

/// Sign `claims` with `alg` and `keys`
///
/// # Errors
/// [`JwtError::Encoding`] wrapping the key, claim or signing failure.
pub fn encode(claims: &Map<String, Value>, alg: Algorithm, keys: &KeyMaterial) -> JwtResult<String> {
    encode_with(alg, keys, CodecOptions::default(), claims)
}

/// Verify `token` with `alg` and `keys` and return its claims
///
/// # Errors
/// [`JwtError::Decoding`] or [`JwtError::InvalidSignature`].
pub fn decode(token: &str, alg: Algorithm, keys: &KeyMaterial) -> JwtResult<Map<String, Value>> {
    decode_with(alg, keys, token).map(|claims| claims.extract())
}

fn encode_with(
    alg: Algorithm,
    keys: &KeyMaterial,
    options: CodecOptions,
    claims: &Map<String, Value>,
) -> JwtResult<String> {
    let signing_key = keys::signing_key(alg, keys).map_err(EncodeError::from)?;
    let claims = ClaimSet::build(claims).map_err(EncodeError::from)?;
    let payload = claims.extract();

    let mut header = Header::new(alg.name());
    if options.mirror_claims_in_header {
        header = header.with_mirrored_claims(&payload);
    }

    let header_json = serde_json::to_vec(&header).map_err(EncodeError::from)?;
    let payload_json = serde_json::to_vec(&payload).map_err(EncodeError::from)?;

    let mut token = base64_url_encode(&header_json);
    token.push('.');
    token.push_str(&base64_url_encode(&payload_json));

    let signature = algorithms::sign(alg, &signing_key, token.as_bytes())?;
    token.push('.');
    token.push_str(&base64_url_encode(&signature));

    tracing::debug!(alg = %alg, claims = payload.len(), "JWT encoded");
    Ok(token)
}

fn decode_with(alg: Algorithm, keys: &KeyMaterial, token: &str) -> JwtResult<ClaimSet> {
    let parsed = UnverifiedToken::parse(token)?;
    let verification_key = keys::verification_key(alg, keys).map_err(DecodeError::from)?;

    if parsed.header.alg != alg.name() {
        tracing::warn!(
            expected = %alg,
            found = %parsed.header.alg,
            "JWT header algorithm does not match configured algorithm"
        );
        return Err(JwtError::InvalidSignature);
    }

    if !algorithms::verify(
        alg,
        &verification_key,
        parsed.signing_input.as_bytes(),
        &parsed.signature,
    ) {
        tracing::warn!(alg = %alg, "JWT signature verification failed");
        return Err(JwtError::InvalidSignature);
    }

    let claims = ClaimSet::build(&parsed.into_verified_claims()).map_err(DecodeError::from)?;
    tracing::debug!(alg = %alg, claims = claims.len(), "JWT decoded");
    Ok(claims)
}
