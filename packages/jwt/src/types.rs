//! JWT type definitions

use crate::algorithms::utils::base64_url_decode;
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `typ` value written into every header
pub const TOKEN_TYPE: &str = "JWT";

/// JOSE header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm identifier
    pub alg: String,
    /// Token type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Any other header members, including mirrored claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header with `alg` and `typ: "JWT"` only
    #[must_use]
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
            extra: Map::new(),
        }
    }

    /// Copy claims into the header, skipping the reserved `alg` and `typ`
    #[must_use]
    pub fn with_mirrored_claims(mut self, claims: &Map<String, Value>) -> Self {
        for (name, value) in claims {
            if name != "alg" && name != "typ" {
                self.extra.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

/// A token split into its parts, signature not yet checked
///
/// `signing_input` borrows the exact `header.payload` span of the original
/// string so verification never runs over a re-serialized copy.
pub(crate) struct UnverifiedToken<'a> {
    pub(crate) header: Header,
    pub(crate) signing_input: &'a str,
    pub(crate) signature: Vec<u8>,
    claims: Map<String, Value>,
}

impl<'a> UnverifiedToken<'a> {
    /// Structural parse: three segments, base64url, JSON objects
    pub(crate) fn parse(token: &'a str) -> Result<Self, DecodeError> {
        let (signing_input, signature_b64) = token
            .rsplit_once('.')
            .ok_or(DecodeError::Malformed("expected three dot-separated segments"))?;
        let (header_b64, payload_b64) = signing_input
            .split_once('.')
            .ok_or(DecodeError::Malformed("expected three dot-separated segments"))?;
        if payload_b64.contains('.') {
            return Err(DecodeError::Malformed("expected three dot-separated segments"));
        }
        if header_b64.is_empty() || payload_b64.is_empty() {
            return Err(DecodeError::Malformed("empty header or payload segment"));
        }

        let header = Self::header_from_segment(header_b64)?;

        let payload_bytes = base64_url_decode(payload_b64)
            .map_err(|_| DecodeError::Malformed("payload is not base64url"))?;
        let claims = match serde_json::from_slice::<Value>(&payload_bytes) {
            Ok(Value::Object(claims)) => claims,
            Ok(_) => return Err(DecodeError::Malformed("payload is not a JSON object")),
            Err(_) => return Err(DecodeError::Malformed("payload is not valid JSON")),
        };

        let signature = base64_url_decode(signature_b64)
            .map_err(|_| DecodeError::Malformed("signature is not base64url"))?;

        Ok(Self {
            header,
            signing_input,
            signature,
            claims,
        })
    }

    /// Decode only the header segment of a token
    pub(crate) fn parse_header(token: &str) -> Result<Header, DecodeError> {
        let mut segments = token.split('.');
        let header_b64 = segments.next().unwrap_or_default();
        if segments.count() != 2 || header_b64.is_empty() {
            return Err(DecodeError::Malformed("expected three dot-separated segments"));
        }
        Self::header_from_segment(header_b64)
    }

    fn header_from_segment(header_b64: &str) -> Result<Header, DecodeError> {
        let header_bytes = base64_url_decode(header_b64)
            .map_err(|_| DecodeError::Malformed("header is not base64url"))?;
        serde_json::from_slice(&header_bytes)
            .map_err(|_| DecodeError::Malformed("header is not a JSON object with an `alg` string"))
    }

    /// Hand over the claims; callers do this only after verification
    pub(crate) fn into_verified_claims(self) -> Map<String, Value> {
        self.claims
    }
}
