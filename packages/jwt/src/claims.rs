//! Registered and custom claims
//!
//! [`ClaimSet::build`] is the only way in: it takes a plain JSON object,
//! checks the shape of the seven registered claims and normalises them
//! (timestamps to integer Unix seconds, scalar identifiers to strings).
//! Fractional NumericDate values, which RFC 7519 allows, are truncated
//! toward zero.
//! Everything else is carried verbatim as a custom claim.

use crate::error::ClaimError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Audience claim name
pub const AUDIENCE: &str = "aud";
/// Issuer claim name
pub const ISSUER: &str = "iss";
/// Subject claim name
pub const SUBJECT: &str = "sub";
/// JWT ID claim name
pub const JWT_ID: &str = "jti";
/// Issued-at claim name
pub const ISSUED_AT: &str = "iat";
/// Not-before claim name
pub const NOT_BEFORE: &str = "nbf";
/// Expiration claim name
pub const EXPIRATION: &str = "exp";

/// Registered claim names, in the order they are written to the payload
pub const REGISTERED_CLAIMS: [&str; 7] = [
    AUDIENCE, ISSUER, SUBJECT, JWT_ID, ISSUED_AT, NOT_BEFORE, EXPIRATION,
];

/// Whether `name` is one of the seven registered claims
#[inline]
#[must_use]
pub fn is_registered(name: &str) -> bool {
    REGISTERED_CLAIMS.contains(&name)
}

/// The `aud` claim, which keeps the shape it was given
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// `"aud": "api"`
    Single(String),
    /// `"aud": ["api", "web"]`
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is one of the recipients
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(value) => value == audience,
            Audience::Many(values) => values.iter().any(|value| value == audience),
        }
    }

    /// Recipients as a slice-like iterator
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Audience::Single(value) => std::slice::from_ref(value),
            Audience::Many(values) => values,
        };
        values.iter().map(String::as_str)
    }

    fn to_value(&self) -> Value {
        match self {
            Audience::Single(value) => Value::String(value.clone()),
            Audience::Many(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// The seven registered claims, each optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredClaims {
    /// `aud`
    pub audience: Option<Audience>,
    /// `iss`
    pub issuer: Option<String>,
    /// `sub`
    pub subject: Option<String>,
    /// `jti`
    pub jwt_id: Option<String>,
    /// `iat`, Unix seconds
    pub issued_at: Option<i64>,
    /// `nbf`, Unix seconds
    pub not_before: Option<i64>,
    /// `exp`, Unix seconds
    pub expiration: Option<i64>,
}

/// Immutable, validated claim set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    registered: RegisteredClaims,
    custom: Map<String, Value>,
}

impl ClaimSet {
    /// Validate and normalise a claim mapping
    ///
    /// # Errors
    /// [`ClaimError::InvalidClaim`] naming the first registered claim whose
    /// value has the wrong shape.
    pub fn build(input: &Map<String, Value>) -> Result<Self, ClaimError> {
        let mut registered = RegisteredClaims::default();
        let mut custom = Map::new();

        for (name, value) in input {
            match name.as_str() {
                AUDIENCE => registered.audience = Some(audience(value)?),
                ISSUER => registered.issuer = Some(string_or_number(ISSUER, value)?),
                SUBJECT => registered.subject = Some(string_or_number(SUBJECT, value)?),
                JWT_ID => registered.jwt_id = Some(string_or_number(JWT_ID, value)?),
                ISSUED_AT => registered.issued_at = Some(timestamp(ISSUED_AT, value)?),
                NOT_BEFORE => registered.not_before = Some(timestamp(NOT_BEFORE, value)?),
                EXPIRATION => registered.expiration = Some(timestamp(EXPIRATION, value)?),
                _ => {
                    custom.insert(name.clone(), value.clone());
                }
            }
        }

        Ok(Self { registered, custom })
    }

    /// Build from any value that serializes to a JSON object
    ///
    /// # Errors
    /// [`ClaimError::NotAnObject`] when `claims` is not a map or struct,
    /// otherwise as [`ClaimSet::build`].
    pub fn from_serialize<T: serde::Serialize + ?Sized>(claims: &T) -> Result<Self, ClaimError> {
        match serde_json::to_value(claims) {
            Ok(Value::Object(map)) => Self::build(&map),
            _ => Err(ClaimError::NotAnObject),
        }
    }

    /// Flatten back into a plain mapping
    ///
    /// The audience comes first, then the other registered claims, then
    /// custom claims in their original order.
    #[must_use]
    pub fn extract(&self) -> Map<String, Value> {
        let registered = &self.registered;
        let mut claims = Map::with_capacity(self.len());

        if let Some(audience) = &registered.audience {
            claims.insert(AUDIENCE.to_string(), audience.to_value());
        }
        let strings = [
            (ISSUER, &registered.issuer),
            (SUBJECT, &registered.subject),
            (JWT_ID, &registered.jwt_id),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                claims.insert(name.to_string(), Value::String(value.clone()));
            }
        }
        let timestamps = [
            (ISSUED_AT, registered.issued_at),
            (NOT_BEFORE, registered.not_before),
            (EXPIRATION, registered.expiration),
        ];
        for (name, value) in timestamps {
            if let Some(value) = value {
                claims.insert(name.to_string(), Value::from(value));
            }
        }
        for (name, value) in &self.custom {
            claims.insert(name.clone(), value.clone());
        }
        claims
    }

    /// Registered claims
    #[must_use]
    pub fn registered(&self) -> &RegisteredClaims {
        &self.registered
    }

    /// Custom claims
    #[must_use]
    pub fn custom(&self) -> &Map<String, Value> {
        &self.custom
    }

    /// Look up any claim by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let r = &self.registered;
        let string = |value: &Option<String>| value.clone().map(Value::String);
        match name {
            AUDIENCE => r.audience.as_ref().map(Audience::to_value),
            ISSUER => string(&r.issuer),
            SUBJECT => string(&r.subject),
            JWT_ID => string(&r.jwt_id),
            ISSUED_AT => r.issued_at.map(Value::from),
            NOT_BEFORE => r.not_before.map(Value::from),
            EXPIRATION => r.expiration.map(Value::from),
            _ => self.custom.get(name).cloned(),
        }
    }

    /// `sub`
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.registered.subject.as_deref()
    }

    /// `iss`
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.registered.issuer.as_deref()
    }

    /// `jti`
    #[must_use]
    pub fn jwt_id(&self) -> Option<&str> {
        self.registered.jwt_id.as_deref()
    }

    /// `aud`
    #[must_use]
    pub fn audience(&self) -> Option<&Audience> {
        self.registered.audience.as_ref()
    }

    /// `exp` as a UTC instant
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.registered.expiration.and_then(to_datetime)
    }

    /// `iat` as a UTC instant
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.registered.issued_at.and_then(to_datetime)
    }

    /// `nbf` as a UTC instant
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.registered.not_before.and_then(to_datetime)
    }

    /// Number of claims, registered and custom
    #[must_use]
    pub fn len(&self) -> usize {
        let r = &self.registered;
        let registered = [
            r.audience.is_some(),
            r.issuer.is_some(),
            r.subject.is_some(),
            r.jwt_id.is_some(),
            r.issued_at.is_some(),
            r.not_before.is_some(),
            r.expiration.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();
        registered + self.custom.len()
    }

    /// True when no claim is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<&Map<String, Value>> for ClaimSet {
    type Error = ClaimError;

    fn try_from(input: &Map<String, Value>) -> Result<Self, Self::Error> {
        Self::build(input)
    }
}

impl From<ClaimSet> for Map<String, Value> {
    fn from(claims: ClaimSet) -> Self {
        claims.extract()
    }
}

fn to_datetime(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Integer seconds, a NumericDate with a fractional part (truncated toward
/// zero), a decimal string or an RFC 3339 date
fn timestamp(name: &str, value: &Value) -> Result<i64, ClaimError> {
    const REASON: &str = "expected a Unix timestamp or an RFC 3339 date";

    match value {
        Value::Number(number) => {
            if let Some(seconds) = number.as_i64() {
                return Ok(seconds);
            }
            match number.as_f64().map(f64::trunc) {
                Some(seconds) if seconds >= i64::MIN as f64 && seconds < i64::MAX as f64 => {
                    Ok(seconds as i64)
                }
                _ => Err(ClaimError::invalid(name, REASON)),
            }
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|date| date.timestamp())
                })
                .ok_or_else(|| ClaimError::invalid(name, REASON))
        }
        _ => Err(ClaimError::invalid(name, REASON)),
    }
}

fn string_or_number(name: &str, value: &Value) -> Result<String, ClaimError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(ClaimError::invalid(name, "expected a string")),
    }
}

fn audience(value: &Value) -> Result<Audience, ClaimError> {
    const REASON: &str = "expected a string or a non-empty list of strings";

    match value {
        Value::String(text) => Ok(Audience::Single(text.clone())),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Audience::Many)
            .ok_or_else(|| ClaimError::invalid(AUDIENCE, REASON)),
        _ => Err(ClaimError::invalid(AUDIENCE, REASON)),
    }
}
