//! Structured (JWT-shaped) tokens.
//!
//! Nothing here verifies a signature. A "valid" JWT is one whose payload
//! segment decodes to JSON; claims are re-decoded from the raw string on
//! every query.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TwoFactorStatus;

/// Number of `.`-separated segments in a compact JWT
const JWT_SEGMENTS: usize = 3;

/// base64url that accepts the payload with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from the payload segment. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Issued-at, seconds since the epoch
    pub iat: Option<u64>,
    /// Expires-at, seconds since the epoch
    pub exp: Option<u64>,
    /// `None` when the claim is absent or null
    pub two_factor_required: Option<bool>,
}

impl Claims {
    /// Pull the known claims out of an arbitrary JSON payload.
    /// Non-object payloads carry no claims.
    fn from_payload(payload: &Value) -> Self {
        Self {
            iat: payload.get("iat").and_then(seconds_claim),
            exp: payload.get("exp").and_then(seconds_claim),
            two_factor_required: payload
                .get("twoFactorRequired")
                .filter(|v| !v.is_null())
                .map(is_truthy),
        }
    }
}

fn seconds_claim(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Convert claim seconds to epoch milliseconds without overflowing.
fn seconds_to_millis(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX).saturating_mul(1000)
}

fn millis_delta(ms: i64) -> Duration {
    Duration::milliseconds(ms.max(-i64::MAX))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jwt {
    key: String,
}

impl Jwt {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Decode the claims of `key`, or `None` if it is not JWT-shaped.
    pub fn parse(key: &str) -> Option<Claims> {
        let segments: Vec<&str> = key.trim().split('.').collect();
        if segments.len() != JWT_SEGMENTS {
            return None;
        }
        let bytes = URL_SAFE_LENIENT.decode(segments[1]).ok()?;
        let payload: Value = serde_json::from_slice(&bytes).ok()?;
        Some(Claims::from_payload(&payload))
    }

    pub fn is_jwt(key: &str) -> bool {
        Self::parse(key).is_some()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn claims(&self) -> Option<Claims> {
        Self::parse(&self.key)
    }

    /// Re-decodes the raw string on every call.
    pub fn is_valid(&self) -> bool {
        Self::is_jwt(&self.key)
    }

    fn claims_or_default(&self) -> Claims {
        self.claims().unwrap_or_default()
    }

    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.claims_or_default()
            .iat
            .map(|iat| millis_delta(now.timestamp_millis().saturating_sub(seconds_to_millis(iat))))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims_or_default()
            .exp
            .is_some_and(|exp| now.timestamp_millis() > seconds_to_millis(exp))
    }

    /// Time left until `exp`; negative once the token has expired
    pub fn expires_in_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.claims_or_default()
            .exp
            .map(|exp| millis_delta(seconds_to_millis(exp).saturating_sub(now.timestamp_millis())))
    }

    pub fn two_factor_status(&self) -> TwoFactorStatus {
        match self.claims_or_default().two_factor_required {
            None => TwoFactorStatus::NotRequired,
            Some(true) => TwoFactorStatus::Pending,
            Some(false) => TwoFactorStatus::Passed,
        }
    }
}
