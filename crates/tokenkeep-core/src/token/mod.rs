//! Credential classification and token facts.
//!
//! This module provides:
//! - `Token`: a credential, either a structured `Jwt` or an opaque `ApiKey`
//! - `Token::classify`: decides which variant a raw string is
//! - `TokenType`, `TwoFactorStatus`: the tags callers branch on
//!
//! Time-dependent queries have an `_at(now)` form; the plain form uses the
//! wall clock.

pub mod api_key;
pub mod jwt;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{format_age, format_expiry};

pub use api_key::ApiKey;
pub use jwt::{Claims, Jwt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum TokenType {
    Jwt,
    ApiKey,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Jwt => write!(f, "jwt"),
            TokenType::ApiKey => write!(f, "api_key"),
        }
    }
}

/// Whether an extra authentication step is outstanding for a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum TwoFactorStatus {
    NotRequired,
    Pending,
    Passed,
}

impl fmt::Display for TwoFactorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwoFactorStatus::NotRequired => write!(f, "not_required"),
            TwoFactorStatus::Pending => write!(f, "pending"),
            TwoFactorStatus::Passed => write!(f, "passed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Jwt(Jwt),
    ApiKey(ApiKey),
}

impl Token {
    /// Build the variant `raw` looks like. Anything that does not decode as
    /// a JWT is an API key, including the empty string.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if Jwt::is_jwt(&raw) {
            Token::Jwt(Jwt::new(raw))
        } else {
            Token::ApiKey(ApiKey::new(raw))
        }
    }

    pub fn token_type(&self) -> TokenType {
        match self {
            Token::Jwt(_) => TokenType::Jwt,
            Token::ApiKey(_) => TokenType::ApiKey,
        }
    }

    /// The original string, exactly as supplied
    pub fn key(&self) -> &str {
        match self {
            Token::Jwt(jwt) => jwt.key(),
            Token::ApiKey(api_key) => api_key.key(),
        }
    }

    /// Decoded claims; API keys have none
    pub fn claims(&self) -> Option<Claims> {
        match self {
            Token::Jwt(jwt) => jwt.claims(),
            Token::ApiKey(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Token::Jwt(jwt) => jwt.is_valid(),
            Token::ApiKey(api_key) => api_key.is_valid(),
        }
    }

    /// Time since issue. `None` means the token carries no `iat` claim,
    /// which is not the same as an age of zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Token::Jwt(jwt) => jwt.age_at(now),
            Token::ApiKey(_) => Some(Duration::zero()),
        }
    }

    pub fn age(&self) -> Option<Duration> {
        self.age_at(Utc::now())
    }

    pub fn age_display_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.age_at(now).map(format_age)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Token::Jwt(jwt) => jwt.is_expired_at(now),
            Token::ApiKey(_) => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn expires_in_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            Token::Jwt(jwt) => jwt.expires_in_at(now),
            Token::ApiKey(_) => None,
        }
    }

    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in_at(Utc::now())
    }

    /// "expires in 5m" / "expired 2h ago"; `None` when there is no `exp`
    pub fn expiry_display_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.expires_in_at(now).map(format_expiry)
    }

    pub fn two_factor_status(&self) -> TwoFactorStatus {
        match self {
            Token::Jwt(jwt) => jwt.two_factor_status(),
            Token::ApiKey(api_key) => api_key.two_factor_status(),
        }
    }

    pub fn needs_two_factor(&self) -> bool {
        self.two_factor_status() == TwoFactorStatus::Pending
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Token::classify(raw)
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Token::classify(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::jwt::tests::mint;
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_classify_opaque_strings() {
        for raw in ["", "abc123", "ashjda/asdashsg/adaasddas", "a.b", "a.b.c", "x.y.z.w"] {
            let token = Token::classify(raw);
            assert_eq!(token.token_type(), TokenType::ApiKey, "{:?}", raw);
            assert_eq!(token.is_valid(), !raw.is_empty());
            assert_eq!(token.key(), raw);
        }
    }

    #[test]
    fn test_classify_jwt() {
        let raw = mint(&json!({"iat": 1_000, "exp": 2_000, "twoFactorRequired": false}));
        let token = Token::from(raw.as_str());
        assert_eq!(token.token_type(), TokenType::Jwt);
        assert!(token.is_valid());
        assert_eq!(token.key(), raw);
        assert_eq!(token.age_at(at(1_010)), Some(Duration::seconds(10)));
        assert!(!token.is_expired_at(at(2_000)));
        assert!(token.is_expired_at(at(2_001)));
        assert_eq!(token.two_factor_status(), TwoFactorStatus::Passed);
        assert!(!token.needs_two_factor());
        assert_eq!(token.age_display_at(at(1_300)).as_deref(), Some("5m ago"));
        assert_eq!(token.expiry_display_at(at(1_700)).as_deref(), Some("expires in 5m"));
        assert_eq!(token.expiry_display_at(at(9_200)).as_deref(), Some("expired 2h ago"));
        assert_eq!(
            token.claims(),
            Some(Claims { iat: Some(1_000), exp: Some(2_000), two_factor_required: Some(false) })
        );
    }

    #[test]
    fn test_api_key_facts() {
        let token = Token::from("my-api-key".to_string());
        assert_eq!(token.age_at(at(5)), Some(Duration::zero()));
        assert!(!token.is_expired_at(at(i32::MAX as i64)));
        assert_eq!(token.expires_in_at(at(0)), None);
        assert_eq!(token.two_factor_status(), TwoFactorStatus::NotRequired);
        assert!(!token.needs_two_factor());
        assert_eq!(token.claims(), None);
        assert_eq!(token.age_display_at(at(5)).as_deref(), Some("just now"));
        assert_eq!(token.expiry_display_at(at(5)), None);
    }

    #[test]
    fn test_pending_two_factor_against_wall_clock() {
        let now = Utc::now().timestamp();
        let token = Token::classify(mint(&json!({
            "iat": now,
            "exp": now + 100,
            "twoFactorRequired": true,
        })));
        assert_eq!(token.two_factor_status(), TwoFactorStatus::Pending);
        assert!(token.needs_two_factor());
        assert!(!token.is_expired());
        assert!(token.age().is_some_and(|age| age >= Duration::zero()));
        assert!(token.expires_in().is_some_and(|left| left > Duration::zero()));
    }

    #[test]
    fn test_same_string_same_answers() {
        let raw = mint(&json!({"iat": 50}));
        let a = Token::classify(raw.clone());
        let b = Token::classify(raw);
        assert_eq!(a, b);
        assert_eq!(a.age_at(at(60)), b.age_at(at(60)));
    }

    #[test]
    fn test_tags_render_as_snake_case() {
        assert_eq!(TwoFactorStatus::NotRequired.to_string(), "not_required");
        assert_eq!(TokenType::ApiKey.to_string(), "api_key");
        assert_eq!(serde_json::to_string(&TwoFactorStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&TokenType::Jwt).unwrap(), "\"jwt\"");
    }
}
