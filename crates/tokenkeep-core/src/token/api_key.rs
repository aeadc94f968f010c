use super::TwoFactorStatus;

/// An opaque API key. It carries no claims, so it never ages or expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    key: String,
}

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_valid(&self) -> bool {
        !self.key.is_empty()
    }

    pub fn two_factor_status(&self) -> TwoFactorStatus {
        TwoFactorStatus::NotRequired
    }
}
