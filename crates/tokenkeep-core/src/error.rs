use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token has expired: {0}")]
    ExpiredToken(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Could not find a data directory")]
    NoDataDirectory,
}

/// Maximum length of a credential echoed back in an error message
const MAX_ERROR_KEY_LENGTH: usize = 64;

impl AuthError {
    /// Truncate a credential to avoid dumping whole tokens into logs
    fn truncate_key(key: &str) -> String {
        if key.chars().count() <= MAX_ERROR_KEY_LENGTH {
            key.to_string()
        } else {
            let head: String = key.chars().take(MAX_ERROR_KEY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, key.len())
        }
    }

    pub fn malformed(key: &str) -> Self {
        AuthError::MalformedToken(Self::truncate_key(key))
    }

    pub fn expired(key: &str) -> Self {
        AuthError::ExpiredToken(Self::truncate_key(key))
    }

    /// Build a malformed-token error for whatever storage returned in place
    /// of a credential string
    pub fn malformed_stored(value: Option<&serde_json::Value>) -> Self {
        match value {
            None => AuthError::MalformedToken("undefined".to_string()),
            Some(value) => AuthError::MalformedToken(Self::truncate_key(&value.to_string())),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AuthError::MalformedToken(_))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::ExpiredToken(_))
    }
}

pub type Result<T, E = AuthError> = std::result::Result<T, E>;
