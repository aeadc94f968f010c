//! tokenkeep core library.
//!
//! Keeps a single locally persisted credential, either a JWT or an opaque
//! API key, and answers questions about it: type, age, expiry and
//! two-factor status. JWT signatures are never verified; a token is "valid"
//! when it is well-formed.
//!
//! ```no_run
//! use tokenkeep_core::{Auth, AuthOptions, TwoFactorStatus};
//!
//! # async fn run() -> tokenkeep_core::Result<()> {
//! let mut auth = Auth::new(AuthOptions::default())?;
//! auth.set_key("my-api-key").await?;
//! assert_eq!(auth.get_2fa_status().await?, TwoFactorStatus::NotRequired);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod token;
pub mod utils;

pub use auth::Auth;
pub use config::{AuthConfig, AuthOptions, DataDirectory, DEFAULT_TOKEN_KEY};
pub use error::{AuthError, Result, StorageError};
pub use storage::{
    get_storage, FileStorage, KeyringStorage, MemoryStorage, SettingsStorage, StorageBackend,
};
pub use token::{ApiKey, Claims, Jwt, Token, TokenType, TwoFactorStatus};
