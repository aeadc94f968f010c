//! Credential manager configuration.
//!
//! `AuthOptions` says where the credential lives (`dataDirectory`, or the OS
//! keychain when `keychainService` is set) and under which name
//! (`tokenKey`). It can be built in code or loaded from
//! `~/.config/tokenkeep/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "tokenkeep";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Storage name used for the credential unless configured otherwise
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Where the credential is persisted.
///
/// Serialized the way the settings file writes it: absent or `null` for the
/// platform default, a path string, or `false` for an isolated scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataDirectory {
    /// `dirs::data_dir()/tokenkeep`
    #[default]
    #[serde(with = "default_marker")]
    Default,
    Path(PathBuf),
    /// Process-local storage not shared with any other instance
    #[serde(with = "isolated_marker")]
    Isolated,
}

mod default_marker {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(s: S) -> Result<S::Ok, S::Error> {
        s.serialize_none()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<(), D::Error> {
        match Option::<()>::deserialize(d)? {
            None => Ok(()),
            Some(()) => Err(serde::de::Error::custom("expected null")),
        }
    }
}

mod isolated_marker {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bool(false)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<(), D::Error> {
        if bool::deserialize(d)? {
            Err(serde::de::Error::custom("expected `false` or a path"))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthOptions {
    pub data_directory: DataDirectory,
    pub token_key: String,
    /// Keychain service to store under instead of files. Ignored for
    /// isolated scopes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keychain_service: Option<String>,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            data_directory: DataDirectory::Default,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            keychain_service: None,
        }
    }
}

impl AuthOptions {
    pub fn isolated() -> Self {
        Self {
            data_directory: DataDirectory::Isolated,
            ..Self::default()
        }
    }

    pub fn with_data_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_directory = DataDirectory::Path(path.into());
        self
    }

    pub fn with_token_key(mut self, token_key: impl Into<String>) -> Self {
        self.token_key = token_key.into();
        self
    }

    pub fn with_keychain_service(mut self, service: impl Into<String>) -> Self {
        self.keychain_service = Some(service.into());
        self
    }
}

/// Persisted options file.
pub struct AuthConfig;

impl AuthConfig {
    /// Load options from the default config location, or defaults if absent
    pub fn load() -> Result<AuthOptions> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<AuthOptions> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(AuthOptions::default())
        }
    }

    pub fn save(options: &AuthOptions) -> Result<()> {
        Self::save_to(&Self::config_path()?, options)
    }

    pub fn save_to(path: &Path, options: &AuthOptions) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(options)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Platform data directory for persisted credentials
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}
