//! Client configuration.
//!
//! Settings live in a TOML file:
//!
//! ```toml
//! api_base_url = "https://api.nexmo.com"
//! token = "eyJhbGciOi..."
//! default_from = "447700900000"
//! max_call_duration_seconds = 3600
//! ringing_timeout_seconds = 45
//! ```
//!
//! # Resolution Algorithm
//!
//! [`VoiceConfig::resolve`] looks for the file in this order and stops at the
//! first hit:
//!
//! 1. The path in `VOICE_CALL_CONFIG_PATH`, if it exists
//! 2. `voice-call.toml` in the current directory
//! 3. `voice-call.toml` in each parent directory
//! 4. `voice-call/config.toml` in the user config directory
//!
//! A missing file is not an error. Once loaded, `VOICE_CALL_TOKEN` replaces
//! the `token` from the file.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default base URL of the voice API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.nexmo.com";

/// File name searched for in the current and parent directories.
pub const CONFIG_FILE_NAME: &str = "voice-call.toml";

const CONFIG_PATH_ENV: &str = "VOICE_CALL_CONFIG_PATH";
const TOKEN_ENV: &str = "VOICE_CALL_TOKEN";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error when reading a config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error when a config file is malformed.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file not found.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Settings shared by the client and the command line front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Base URL of the voice API, without the `/v1/calls` path.
    pub api_base_url: String,

    /// Bearer token (an application JWT) sent with every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Caller number used when a call does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_from: Option<String>,

    /// Overrides the request's maximum call duration when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_duration_seconds: Option<u32>,

    /// Overrides the request's ringing timeout when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ringing_timeout_seconds: Option<u32>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: None,
            default_from: None,
            max_call_duration_seconds: None,
            ringing_timeout_seconds: None,
        }
    }
}

impl VoiceConfig {
    /// Loads a config file from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns `Err(ConfigError)` if:
    /// - The file does not exist (returns `NotFound` variant)
    /// - The file exists but cannot be read (returns `Io` variant)
    /// - The file cannot be parsed as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;

        let config: VoiceConfig = toml::from_str(&contents)?;
        info!(path = %path.display(), "loaded voice call config");
        Ok(config)
    }

    /// Loads a config file from an explicit path, then applies the
    /// `VOICE_CALL_TOKEN` override.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with_overrides(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    /// Finds and loads the config file using the resolution algorithm, then
    /// applies the `VOICE_CALL_TOKEN` override.
    ///
    /// # Errors
    ///
    /// Returns `Err(ConfigError)` if:
    /// - The current directory cannot be determined
    /// - A found config file cannot be read
    /// - A found config file cannot be parsed
    pub fn resolve() -> Result<Option<Self>, ConfigError> {
        let current = std::env::current_dir()?;
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

        let mut config = resolve_in(
            &current,
            None,
            env_path.as_deref(),
            xdg_config_path().as_deref(),
        )?;
        if let Some(config) = config.as_mut() {
            config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        }
        Ok(config)
    }

    /// Like [`resolve`](Self::resolve), falling back to defaults (plus the
    /// token override) when no file exists.
    ///
    /// # Errors
    ///
    /// Same as [`resolve`](Self::resolve).
    pub fn resolve_or_default() -> Result<Self, ConfigError> {
        if let Some(config) = Self::resolve()? {
            return Ok(config);
        }
        debug!("no voice call config found, using defaults");
        let mut config = Self::default();
        config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        Ok(config)
    }

    /// Replaces the token when `token` is set and not blank.
    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
    }
}

// ===== Resolution helpers =====

/// `root`, when set, is the last directory searched on the way up.
fn resolve_in(
    start: &Path,
    root: Option<&Path>,
    env_path: Option<&Path>,
    xdg_path: Option<&Path>,
) -> Result<Option<VoiceConfig>, ConfigError> {
    // Step 1: Environment variable override
    if let Some(path) = env_path
        && path.exists()
    {
        return VoiceConfig::load(path).map(Some);
    }

    // Steps 2 and 3: current directory, then parents
    for dir in start.ancestors() {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            return VoiceConfig::load(&path).map(Some);
        }
        if root == Some(dir) {
            break;
        }
    }

    // Step 4: XDG config directory
    if let Some(path) = xdg_path
        && path.exists()
    {
        return VoiceConfig::load(path).map(Some);
    }

    Ok(None)
}

fn xdg_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("voice-call").join("config.toml"))
}
