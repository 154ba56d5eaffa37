//! Configuration loading for tabmonitord.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `./tabmonitor.toml` (working directory)
//! 3. `~/.tabmonitor/config.toml` (user)
//! 4. `/etc/tabmonitor/config.toml` (system)
//!
//! When no file is found the built-in defaults apply, so a bare
//! `tabmonitord` runs with no setup.
//!
//! Secrets are resolved separately, in order:
//! 1. `~/.tabmonitor/secrets.toml` (user, must be 0600)
//! 2. `/etc/tabmonitor/secrets.toml` (system, must be 0600)
//! 3. `GROQ_API_KEY` from the environment, which may be populated from a
//!    `.env` file by [`load_env_file`].

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::analyzer::{AnalyzerConfig, DEFAULT_URL_MODEL, DEFAULT_VISION_MODEL};
use crate::cache::DEFAULT_CACHE_FILE;
use crate::fallback::DomainRule;
use crate::providers::groq::DEFAULT_BASE_URL;
use crate::{RelayError, Result};

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub screenshot: ScreenshotConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:5000".to_string()
}

/// URL analysis cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cache file (default: `url_analysis_cache.json` in the working directory).
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Whether to read and write the cache file (default: true).
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            persist: true,
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

fn default_true() -> bool {
    true
}

/// Chat provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible API base URL (default: Groq).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model for URL analysis.
    #[serde(default = "default_model")]
    pub model: String,
    /// Vision model for screenshots.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// Sampling temperature (default: 0.7).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token limit (default: 1000).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// HTTP timeout in seconds (default: 60).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Nucleus sampling cutoff (default: provider's own).
    #[serde(default)]
    pub top_p: Option<f32>,
    /// Stop sequences (default: none).
    #[serde(default)]
    pub stop: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            vision_model: default_vision_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            top_p: None,
            stop: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_URL_MODEL.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1000
}

fn default_timeout() -> u64 {
    60
}

/// Screenshot endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotConfig {
    /// Delay before the fixed description is returned (default: 3000 ms).
    #[serde(default = "default_fallback_delay_ms")]
    pub fallback_delay_ms: u64,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: default_fallback_delay_ms(),
        }
    }
}

fn default_fallback_delay_ms() -> u64 {
    3000
}

/// Extra fallback rules, evaluated before the built-in table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub rules: Vec<DomainRule>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path that does not exist is an error; otherwise a
    /// missing file means defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            debug!("no config file found, using defaults");
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            RelayError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            RelayError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Resolve the config file path, if any.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(RelayError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        let local_config = PathBuf::from("tabmonitor.toml");
        if local_config.exists() {
            return Ok(Some(local_config));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".tabmonitor").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/tabmonitor/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Analyzer tunables derived from this configuration.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            url_model: self.provider.model.clone(),
            vision_model: self.provider.vision_model.clone(),
            temperature: self.provider.temperature,
            max_tokens: self.provider.max_tokens,
            top_p: self.provider.top_p,
            stop: self.provider.stop.clone(),
            screenshot_fallback_delay: Duration::from_millis(self.screenshot.fallback_delay_ms),
        }
    }
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub groq: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment instead).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".tabmonitor").join("secrets.toml");
            if user_secrets.exists() {
                Self::check_permissions(&user_secrets)?;
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/tabmonitor/secrets.toml");
        if system_secrets.exists() {
            Self::check_permissions(&system_secrets)?;
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RelayError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            RelayError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            RelayError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(RelayError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Groq API key, falling back to `GROQ_API_KEY`.
    ///
    /// Blank values count as absent.
    pub fn groq_api_key(&self) -> Option<String> {
        self.groq
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| std::env::var(GROQ_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Load environment variables from a `.env` file.
///
/// With no explicit path, looks for `.env` in the working directory and its
/// parents; a missing file is not an error. Variables already set in the
/// environment are not overridden.
pub fn load_env_file(explicit_path: Option<&Path>) -> Result<()> {
    match explicit_path {
        Some(path) => {
            dotenv::from_path(path).map_err(|e| {
                RelayError::Configuration(format!("Failed to load env file {path:?}: {e}"))
            })?;
            info!(path = %path.display(), "loaded environment file");
        }
        None => match dotenv::dotenv() {
            Ok(path) => info!(path = %path.display(), "loaded environment file"),
            Err(e) if e.not_found() => debug!("no .env file found"),
            Err(e) => warn!(error = %e, "failed to load .env file"),
        },
    }
    Ok(())
}

/// Mask an API key for logging: first and last four characters only.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail} (length: {})", chars.len())
}
