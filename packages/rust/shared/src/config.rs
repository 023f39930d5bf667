//! Application configuration for pagesmith.
//!
//! User config lives at `~/.pagesmith/pagesmith.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PagesmithError, Result};
use crate::types::BackendConfig;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagesmith.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagesmith";

// ---------------------------------------------------------------------------
// Config structs (matching pagesmith.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which backend to talk to.
    #[serde(default)]
    pub backend: BackendSection,

    /// Build defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Retry policy for backend fetches.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// `[backend]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    /// Backend kind: "strapi" or "directus".
    #[serde(default = "default_backend_kind")]
    pub kind: String,

    /// API root of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request unpublished drafts via the `preview=true` convention.
    #[serde(default)]
    pub preview: bool,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: default_backend_kind(),
            base_url: default_base_url(),
            preview: false,
        }
    }
}

fn default_backend_kind() -> String {
    "strapi".into()
}
fn default_base_url() -> String {
    "http://localhost:1337".into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default site output directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_output_dir() -> String {
    "site".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[retry]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retry attempts after the initial request.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff delay ceiling in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_initial_delay_ms() -> u64 {
    500
}
fn default_max_delay_ms() -> u64 {
    5000
}

// ---------------------------------------------------------------------------
// Fetch config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime fetch configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum retry attempts after the initial request.
    pub max_attempts: u32,
    /// Initial backoff delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Backoff delay ceiling in milliseconds.
    pub max_delay_ms: u64,
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.defaults.timeout_secs,
            max_attempts: config.retry.max_attempts,
            initial_delay_ms: config.retry.initial_delay_ms,
            max_delay_ms: config.retry.max_delay_ms,
        }
    }
}

/// Resolve the `[backend]` section into a runtime [`BackendConfig`].
pub fn backend_config(config: &AppConfig) -> Result<BackendConfig> {
    let base_url = Url::parse(&config.backend.base_url).map_err(|e| {
        PagesmithError::config(format!(
            "invalid backend base_url '{}': {e}",
            config.backend.base_url
        ))
    })?;

    Ok(BackendConfig {
        kind: config.backend.kind.clone(),
        base_url,
        preview: config.backend.preview,
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagesmith/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagesmithError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagesmith/pagesmith.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagesmithError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PagesmithError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PagesmithError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PagesmithError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagesmithError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
