//! Configuration types for OCRA components.
//!
//! Values are layered: built-in defaults, then the optional settings file
//! (`~/.config/ocra/config.toml`), then environment variables and command
//! line flags, which the CLI resolves with clap.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;
use crate::view::UnitSystem;

/// Default Gemini model for recipe generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API root.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default page URL that shareable links are built on.
pub const DEFAULT_BASE_URL: &str = "https://ocra.app/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client configuration for the generative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout. A request still running after this is
    /// abandoned and reported as a timeout.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs.max(1));
        self
    }
}

/// Backend selection for recipe generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Gemini model name.
    pub model: String,
    /// API root, without the `/v1beta` path.
    pub api_base: String,
    pub http: HttpConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            http: HttpConfig::default(),
        }
    }
}

// =============================================================================
// Settings file (config.toml)
// =============================================================================

/// Contents of the optional settings file.
///
/// Every key is optional; anything missing falls back to the environment
/// or the built-in default.
///
/// # Example
///
/// ```toml
/// model = "gemini-2.5-flash"
/// timeout_secs = 45
/// units = "metric"
/// base_url = "https://ocra.app/"
/// data_dir = "/home/me/.ocra"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Unit system new recipes are shown in.
    pub units: Option<UnitSystem>,
    /// Page URL shareable links are built on.
    pub base_url: Option<String>,
    /// Directory holding the saved recipes store.
    pub data_dir: Option<PathBuf>,
}

/// Default settings file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the default configuration directory path.
///
/// Uses XDG Base Directory specification: `~/.config/ocra/`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ocra"))
}

/// Returns the default settings file path.
///
/// Path: `~/.config/ocra/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Template written on first run. Every key is commented out so the file
/// changes nothing until edited.
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# OCRA settings
#
# Environment variables (GEMINI_API_KEY, OCRA_MODEL, OCRA_TIMEOUT_SECS,
# OCRA_BASE_URL, OCRA_DATA_DIR) and command line flags take precedence.

# Gemini model used to write recipes
# model = "gemini-2.5-flash"

# Seconds to wait for a recipe before giving up
# timeout_secs = 30

# Unit system for ingredient quantities: "imperial" or "metric"
# units = "imperial"

# Page URL shareable links point at
# base_url = "https://ocra.app/"

# Where saved recipes are kept
# data_dir = "~/.local/share/ocra"
"#;

/// Load settings from a TOML file.
///
/// # Arguments
/// * `path` - Optional custom path. If `None`, uses default XDG path.
///
/// # Returns
/// * `Ok(Some(settings))` - Settings loaded successfully
/// * `Ok(None)` - No settings file and none could be created
/// * `Err(e)` - The file exists but is invalid, or a custom path is missing
///
/// # Behavior
/// If no file exists at the default path, a commented template is created
/// and read back.
pub fn load_settings(path: Option<PathBuf>) -> Result<Option<Settings>, AppError> {
    let using_default_path = path.is_none();
    let config_path = match path {
        Some(p) => p,
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        if using_default_path {
            if let Err(e) = create_default_config(&config_path) {
                // Read-only home directories are fine; run on defaults.
                tracing::warn!("Could not create default settings template: {}", e);
                return Ok(None);
            }
        } else {
            return Err(AppError::ConfigError(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let settings: Settings = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %config_path.display(), "Loaded settings");
    Ok(Some(settings))
}

/// Create a default settings file with a template.
///
/// Creates the parent directory if it doesn't exist.
fn create_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    tracing::info!("Created default settings template at: {}", path.display());

    Ok(())
}
