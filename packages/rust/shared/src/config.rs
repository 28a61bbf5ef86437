//! Application configuration for xport.
//!
//! User config lives at `~/.xport/xport.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, XportError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "xport.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".xport";

// ---------------------------------------------------------------------------
// Config structs (matching xport.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// How the corpus file is written.
    #[serde(default)]
    pub output: OutputConfig,

    /// How new records are combined with the existing corpus.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the corpus JSON.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Write through a sibling temp file and rename over the target.
    #[serde(default = "default_true")]
    pub atomic: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[merge]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Ignore any existing corpus and write only the new batch.
    #[serde(default)]
    pub fresh: bool,
}

// ---------------------------------------------------------------------------
// Export config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime export settings, merged from config file + CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    pub pretty: bool,
    pub atomic: bool,
    pub fresh: bool,
}

impl From<&AppConfig> for ExportConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            pretty: config.output.pretty,
            atomic: config.output.atomic,
            fresh: config.merge.fresh,
        }
    }
}

impl ExportConfig {
    /// Apply CLI overrides. Flags can only switch behavior on, never off.
    pub fn with_overrides(mut self, fresh: bool, compact: bool) -> Self {
        self.fresh |= fresh;
        if compact {
            self.pretty = false;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.xport/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| XportError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.xport/xport.toml`).
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
    let content = std::fs::read_to_string(path).map_err(|e| XportError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| XportError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_file_path()?)
}

/// Write a default config file at `path`, creating parent directories.
/// An existing file is left untouched.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        tracing::info!(?path, "config file already exists, leaving it as is");
        return Ok(path.to_path_buf());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| XportError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| XportError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| XportError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
