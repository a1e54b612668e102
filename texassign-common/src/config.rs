//! Configuration loading and config file resolution
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TEXASSIGN_CONFIG`)
//! 3. Per-user config file (`<config_dir>/texassign/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never fails startup: a warning is logged and the
//! compiled defaults are used. A file that exists but cannot be parsed is an
//! error.

use crate::rules::{ChannelRule, ChannelRuleSpec};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "TEXASSIGN_CONFIG";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Folder scanning configuration (optional)
    #[serde(default)]
    pub scan: ScanConfig,

    /// Per-channel rule overrides, applied to every preset
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelRuleSpec>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Folder scanning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Texture file extensions, without the dot (case-insensitive)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Names containing any of these are skipped
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Preset used when none is given on the command line
    #[serde(default = "default_preset")]
    pub default_preset: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            ignore_patterns: default_ignore_patterns(),
            default_preset: default_preset(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_extensions() -> Vec<String> {
    ["exr", "jpg", "jpeg", "png", "tif", "tiff", "tga", "tx", "hdr"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ignore_patterns() -> Vec<String> {
    [".DS_Store", "Thumbs.db", ".git", ".svn"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_preset() -> String {
    "standard".to_string()
}

impl TomlConfig {
    /// Compile the per-channel overrides
    pub fn channel_overrides(&self) -> Result<Vec<ChannelRule>> {
        self.channels.iter().map(ChannelRuleSpec::compile).collect()
    }
}

/// Resolves which config file to load and loads it
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Config file path by priority, or `None` when only defaults apply
    pub fn config_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Per-user config file
        default_config_path().filter(|p| p.exists())
    }

    /// Load the resolved config, falling back to compiled defaults
    pub fn resolve(&self) -> Result<TomlConfig> {
        let Some(path) = self.config_path() else {
            debug!("No config file found, using compiled defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            warn!(
                "Config file {} not found, using compiled defaults",
                path.display()
            );
            return Ok(TomlConfig::default());
        }

        let config = load_toml_config(&path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Per-user config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("texassign").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    // Surface bad patterns at load time rather than at first scan
    config.channel_overrides()?;
    Ok(config)
}

/// Write config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;
    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    debug!("Wrote configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scan.default_preset, "standard");
        assert!(config.scan.extensions.contains(&"exr".to_string()));
        assert!(config.channels.is_empty());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_partial_scan_section() {
        let config: TomlConfig = toml::from_str(
            r#"
            [scan]
            extensions = ["exr"]
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.extensions, vec!["exr".to_string()]);
        assert_eq!(config.scan.ignore_patterns, default_ignore_patterns());
    }
}
