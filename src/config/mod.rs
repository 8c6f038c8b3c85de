//! Application Configuration
//!
//! User settings stored in TOML format. The tint threshold and the cipher
//! table are fixed and deliberately absent here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Diagnostic output settings
    pub output: OutputSettings,
    /// Live stream settings
    pub live: LiveSettings,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "albhed_lens=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Diagnostic output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Glyph box outline color (RGBA)
    pub box_color: [u8; 4],
    /// Glyph box outline width in pixels
    pub line_width: u32,
    /// Always export glyph crops next to annotated output
    pub save_crops: bool,
    /// Upscale factor for exported crops
    pub crop_scale: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            box_color: [255, 0, 0, 255],
            line_width: 2,
            save_crops: false,
            crop_scale: 4,
        }
    }
}

/// Live stream settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveSettings {
    /// Frame rate used when replaying recorded frames
    pub max_fps: u32,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self { max_fps: 30 }
    }
}

/// Get the configuration directory
pub fn config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "albhedlens", "AlBhedLens")
        .ok_or(Error::NoConfigDir)?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default configuration file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file
    File(PathBuf),
    /// No file at this path; defaults in use
    Missing(PathBuf),
    /// The file could not be located or read; defaults in use
    Fallback(String),
}

impl ConfigSource {
    /// Report how the configuration was obtained. Call once logging is up.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {:?}", path),
            ConfigSource::Missing(path) => info!("No configuration at {:?}, using defaults", path),
            ConfigSource::Fallback(reason) => warn!("{}, using default configuration", reason),
        }
    }
}

/// Load configuration from `path`, or from the default location when `None`.
/// Falls back to defaults when the file is missing or invalid.
///
/// The configuration decides how logging is set up, so nothing is logged here;
/// the returned [`ConfigSource`] carries the reason for the caller to report.
pub fn load_or_default(path: Option<&Path>) -> (AppConfig, ConfigSource) {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) => path,
            Err(e) => return (AppConfig::default(), ConfigSource::Fallback(e.to_string())),
        },
    };

    if !path.exists() {
        return (AppConfig::default(), ConfigSource::Missing(path));
    }

    match load_config(&path) {
        Ok(config) => (config, ConfigSource::File(path)),
        Err(e) => {
            let reason = format!("Failed to load {:?}: {}", path, e);
            (AppConfig::default(), ConfigSource::Fallback(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.box_color, [255, 0, 0, 255]);
        assert_eq!(config.output.line_width, 2);
        assert!(!config.output.save_crops);
        assert_eq!(config.output.crop_scale, 4);
        assert_eq!(config.live.max_fps, 30);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.logging.level = "debug".to_string();
        config.output.box_color = [0, 255, 0, 128];
        config.live.max_fps = 10;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AppConfig = toml::from_str("[live]\nmax_fps = 5\n").unwrap();
        assert_eq!(parsed.live.max_fps, 5);
        assert_eq!(parsed.logging, LoggingConfig::default());
        assert_eq!(parsed.output, OutputSettings::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\ncrop_scale = \"big\"").unwrap();

        let (config, source) = load_or_default(Some(temp_file.path()));
        assert_eq!(config, AppConfig::default());
        match source {
            ConfigSource::Fallback(reason) => {
                assert!(reason.starts_with("Failed to load"));
                assert!(reason.contains(&format!("{:?}", temp_file.path())));
            }
            other => panic!("expected a fallback, got {:?}", other),
        }

        let missing = Path::new("/nonexistent/config.toml");
        let (config, source) = load_or_default(Some(missing));
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::Missing(missing.to_path_buf()));
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let mut config = AppConfig::default();
        config.live.max_fps = 12;
        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();

        let (loaded, source) = load_or_default(Some(temp_file.path()));
        assert_eq!(loaded, config);
        assert_eq!(source, ConfigSource::File(temp_file.path().to_path_buf()));
    }
}
