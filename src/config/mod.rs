//! Application Configuration
//!
//! User settings and preferences stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recognition service settings
    pub recognition: RecognitionSettings,
    /// Canvas settings
    pub canvas: CanvasSettings,
    /// Brush settings
    pub brush: BrushSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recognition: RecognitionSettings::default(),
            canvas: CanvasSettings::default(),
            brush: BrushSettings::default(),
        }
    }
}

/// Recognition service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// Base URL of the classification service, or None if not configured
    pub endpoint: Option<String>,
    /// Automatic recognition period in milliseconds
    pub interval_ms: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            interval_ms: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// Canvas settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Logical canvas width in pixels
    pub width: u32,
    /// Logical canvas height in pixels
    pub height: u32,
    /// Backing-store multiplier; the raster is allocated at this scale
    pub pixel_scale: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            pixel_scale: 2,
        }
    }
}

/// Brush settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Stroke width in logical pixels
    pub size: u32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self { size: 5 }
    }
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

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "doodlepad", "DoodlePad")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check recognition defaults
        assert!(config.recognition.endpoint.is_none());
        assert_eq!(config.recognition.interval_ms, 5000);
        assert_eq!(config.recognition.request_timeout_secs, 30);

        // Check canvas defaults
        assert_eq!(config.canvas.width, 512);
        assert_eq!(config.canvas.height, 512);
        assert_eq!(config.canvas.pixel_scale, 2);

        // Check brush defaults
        assert_eq!(config.brush.size, 5);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        // Serialize to TOML
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Deserialize back
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Verify values match
        assert_eq!(config.recognition.endpoint, parsed.recognition.endpoint);
        assert_eq!(config.recognition.interval_ms, parsed.recognition.interval_ms);
        assert_eq!(config.canvas.width, parsed.canvas.width);
        assert_eq!(config.brush.size, parsed.brush.size);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.recognition.endpoint = Some("http://127.0.0.1:8000".to_string());
        config.recognition.interval_ms = 2500;
        config.brush.size = 12;

        // Serialize and deserialize
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            parsed.recognition.endpoint,
            Some("http://127.0.0.1:8000".to_string())
        );
        assert_eq!(parsed.recognition.interval_ms, 2500);
        assert_eq!(parsed.brush.size, 12);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.recognition.endpoint = Some("http://localhost:9000".to_string());

        // Create a temporary file
        let temp_file = NamedTempFile::new().unwrap();

        // Save config
        save_config(&config, temp_file.path()).unwrap();

        // Load config
        let loaded = load_config(temp_file.path()).unwrap();

        // Verify
        assert_eq!(config.recognition.endpoint, loaded.recognition.endpoint);
        assert_eq!(config.canvas.pixel_scale, loaded.canvas.pixel_scale);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_endpoint_roundtrips_as_none() {
        let toml_str = "[recognition]\ninterval_ms = 5000\nrequest_timeout_secs = 30\n\n[canvas]\nwidth = 512\nheight = 512\npixel_scale = 2\n\n[brush]\nsize = 5\n";
        let parsed: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(parsed.recognition.endpoint.is_none());
    }
}
