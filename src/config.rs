//! Configuration file handling with TOML support.

use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Color scheme
    #[serde(default)]
    pub colors: ColorConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Base URL of the stock lookup backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout() -> u64 {
    10
}

/// Display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Lines the company description may occupy
    #[serde(default = "default_description_lines")]
    pub description_lines: u16,

    /// Width of the description probe, as a percentage of the table width
    #[serde(default = "default_description_width_percent")]
    pub description_width_percent: u16,

    /// Quiet period before re-truncating after a resize, in milliseconds
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            description_lines: default_description_lines(),
            description_width_percent: default_description_width_percent(),
            resize_debounce_ms: default_resize_debounce_ms(),
        }
    }
}

fn default_description_lines() -> u16 {
    5
}
fn default_description_width_percent() -> u16 {
    60
}
fn default_resize_debounce_ms() -> u64 {
    250
}

/// Color configuration using hex codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Color for positive changes
    #[serde(default = "default_positive_color")]
    pub positive: String,

    /// Color for negative changes and the error banner
    #[serde(default = "default_negative_color")]
    pub negative: String,

    /// Title and active tab color
    #[serde(default = "default_header_color")]
    pub header: String,

    /// Border color
    #[serde(default = "default_border_color")]
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            positive: default_positive_color(),
            negative: default_negative_color(),
            header: default_header_color(),
            border: default_border_color(),
        }
    }
}

fn default_positive_color() -> String {
    "#00ff00".to_string()
}
fn default_negative_color() -> String {
    "#ff0000".to_string()
}
fn default_header_color() -> String {
    "#1e90ff".to_string()
}
fn default_border_color() -> String {
    "#444444".to_string()
}

/// Parse a configured color, falling back to `default` on bad input.
pub fn parse_color(value: &str, default: &str) -> Color {
    Color::from_str(value)
        .or_else(|_| Color::from_str(default))
        .unwrap_or(Color::Reset)
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from default location or fall back to defaults.
    pub fn load_or_default() -> Self {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to load config: {:#}", e);
                    }
                }
            }
        }
        Config::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stocklens").join("config.toml"))
    }
}
