//! Configuration file management
//!
//! Loads TOML configuration files for the emoji demo.
//! Default config path: ~/.config/emoji-glyphs/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::font::TextureFilter;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emoji atlas settings
    pub emoji: EmojiConfig,
    /// Font settings
    pub font: FontConfig,
    /// Demo text settings
    pub demo: DemoConfig,
}

/// Emoji atlas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Atlas description file (page images are resolved next to it)
    /// "~/" is expanded to the home directory
    pub atlas: String,
    /// Sampling filter: "linear" (default) or "nearest"
    /// Nearest is often crisper for small emoji
    pub filter: TextureFilter,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            atlas: "assets/emojis25.atlas".to_string(),
            filter: TextureFilter::Linear,
        }
    }
}

/// Font settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Characters present in the generated fonts
    pub characters: String,
    /// Line height of the default font (pixels)
    pub default_size: i32,
    /// Line height of the large generated font (pixels)
    pub generated_size: i32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            characters: concat!(
                "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
                "abcdefghijklmnopqrstuvwxyz1234567890",
                " \"!`?'.,;:()[]{}<>|/@\\^$-%+=#_&~*"
            )
            .to_string(),
            default_size: 20,
            generated_size: 40,
        }
    }
}

/// Demo text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Strings filtered and laid out at startup
    pub samples: Vec<String>,
    /// Font scales the default font is measured at
    pub scales: Vec<f32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            samples: vec![
                "Scaled text 2x\u{1F60E}".to_string(),
                "Scaled text 0.75x\u{1F60E} \u{1F600}\u{1F600}.".to_string(),
                "Generated 40 size\u{1F60E} (\u{1F600}\u{1F602}).\u{1F499}".to_string(),
            ],
            scales: vec![1.0, 2.0, 0.75],
        }
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/emoji-glyphs/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. EMOJI_GLYPHS_CONFIG environment variable
        if let Ok(path) = std::env::var("EMOJI_GLYPHS_CONFIG") {
            let p = std::path::Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/emoji-glyphs/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("emoji-glyphs").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config
        let system_config = std::path::Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. EMOJI_GLYPHS_CONFIG environment variable
    /// 2. ~/.config/emoji-glyphs/config.toml (user config)
    /// 3. /etc/emoji-glyphs/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Atlas path with "~/" expanded
    pub fn atlas_path(&self) -> PathBuf {
        match self.emoji.atlas.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.emoji.atlas)),
            None => PathBuf::from(&self.emoji.atlas),
        }
    }

    /// Write the default config as a template to the user config directory
    pub fn write_default() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        let dir = config_dir.join("emoji-glyphs");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("config.toml");

        let body = toml::to_string_pretty(&Self::default())?;
        let content = format!(
            "# emoji-glyphs configuration\n# Path: ~/.config/emoji-glyphs/config.toml\n\n{}",
            body
        );
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }
}
