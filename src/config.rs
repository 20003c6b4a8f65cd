use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub colors: ColorsConfig,
    pub font: FontConfig,
    pub spacing: SpacingConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Text colour for coach messages
    pub text: String,
    /// Text colour for the user's own messages
    pub user_text: String,
    /// Background behind the user's own messages
    pub user_bubble: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            text: "#333333".to_string(),
            user_text: "#ffffff".to_string(),
            user_bubble: "#6200EA".to_string(),
        }
    }
}

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub paragraph: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            h1: 20.0,
            h2: 18.0,
            h3: 16.0,
            paragraph: 16.0,
        }
    }
}

impl FontConfig {
    pub fn size_for_heading(&self, level: u8) -> f64 {
        match level {
            1 => self.h1,
            2 => self.h2,
            _ => self.h3,
        }
    }
}

/// Vertical spacing in points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    pub spacer: f64,
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub item: f64,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            spacer: 8.0,
            h1: 8.0,
            h2: 6.0,
            h3: 4.0,
            item: 4.0,
        }
    }
}

impl SpacingConfig {
    /// Space kept above and below a heading of the given level.
    pub fn margin_for_heading(&self, level: u8) -> f64 {
        match level {
            1 => self.h1,
            2 => self.h2,
            _ => self.h3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub bullet: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            bullet: "•".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the crate. `build.rs` rejects a bundled
    /// file that would fail to load, so the fallback only guards against
    /// edits that bypass the build script.
    pub fn compiled_default() -> Self {
        Self::from_toml(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Sections or keys left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("colors.text", &self.colors.text),
            ("colors.user_text", &self.colors.user_text),
            ("colors.user_bubble", &self.colors.user_bubble),
        ] {
            if !is_hex_color(value) {
                return Err(Error::Config(format!(
                    "{} must be a #rgb or #rrggbb colour, got {:?}",
                    key, value
                )));
            }
        }

        if self.list.bullet.trim().is_empty() {
            return Err(Error::Config("list.bullet must not be empty".to_string()));
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
