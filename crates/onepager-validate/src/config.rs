//! Configuration settings
//!
//! Loaded from `onepager.toml`. Every section is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default settings file name
pub const SETTINGS_FILE: &str = "onepager.toml";

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Canonical template document
    pub template: TemplateSettings,
    /// Rule selection
    pub rules: RuleSettings,
    /// Photo scoring parameters
    pub photo: PhotoSettings,
    /// Local-file storage
    pub storage: StorageSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }
}

/// Template settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TemplateSettings {
    pub path: PathBuf,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("templates/onepager_template.pptx"),
        }
    }
}

/// Which optional rules are active
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleSettings {
    /// Check the file-name convention (`WRONG_FILE_NAME`)
    pub file_name: bool,
    /// Check photos; needs a photo scorer
    pub photo: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            file_name: false,
            photo: true,
        }
    }
}

/// Photo scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhotoSettings {
    /// Steepness of the gain transform
    pub gain_k: f64,
    /// Combined scores below this are low quality
    pub low_quality_threshold: f64,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            gain_k: 3.0,
            low_quality_threshold: 0.2,
        }
    }
}

/// Local-file storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}
