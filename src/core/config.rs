//! Configuration types and management for helping-hand-rs.
//!
//! The configuration mirrors the add-on's tool settings: how similar objects
//! are selected, how batch renames are formatted, which collection moves
//! target, and which version is installed for release checks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{HelpingHandError, Result, ResultExt};
use crate::detectors::rename::{RenameOptions, MAX_PADDING, MIN_PADDING};
use crate::detectors::similarity::SelectionMethod;

/// Main configuration for the helping-hand tools
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HelpingHandConfig {
    /// Similar-object selection settings
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Batch rename settings
    #[serde(default)]
    pub rename: RenameConfig,

    /// Collection move settings
    #[serde(default)]
    pub collections: CollectionConfig,

    /// Release check settings
    #[serde(default)]
    pub updates: UpdateConfig,
}

impl HelpingHandConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.rename.validate()?;
        self.collections.validate()?;
        self.updates.validate()?;
        Ok(())
    }
}

/// How "similar" is decided for select-similar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Group by base name or by mesh topology
    pub method: SelectionMethod,

    /// Compare base names with case intact (name method only)
    pub case_sensitive: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            method: SelectionMethod::ByName,
            case_sensitive: false,
        }
    }
}

/// Batch rename format: `<prefix><base_name>_<zero-padded index>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenameConfig {
    /// Text added to the beginning of every name
    pub prefix: String,

    /// Main part of every name
    pub base_name: String,

    /// Number the first object receives
    pub start_index: u32,

    /// Minimum digit count of the numeric suffix (1-4)
    pub padding: usize,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            prefix: "SM_".to_string(),
            base_name: "Object".to_string(),
            start_index: 1,
            padding: 2,
        }
    }
}

impl RenameConfig {
    /// Check the padding range
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PADDING..=MAX_PADDING).contains(&self.padding) {
            return Err(HelpingHandError::validation_field(
                format!(
                    "padding must be between {MIN_PADDING} and {MAX_PADDING}, got {}",
                    self.padding
                ),
                "rename.padding",
                format!("{MIN_PADDING}..={MAX_PADDING}"),
                self.padding.to_string(),
            ));
        }
        Ok(())
    }

    /// Renamer options with padding clamped into the supported range
    pub fn to_options(&self) -> RenameOptions {
        RenameOptions {
            prefix: self.prefix.clone(),
            base_name: self.base_name.clone(),
            start_index: self.start_index,
            padding: self.padding.clamp(MIN_PADDING, MAX_PADDING),
        }
    }
}

/// Collection move settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CollectionConfig {
    /// Collection that move-to-collection links objects into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CollectionConfig {
    /// Reject a blank target name
    pub fn validate(&self) -> Result<()> {
        if matches!(self.target.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(HelpingHandError::config_field(
                "target collection name must not be blank",
                "collections.target",
            ));
        }
        Ok(())
    }
}

/// Release check settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateConfig {
    /// Version currently installed
    pub current_version: String,

    /// Page users are sent to for downloads
    pub releases_url: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            releases_url: "https://github.com/Hitansh-3D/blender-helping-hand/releases".to_string(),
        }
    }
}

impl UpdateConfig {
    /// Check that the installed version parses as a release tag
    pub fn validate(&self) -> Result<()> {
        crate::api::release::ReleaseVersion::parse(&self.current_version).map_err(|e| {
            HelpingHandError::config_field(
                format!("Invalid current version: {e}"),
                "updates.current_version",
            )
        })?;
        Ok(())
    }
}
