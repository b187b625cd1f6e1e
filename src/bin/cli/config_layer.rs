//! Configuration Layer Management
//!
//! Layers the default configuration, an optional configuration file and CLI
//! overrides into the configuration handed to the engine.

use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::cli::args::{MoveArgs, RenameArgs, SelectSimilarArgs};
use helping_hand_rs::core::config::{CollectionConfig, RenameConfig, SelectionConfig};
use helping_hand_rs::HelpingHandConfig;

/// Configuration file picked up from the working directory when none is given
pub const IMPLICIT_CONFIG_FILES: [&str; 2] = [".helping-hand.yml", ".helping-hand.yaml"];

/// Trait for merging configuration layers
pub trait ConfigMerge<T> {
    /// Merge another configuration into this one, with the other taking priority
    fn merge_with(&mut self, other: T);
}

/// Convert CLI arguments to partial configuration overrides
pub trait FromCliArgs<T> {
    /// Create a partial configuration from CLI arguments
    fn from_cli_args(args: &T) -> Self;
}

/// Selection overrides; `None` keeps the lower layer's value
#[derive(Debug, Default)]
pub struct SelectionOverrides {
    pub method: Option<helping_hand_rs::SelectionMethod>,
    pub case_sensitive: Option<bool>,
}

/// Rename overrides; `None` keeps the lower layer's value
#[derive(Debug, Default)]
pub struct RenameOverrides {
    pub prefix: Option<String>,
    pub base_name: Option<String>,
    pub start_index: Option<u32>,
    pub padding: Option<usize>,
}

/// Collection overrides; `None` keeps the lower layer's value
#[derive(Debug, Default)]
pub struct CollectionOverrides {
    pub target: Option<String>,
}

impl FromCliArgs<SelectSimilarArgs> for SelectionOverrides {
    fn from_cli_args(args: &SelectSimilarArgs) -> Self {
        Self {
            method: args.method.map(Into::into),
            case_sensitive: args.case_sensitive.then_some(true),
        }
    }
}

impl FromCliArgs<RenameArgs> for RenameOverrides {
    fn from_cli_args(args: &RenameArgs) -> Self {
        Self {
            prefix: args.prefix.clone(),
            base_name: args.base_name.clone(),
            start_index: args.start,
            padding: args.padding.map(usize::from),
        }
    }
}

impl FromCliArgs<MoveArgs> for CollectionOverrides {
    fn from_cli_args(args: &MoveArgs) -> Self {
        Self {
            target: args.target.clone(),
        }
    }
}

impl ConfigMerge<SelectionOverrides> for SelectionConfig {
    fn merge_with(&mut self, other: SelectionOverrides) {
        if let Some(method) = other.method {
            self.method = method;
        }
        if let Some(case_sensitive) = other.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
    }
}

impl ConfigMerge<RenameOverrides> for RenameConfig {
    fn merge_with(&mut self, other: RenameOverrides) {
        if let Some(prefix) = other.prefix {
            self.prefix = prefix;
        }
        if let Some(base_name) = other.base_name {
            self.base_name = base_name;
        }
        if let Some(start_index) = other.start_index {
            self.start_index = start_index;
        }
        if let Some(padding) = other.padding {
            self.padding = padding;
        }
    }
}

impl ConfigMerge<CollectionOverrides> for CollectionConfig {
    fn merge_with(&mut self, other: CollectionOverrides) {
        if other.target.is_some() {
            self.target = other.target;
        }
    }
}

/// Explicit path, else the first implicit config file present in `dir`
pub fn discover_config(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        IMPLICIT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    })
}

/// Defaults overlaid with the configuration file, if any
pub fn load_configuration(explicit: Option<&Path>) -> anyhow::Result<HelpingHandConfig> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let Some(path) = discover_config(explicit, &cwd) else {
        return Ok(HelpingHandConfig::default());
    };

    let config = HelpingHandConfig::from_yaml_file(&path).map_err(|e| {
        anyhow::anyhow!("Failed to load configuration from {}: {}", path.display(), e)
    })?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
