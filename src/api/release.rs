//! Release tag comparison for update notices.
//!
//! Fetching the latest tag is the host's business; this module only decides
//! what to tell the user once a tag is known.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{HelpingHandError, Result};

/// Dotted numeric version such as `0.2.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseVersion(Vec<u32>);

impl ReleaseVersion {
    /// Parse a tag like `v0.2.4`. Leading `v`s are ignored.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim().trim_start_matches('v');
        if trimmed.is_empty() {
            return Err(HelpingHandError::validation_field(
                format!("'{tag}' is not a version"),
                "tag",
                "dotted numbers such as v1.2.3",
                tag,
            ));
        }

        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u32>().map_err(|_| {
                    HelpingHandError::validation_field(
                        format!("'{tag}' has a non-numeric component '{part}'"),
                        "tag",
                        "dotted numbers such as v1.2.3",
                        tag,
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self(components))
    }

    /// Numeric components, most significant first
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Component-wise; a longer version wins a tie on the shared prefix.
impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("."))
    }
}

/// What the update panel should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateStatus {
    /// A newer release exists
    UpdateAvailable {
        /// Installed version
        current: String,
        /// Newest published version
        latest: String,
    },
    /// The installed version is the newest
    UpToDate {
        /// Installed version
        current: String,
        /// Newest published version
        latest: String,
    },
}

impl UpdateStatus {
    /// Compare the installed version with the latest published tag
    ///
    /// ```
    /// use helping_hand_rs::api::release::UpdateStatus;
    ///
    /// let status = UpdateStatus::evaluate("0.2.3", "v0.2.4").unwrap();
    /// assert!(status.show_download());
    /// assert_eq!(status.latest(), "0.2.4");
    /// ```
    pub fn evaluate(current: &str, latest_tag: &str) -> Result<Self> {
        let installed = ReleaseVersion::parse(current)?;
        let latest = ReleaseVersion::parse(latest_tag)?;

        let current = installed.to_string();
        let latest_str = latest.to_string();
        if latest > installed {
            Ok(Self::UpdateAvailable {
                current,
                latest: latest_str,
            })
        } else {
            Ok(Self::UpToDate {
                current,
                latest: latest_str,
            })
        }
    }

    /// Headline for the update notice
    pub fn message(&self) -> &'static str {
        match self {
            Self::UpdateAvailable { .. } => "A new version is available!",
            Self::UpToDate { .. } => "You have the latest version.",
        }
    }

    /// Whether a download link should be offered
    pub fn show_download(&self) -> bool {
        matches!(self, Self::UpdateAvailable { .. })
    }

    /// Latest published version
    pub fn latest(&self) -> &str {
        match self {
            Self::UpdateAvailable { latest, .. } | Self::UpToDate { latest, .. } => latest,
        }
    }
}
