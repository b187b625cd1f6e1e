//! Main engine exposing the object tools over a host repository.

use serde::Serialize;
use tracing::{info, warn};

use crate::api::release::UpdateStatus;
use crate::core::config::HelpingHandConfig;
use crate::core::errors::{HelpingHandError, Result};
use crate::core::scene::{ObjectId, ObjectRepository, SceneObject};
use crate::detectors::rename::{BatchRenamer, RenameReport};
use crate::detectors::similarity::{CacheStatistics, SelectionMethod, SimilarityIndex};

/// Result of select-similar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionReport {
    /// Name of the object the query started from
    pub active: String,
    /// Grouping that was applied
    pub method: SelectionMethod,
    /// Names now selected, in index order
    pub selected: Vec<String>,
}

/// A per-object failure inside a batch operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectWarning {
    /// Object name before the operation
    pub name: String,
    /// Why the object was skipped
    pub detail: String,
}

/// Result of link-data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Object whose data was shared
    pub source: String,
    /// Objects now using the source data
    pub linked: Vec<String>,
    /// Per-object failures; the operation continued past them
    pub warnings: Vec<ObjectWarning>,
}

/// Result of move-to-collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    /// Collection the objects were moved into
    pub target: String,
    /// Objects that were moved
    pub moved: Vec<String>,
    /// Per-object failures; the operation continued past them
    pub warnings: Vec<ObjectWarning>,
}

/// Object tools bound to one configuration and one similarity cache.
///
/// The engine never owns the scene; each operation borrows the repository for
/// its duration.
#[derive(Debug, Default)]
pub struct HelpingHandEngine {
    config: HelpingHandConfig,
    index: SimilarityIndex,
}

impl HelpingHandEngine {
    /// Create a new engine, validating the configuration
    pub fn new(config: HelpingHandConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            index: SimilarityIndex::new(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &HelpingHandConfig {
        &self.config
    }

    /// Mutable configuration; changes apply to the next operation
    pub fn config_mut(&mut self) -> &mut HelpingHandConfig {
        &mut self.config
    }

    /// Counters of the similarity cache
    pub fn cache_statistics(&self) -> CacheStatistics {
        self.index.statistics()
    }

    /// Drop the similarity cache
    pub fn invalidate_cache(&mut self) {
        self.index.invalidate();
    }

    /// Replace the selection with objects similar to the active one.
    ///
    /// The match set is computed before the selection is touched, so a failed
    /// query leaves the selection as it was.
    pub fn select_similar<R: ObjectRepository + ?Sized>(
        &mut self,
        repo: &mut R,
    ) -> Result<SelectionReport> {
        let active_id = repo
            .active_object()
            .ok_or_else(|| HelpingHandError::no_active_object("select similar"))?;
        let live = repo.list_objects();
        let active = live
            .iter()
            .find(|obj| obj.id == active_id)
            .cloned()
            .ok_or_else(|| HelpingHandError::unknown_object(active_id.to_string()))?;

        let method = self.config.selection.method;
        let matches = self.index.select_similar(
            &active,
            method,
            self.config.selection.case_sensitive,
            &live,
        )?;
        let ids: Vec<ObjectId> = matches.iter().map(|obj| obj.id).collect();
        let selected: Vec<String> = matches.iter().map(|obj| obj.name.clone()).collect();

        repo.deselect_all();
        repo.select_objects(&ids);

        info!("Selected {} similar objects", selected.len());
        Ok(SelectionReport {
            active: active.name,
            method,
            selected,
        })
    }

    /// Make every other selected object share the active object's data.
    pub fn link_data<R: ObjectRepository + ?Sized>(&mut self, repo: &mut R) -> Result<LinkReport> {
        let active_id = repo
            .active_object()
            .ok_or_else(|| HelpingHandError::no_active_object("link data"))?;
        let active = repo
            .object(active_id)
            .ok_or_else(|| HelpingHandError::unknown_object(active_id.to_string()))?;
        let targets: Vec<SceneObject> = selection(repo)
            .into_iter()
            .filter(|obj| obj.id != active_id)
            .collect();
        if targets.is_empty() {
            return Err(HelpingHandError::empty_selection("link data"));
        }

        let mut report = LinkReport {
            source: active.name.clone(),
            linked: Vec::new(),
            warnings: Vec::new(),
        };
        for target in targets {
            match repo.link_data(target.id, active_id) {
                Ok(()) => report.linked.push(target.name),
                Err(err) => {
                    warn!("Could not link data for '{}': {}", target.name, err);
                    report.warnings.push(ObjectWarning {
                        name: target.name,
                        detail: err.to_string(),
                    });
                }
            }
        }
        self.index.invalidate();

        info!(
            "Linked data for {} objects to '{}'",
            report.linked.len(),
            report.source
        );
        Ok(report)
    }

    /// Move the selection into `target`, or the configured target collection.
    pub fn move_to_collection<R: ObjectRepository + ?Sized>(
        &mut self,
        repo: &mut R,
        target: Option<&str>,
    ) -> Result<MoveReport> {
        let target = target
            .map(str::to_string)
            .or_else(|| self.config.collections.target.clone())
            .ok_or_else(|| {
                HelpingHandError::config_field(
                    "no target collection chosen",
                    "collections.target",
                )
            })?;
        let objects = selection(repo);
        if objects.is_empty() {
            return Err(HelpingHandError::empty_selection("move to collection"));
        }

        let mut report = MoveReport {
            target: target.clone(),
            moved: Vec::new(),
            warnings: Vec::new(),
        };
        for obj in objects {
            match repo.move_to_collection(obj.id, &target) {
                Ok(()) => report.moved.push(obj.name),
                Err(err) => {
                    warn!("Could not move '{}' to '{}': {}", obj.name, target, err);
                    report.warnings.push(ObjectWarning {
                        name: obj.name,
                        detail: err.to_string(),
                    });
                }
            }
        }
        self.index.invalidate();

        info!("Moved {} objects to '{}'", report.moved.len(), target);
        Ok(report)
    }

    /// Rename the selection with the configured format.
    pub fn batch_rename<R: ObjectRepository + ?Sized>(
        &mut self,
        repo: &mut R,
    ) -> Result<RenameReport> {
        let objects = selection(repo);
        if objects.is_empty() {
            return Err(HelpingHandError::empty_selection("batch rename"));
        }

        let renamer = BatchRenamer::new(self.config.rename.to_options());
        let report = renamer.rename(repo, &objects);
        self.index.invalidate();
        Ok(report)
    }

    /// Compare the installed version with a published release tag.
    pub fn check_release(&self, latest_tag: &str) -> Result<UpdateStatus> {
        UpdateStatus::evaluate(&self.config.updates.current_version, latest_tag)
    }
}

/// Snapshots of the selected objects that still exist
fn selection<R: ObjectRepository + ?Sized>(repo: &R) -> Vec<SceneObject> {
    repo.selected_objects()
        .into_iter()
        .filter_map(|id| repo.object(id))
        .collect()
}
