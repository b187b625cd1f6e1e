//! Collision-safe batch renaming.
//!
//! Objects are renamed in two passes. Every selected object first moves to a
//! reserved temporary name, which frees all of the selection's current names
//! at once. The second pass assigns the final `<prefix><base>_<NN>` names.
//! Renaming straight to the final names would fail whenever one selected
//! object's target is another selected object's current name (`A -> B`,
//! `B -> A`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::errors::RenameError;
use crate::core::scene::{ObjectId, ObjectRepository, SceneObject};

/// Prefix of the intermediate names. Never produced by a final name.
pub const TEMP_NAME_PREFIX: &str = "__HELPING_HAND_TEMP_RENAME_";

/// Smallest accepted suffix width
pub const MIN_PADDING: usize = 1;
/// Largest accepted suffix width
pub const MAX_PADDING: usize = 4;

/// Final-name format for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOptions {
    /// Text before the base name
    pub prefix: String,
    /// Text before the numeric suffix
    pub base_name: String,
    /// Number the first object receives
    pub start_index: u32,
    /// Minimum digit count; wider numbers are never truncated
    pub padding: usize,
}

impl RenameOptions {
    /// Final name for the object at `position` in the sorted selection
    pub fn final_name(&self, position: usize) -> String {
        let number = u64::from(self.start_index) + position as u64;
        format!(
            "{}{}_{:0width$}",
            self.prefix,
            self.base_name,
            number,
            width = self.padding
        )
    }
}

/// One object's slot in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    /// Object being renamed
    pub id: ObjectId,
    /// Name before the batch
    pub original_name: String,
    /// Index in the name-sorted selection
    pub position: usize,
    /// Name the object ends the batch with
    pub final_name: String,
}

/// Deterministic assignment of final names to a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    /// Entries in name order
    pub entries: Vec<PlannedRename>,
}

impl RenamePlan {
    /// Number of objects in the plan
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the plan renames nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pass in which a per-object rename failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePhase {
    /// Final name held by an object outside the batch; never renamed
    Conflict,
    /// Could not move to a temporary name
    Temporary,
    /// Could not take the final name
    Final,
}

/// A non-fatal per-object failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameWarning {
    /// Name the object had before the batch
    pub name: String,
    /// Pass that failed
    pub phase: RenamePhase,
    /// Host or conflict message
    pub detail: String,
}

/// Outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    /// Objects that reached their final name
    pub renamed: usize,
    /// Objects that kept their original name
    pub warnings: Vec<RenameWarning>,
    /// `(original, final)` for every object that reached its final name
    pub applied: Vec<(String, String)>,
}

/// Two-pass batch renamer
#[derive(Debug, Clone)]
pub struct BatchRenamer {
    options: RenameOptions,
}

impl BatchRenamer {
    /// Renamer for one naming format
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    /// Naming format of this batch
    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Sort the selection by current name and assign final names.
    pub fn plan(&self, selection: &[SceneObject]) -> RenamePlan {
        let mut sorted: Vec<&SceneObject> = selection.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(position, obj)| PlannedRename {
                id: obj.id,
                original_name: obj.name.clone(),
                position,
                final_name: self.options.final_name(position),
            })
            .collect();

        RenamePlan { entries }
    }

    /// Plan and apply a batch rename of `selection`.
    pub fn rename<R: ObjectRepository + ?Sized>(
        &self,
        repo: &mut R,
        selection: &[SceneObject],
    ) -> RenameReport {
        let plan = self.plan(selection);
        self.apply(repo, &plan)
    }

    /// Apply a plan through the temporary-name pass and the final pass.
    ///
    /// Entries whose final name is held by an object outside the batch are
    /// skipped before any rename happens, so every object ends the batch on
    /// either its final name or its original one.
    pub fn apply<R: ObjectRepository + ?Sized>(&self, repo: &mut R, plan: &RenamePlan) -> RenameReport {
        let mut report = RenameReport::default();

        let batch: HashSet<ObjectId> = plan.entries.iter().map(|entry| entry.id).collect();
        let mut held: HashSet<String> = repo
            .list_objects()
            .into_iter()
            .filter(|obj| !batch.contains(&obj.id))
            .map(|obj| obj.name)
            .collect();

        let (candidates, conflicts) = exclude_conflicts(plan.entries.iter().collect(), &mut held);
        for entry in conflicts {
            report.warnings.push(conflict_warning(entry));
        }

        let mut staged: Vec<&PlannedRename> = Vec::with_capacity(candidates.len());
        for entry in candidates {
            let temp_name = format!("{TEMP_NAME_PREFIX}{}", entry.position);
            match repo.rename(entry.id, &temp_name) {
                Ok(()) => staged.push(entry),
                Err(err) => {
                    warn!(
                        "Could not rename '{}' to a temporary name, skipping: {}",
                        entry.original_name, err
                    );
                    held.insert(entry.original_name.clone());
                    report.warnings.push(RenameWarning {
                        name: entry.original_name.clone(),
                        phase: RenamePhase::Temporary,
                        detail: err.to_string(),
                    });
                }
            }
        }
        debug!("{} of {} objects staged on temporary names", staged.len(), plan.len());

        // Objects that stayed behind in the temporary pass keep their names,
        // which may block more final names.
        let (staged, blocked) = exclude_conflicts(staged, &mut held);
        for entry in blocked {
            let mut warning = conflict_warning(entry);
            if let Err(err) = repo.rename(entry.id, &entry.original_name) {
                warning.detail = format!("{}; restoring original name failed: {err}", warning.detail);
            }
            report.warnings.push(warning);
        }

        for entry in staged {
            match repo.rename(entry.id, &entry.final_name) {
                Ok(()) => {
                    report.renamed += 1;
                    report
                        .applied
                        .push((entry.original_name.clone(), entry.final_name.clone()));
                }
                Err(err) => {
                    let detail = restore_original(repo, entry, &err);
                    report.warnings.push(RenameWarning {
                        name: entry.original_name.clone(),
                        phase: RenamePhase::Final,
                        detail,
                    });
                }
            }
        }

        info!("Renamed {} objects", report.renamed);
        report
    }
}

/// Split off entries whose final name is in `held`.
///
/// An excluded entry keeps its original name, which then blocks any other
/// entry targeting it, so this repeats until nothing more is excluded.
fn exclude_conflicts<'p>(
    entries: Vec<&'p PlannedRename>,
    held: &mut HashSet<String>,
) -> (Vec<&'p PlannedRename>, Vec<&'p PlannedRename>) {
    let mut kept = entries;
    let mut excluded = Vec::new();
    loop {
        let (clashing, rest): (Vec<_>, Vec<_>) = kept
            .into_iter()
            .partition(|entry| held.contains(&entry.final_name));
        kept = rest;
        if clashing.is_empty() {
            break;
        }
        for entry in clashing {
            held.insert(entry.original_name.clone());
            excluded.push(entry);
        }
    }
    excluded.sort_by_key(|entry| entry.position);
    (kept, excluded)
}

fn conflict_warning(entry: &PlannedRename) -> RenameWarning {
    warn!(
        "'{}' is already taken, keeping '{}'",
        entry.final_name, entry.original_name
    );
    RenameWarning {
        name: entry.original_name.clone(),
        phase: RenamePhase::Conflict,
        detail: format!("name '{}' is already taken; kept original name", entry.final_name),
    }
}

/// Put an object back on its pre-batch name after a failed final rename.
fn restore_original<R: ObjectRepository + ?Sized>(
    repo: &mut R,
    entry: &PlannedRename,
    err: &RenameError,
) -> String {
    warn!(
        "Could not rename '{}' to '{}': {}",
        entry.original_name, entry.final_name, err
    );
    match repo.rename(entry.id, &entry.original_name) {
        Ok(()) => format!("{err}; kept original name"),
        Err(restore_err) => {
            warn!(
                "Could not restore '{}' after failed rename: {}",
                entry.original_name, restore_err
            );
            format!("{err}; restoring original name also failed: {restore_err}")
        }
    }
}
