//! Scene documents and an in-memory object repository.
//!
//! [`InMemoryScene`] plays the host's role for headless use: it is loaded from
//! a YAML or JSON scene document, enforces the host's naming rules, and is
//! written back after an operation.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{HelpingHandError, RenameError, Result, ResultExt};
use crate::core::scene::{MeshSignature, ObjectId, ObjectKind, ObjectRepository, SceneObject};

/// Longest name the host accepts, in bytes
pub const MAX_NAME_BYTES: usize = 63;

/// One object as written in a scene document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Unique object name
    pub name: String,

    /// Host object type
    #[serde(default)]
    pub kind: ObjectKind,

    /// Vertex, edge and face counts of mesh objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshSignature>,

    /// Object-data block name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Collections the object is linked into
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub collections: BTreeSet<String>,

    /// Host refuses to rename protected objects
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub protected: bool,
}

/// Serialized form of a scene
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Collections that exist even when empty
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub collections: BTreeSet<String>,

    /// Objects in insertion order
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,

    /// Name of the active object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,

    /// Names of the selected objects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected: Vec<String>,
}

/// Document formats recognised by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

impl SceneFormat {
    /// `.json` is JSON, anything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SceneFormat::Json,
            _ => SceneFormat::Yaml,
        }
    }
}

/// Object repository backed by plain maps
#[derive(Debug, Clone, Default)]
pub struct InMemoryScene {
    objects: IndexMap<ObjectId, ObjectRecord>,
    names: HashMap<String, ObjectId>,
    collections: BTreeSet<String>,
    active: Option<ObjectId>,
    selected: Vec<ObjectId>,
    next_id: u64,
}

impl InMemoryScene {
    /// Empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection so objects can be moved into it
    pub fn add_collection(&mut self, name: impl Into<String>) {
        self.collections.insert(name.into());
    }

    /// Add an object; fails if the name is already taken or empty.
    pub fn add_object(&mut self, record: ObjectRecord) -> Result<ObjectId> {
        if record.name.is_empty() {
            return Err(HelpingHandError::validation("object name must not be empty"));
        }
        if self.names.contains_key(&record.name) {
            return Err(HelpingHandError::validation_field(
                format!("duplicate object name '{}'", record.name),
                "objects.name",
                "unique name",
                record.name.clone(),
            ));
        }

        self.next_id += 1;
        let id = ObjectId(self.next_id);
        for collection in &record.collections {
            self.add_collection(collection.clone());
        }
        self.names.insert(record.name.clone(), id);
        self.objects.insert(id, record);
        Ok(id)
    }

    /// Convenience for tests and demos: add a mesh with topology
    pub fn add_mesh(&mut self, name: &str, signature: MeshSignature) -> Result<ObjectId> {
        self.add_object(ObjectRecord {
            name: name.to_string(),
            kind: ObjectKind::Mesh,
            mesh: Some(signature),
            data: Some(format!("{name}Mesh")),
            collections: BTreeSet::new(),
            protected: false,
        })
    }

    /// Remove an object from the scene
    pub fn remove_object(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        let record = self.objects.shift_remove(&id)?;
        self.names.remove(&record.name);
        self.selected.retain(|selected| *selected != id);
        if self.active == Some(id) {
            self.active = None;
        }
        Some(record)
    }

    /// Id of the object carrying `name`
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.names.get(name).copied()
    }

    /// Look up an object handle by name, as an error if missing
    pub fn require(&self, name: &str) -> Result<ObjectId> {
        self.find(name)
            .ok_or_else(|| HelpingHandError::unknown_object(name))
    }

    /// Set or clear the active object
    pub fn set_active(&mut self, id: Option<ObjectId>) {
        self.active = id;
    }

    /// Mark an object as locked against renames
    pub fn set_protected(&mut self, id: ObjectId, protected: bool) -> Result<()> {
        let record = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| HelpingHandError::unknown_object(id.to_string()))?;
        record.protected = protected;
        Ok(())
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Build a scene from its serialized form
    pub fn from_document(document: SceneDocument) -> Result<Self> {
        let mut scene = Self::new();
        for collection in document.collections {
            scene.add_collection(collection);
        }
        for record in document.objects {
            scene.add_object(record)?;
        }
        if let Some(active) = document.active {
            scene.active = Some(scene.require(&active)?);
        }
        for name in document.selected {
            let id = scene.require(&name)?;
            if !scene.selected.contains(&id) {
                scene.selected.push(id);
            }
        }
        Ok(scene)
    }

    /// Serialized form of the current state
    pub fn to_document(&self) -> SceneDocument {
        let name_of = |id: &ObjectId| self.objects.get(id).map(|record| record.name.clone());
        SceneDocument {
            collections: self.collections.clone(),
            objects: self.objects.values().cloned().collect(),
            active: self.active.as_ref().and_then(name_of),
            selected: self.selected.iter().filter_map(name_of).collect(),
        }
    }

    /// Parse a YAML scene document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_document(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON scene document
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_document(serde_json::from_str(content)?)
    }

    /// Load a scene document, choosing the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;

        let scene = match SceneFormat::from_path(path) {
            SceneFormat::Json => Self::from_json_str(&content),
            SceneFormat::Yaml => Self::from_yaml_str(&content),
        }
        .with_context(|| format!("Invalid scene file {}", path.display()))?;
        debug!("Loaded {} objects from {}", scene.len(), path.display());
        Ok(scene)
    }

    /// Write the scene document, choosing the format by extension
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let document = self.to_document();
        let content = match SceneFormat::from_path(path) {
            SceneFormat::Json => serde_json::to_string_pretty(&document)?,
            SceneFormat::Yaml => serde_yaml::to_string(&document)?,
        };
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write scene file {}", path.display()))
    }

    fn snapshot(id: ObjectId, record: &ObjectRecord) -> SceneObject {
        SceneObject {
            id,
            name: record.name.clone(),
            kind: record.kind,
            mesh: if record.kind == ObjectKind::Mesh {
                record.mesh
            } else {
                None
            },
            data: record.data.clone(),
            collections: record.collections.clone(),
        }
    }

    fn record_mut(&mut self, id: ObjectId) -> Result<&mut ObjectRecord> {
        self.objects
            .get_mut(&id)
            .ok_or_else(|| HelpingHandError::unknown_object(id.to_string()))
    }
}

impl ObjectRepository for InMemoryScene {
    fn list_objects(&self) -> Vec<SceneObject> {
        self.objects
            .iter()
            .map(|(id, record)| Self::snapshot(*id, record))
            .collect()
    }

    fn object(&self, id: ObjectId) -> Option<SceneObject> {
        self.objects.get(&id).map(|record| Self::snapshot(id, record))
    }

    fn collections(&self, id: ObjectId) -> Result<BTreeSet<String>> {
        self.objects
            .get(&id)
            .map(|record| record.collections.clone())
            .ok_or_else(|| HelpingHandError::unknown_object(id.to_string()))
    }

    fn move_to_collection(&mut self, id: ObjectId, target: &str) -> Result<()> {
        if !self.collections.contains(target) {
            return Err(HelpingHandError::repository(format!(
                "collection '{target}' does not exist"
            )));
        }
        let record = self.record_mut(id)?;
        record.collections.clear();
        record.collections.insert(target.to_string());
        Ok(())
    }

    fn rename(&mut self, id: ObjectId, new_name: &str) -> std::result::Result<(), RenameError> {
        let record = self
            .objects
            .get(&id)
            .ok_or(RenameError::UnknownObject { id: id.0 })?;

        if record.name == new_name {
            return Ok(());
        }
        if record.protected {
            return Err(RenameError::Protected {
                name: record.name.clone(),
            });
        }
        if new_name.is_empty() {
            return Err(RenameError::InvalidName {
                requested: String::new(),
                reason: "name is empty".to_string(),
            });
        }
        if new_name.len() > MAX_NAME_BYTES {
            return Err(RenameError::InvalidName {
                requested: new_name.to_string(),
                reason: format!("longer than {MAX_NAME_BYTES} bytes"),
            });
        }
        if self.names.contains_key(new_name) {
            return Err(RenameError::NameTaken {
                requested: new_name.to_string(),
            });
        }

        let old_name = record.name.clone();
        self.names.remove(&old_name);
        self.names.insert(new_name.to_string(), id);
        if let Some(record) = self.objects.get_mut(&id) {
            record.name = new_name.to_string();
        }
        Ok(())
    }

    fn link_data(&mut self, target: ObjectId, source: ObjectId) -> Result<()> {
        let source_record = self
            .objects
            .get(&source)
            .cloned()
            .ok_or_else(|| HelpingHandError::unknown_object(source.to_string()))?;
        let target_record = self.record_mut(target)?;

        if target_record.kind != source_record.kind {
            return Err(HelpingHandError::repository_object(
                format!(
                    "cannot link {} data into a {} object",
                    source_record.kind, target_record.kind
                ),
                target_record.name.clone(),
            ));
        }
        target_record.data = source_record.data;
        target_record.mesh = source_record.mesh;
        Ok(())
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selected.clone()
    }

    fn select_objects(&mut self, ids: &[ObjectId]) {
        for id in ids {
            if self.objects.contains_key(id) && !self.selected.contains(id) {
                self.selected.push(*id);
            }
        }
    }

    fn deselect_all(&mut self) {
        self.selected.clear();
    }
}
