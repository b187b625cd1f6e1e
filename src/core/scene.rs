//! Scene object model and the host repository contract.
//!
//! The host application owns the object graph. Everything in this crate sees
//! objects as [`SceneObject`] snapshots and changes them only through an
//! [`ObjectRepository`] borrowed for the duration of one operation.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{RenameError, Result};

/// Stable handle for a host object. Names are mutable, handles are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host object type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    /// Polygon mesh, the only kind that takes part in similarity queries
    #[default]
    Mesh,
    /// Curve object
    Curve,
    /// NURBS surface
    Surface,
    /// Text object
    Text,
    /// Empty transform without data
    Empty,
    /// Light source
    Light,
    /// Camera
    Camera,
    /// Skeleton rig
    Armature,
    /// Any kind not listed above
    Other,
}

impl ObjectKind {
    /// Tag as the host spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Mesh => "MESH",
            ObjectKind::Curve => "CURVE",
            ObjectKind::Surface => "SURFACE",
            ObjectKind::Text => "TEXT",
            ObjectKind::Empty => "EMPTY",
            ObjectKind::Light => "LIGHT",
            ObjectKind::Camera => "CAMERA",
            ObjectKind::Armature => "ARMATURE",
            ObjectKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topology fingerprint of a mesh: two meshes match iff all three counts match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshSignature {
    /// Number of vertices
    #[serde(rename = "vertices")]
    pub vertex_count: usize,
    /// Number of edges
    #[serde(rename = "edges")]
    pub edge_count: usize,
    /// Number of faces
    #[serde(rename = "faces")]
    pub face_count: usize,
}

impl MeshSignature {
    /// Signature from element counts
    pub fn new(vertex_count: usize, edge_count: usize, face_count: usize) -> Self {
        Self {
            vertex_count,
            edge_count,
            face_count,
        }
    }
}

impl fmt::Display for MeshSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(v={}, e={}, f={})",
            self.vertex_count, self.edge_count, self.face_count
        )
    }
}

/// Snapshot of one host object as seen at the time it was listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Stable handle
    pub id: ObjectId,
    /// Unique name at snapshot time
    pub name: String,
    /// Host type tag
    pub kind: ObjectKind,
    /// Mesh topology, present only for meshes that carry mesh data
    pub mesh: Option<MeshSignature>,
    /// Name of the object-data block, if any
    pub data: Option<String>,
    /// Collections the object is linked into
    pub collections: BTreeSet<String>,
}

impl SceneObject {
    /// Object snapshot without mesh data or collections
    pub fn new(id: ObjectId, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            mesh: None,
            data: None,
            collections: BTreeSet::new(),
        }
    }

    /// Builder: attach mesh data with the given topology
    pub fn with_mesh(mut self, signature: MeshSignature) -> Self {
        self.mesh = Some(signature);
        self
    }

    /// Builder: name the object-data block
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Builder: link into a collection
    pub fn in_collection(mut self, collection: impl Into<String>) -> Self {
        self.collections.insert(collection.into());
        self
    }

    /// Whether the object takes part in similarity queries
    pub fn is_mesh(&self) -> bool {
        self.kind == ObjectKind::Mesh
    }
}

/// Host-provided access to the live object graph.
///
/// Implementations must keep names unique across all objects.
pub trait ObjectRepository {
    /// All objects visible to the current view, in host order
    fn list_objects(&self) -> Vec<SceneObject>;

    /// Snapshot of a single object
    fn object(&self, id: ObjectId) -> Option<SceneObject>;

    /// Mesh topology for an object, `None` for non-meshes and meshes without data
    fn mesh_signature(&self, id: ObjectId) -> Option<MeshSignature> {
        self.object(id).and_then(|obj| obj.mesh)
    }

    /// Collections an object is linked into
    fn collections(&self, id: ObjectId) -> Result<BTreeSet<String>>;

    /// Unlink an object from every collection and link it into `target`
    fn move_to_collection(&mut self, id: ObjectId, target: &str) -> Result<()>;

    /// Give an object a new unique name
    fn rename(&mut self, id: ObjectId, new_name: &str) -> std::result::Result<(), RenameError>;

    /// Make `target` share the object data of `source`
    fn link_data(&mut self, target: ObjectId, source: ObjectId) -> Result<()>;

    /// Object the user is working on, if any
    fn active_object(&self) -> Option<ObjectId>;

    /// Currently selected objects in host order
    fn selected_objects(&self) -> Vec<ObjectId>;

    /// Add objects to the selection
    fn select_objects(&mut self, ids: &[ObjectId]);

    /// Clear the selection
    fn deselect_all(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_host_tag() {
        let yaml = serde_yaml::to_string(&ObjectKind::Mesh).unwrap();
        assert_eq!(yaml.trim(), "MESH");

        let kind: ObjectKind = serde_yaml::from_str("LIGHT").unwrap();
        assert_eq!(kind, ObjectKind::Light);
        assert_eq!(kind.to_string(), "LIGHT");
    }

    #[test]
    fn test_signature_equality_is_componentwise() {
        let cube = MeshSignature::new(8, 12, 6);
        assert_eq!(cube, MeshSignature::new(8, 12, 6));
        assert_ne!(cube, MeshSignature::new(8, 12, 5));
        assert_eq!(cube.to_string(), "(v=8, e=12, f=6)");
    }

    #[test]
    fn test_signature_serde_field_names() {
        let sig: MeshSignature = serde_yaml::from_str("{vertices: 4, edges: 4, faces: 1}").unwrap();
        assert_eq!(sig, MeshSignature::new(4, 4, 1));
    }

    #[test]
    fn test_scene_object_builders() {
        let obj = SceneObject::new(ObjectId(3), "Cube", ObjectKind::Mesh)
            .with_mesh(MeshSignature::new(8, 12, 6))
            .with_data("CubeMesh")
            .in_collection("Props");

        assert!(obj.is_mesh());
        assert_eq!(obj.data.as_deref(), Some("CubeMesh"));
        assert!(obj.collections.contains("Props"));
        assert_eq!(obj.id.to_string(), "#3");
    }
}
