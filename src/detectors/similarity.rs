//! Cached similar-object lookup by base name or mesh topology.
//!
//! The index keeps two grouping maps over the mesh objects of a scene and
//! answers "which objects are like this one" with a single map lookup. The
//! maps are built lazily and thrown away whenever the live object count
//! differs from the count seen at build time, or when a caller that knows it
//! changed the scene calls [`SimilarityIndex::invalidate`].
//!
//! The count check is coarse: replacing N objects with N others, or editing a
//! name or mesh in place, goes unnoticed until the next explicit invalidation.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{HelpingHandError, Result};
use crate::core::naming::{base_name, NameKey};
use crate::core::scene::{MeshSignature, ObjectId, SceneObject};

/// Criterion used to decide that two objects are similar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMethod {
    /// Same base name once the numeric suffix is stripped
    #[serde(rename = "name", alias = "NAME")]
    ByName,
    /// Same vertex, edge and face counts
    #[serde(rename = "topology", alias = "TOPOLOGY")]
    ByTopology,
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMethod::ByName => f.write_str("name"),
            SelectionMethod::ByTopology => f.write_str("topology"),
        }
    }
}

/// Counters describing how the cache has been used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatistics {
    /// Times the name map was rebuilt
    pub name_rebuilds: usize,
    /// Times the topology map was rebuilt
    pub topology_rebuilds: usize,
    /// Queries served from an already built map
    pub hits: usize,
    /// Queries that had to build a map first
    pub misses: usize,
    /// Times both maps were dropped
    pub invalidations: usize,
}

impl CacheStatistics {
    /// Fraction of queries answered without a rebuild
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lazily built grouping index over the mesh objects of a scene.
#[derive(Debug, Default)]
pub struct SimilarityIndex {
    by_name: HashMap<NameKey, Vec<ObjectId>>,
    by_topology: HashMap<MeshSignature, Vec<ObjectId>>,
    /// Object count at last build; `None` until the next query records one
    cached_object_count: Option<usize>,
    stats: CacheStatistics,
}

impl SimilarityIndex {
    /// Empty index; the first query builds it
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop both maps; the next query rebuilds what it needs.
    pub fn invalidate(&mut self) {
        self.by_name.clear();
        self.by_topology.clear();
        self.cached_object_count = None;
        self.stats.invalidations += 1;
        debug!("Similarity cache invalidated");
    }

    /// Object count recorded by the last query, if still valid
    pub fn cached_object_count(&self) -> Option<usize> {
        self.cached_object_count
    }

    /// Snapshot of the cache counters
    pub fn statistics(&self) -> CacheStatistics {
        self.stats
    }

    /// Objects in `live_objects` similar to `active` under `method`.
    ///
    /// Only mesh objects are ever returned, in the order they were indexed.
    /// The active object is part of its own group.
    pub fn select_similar<'a>(
        &mut self,
        active: &SceneObject,
        method: SelectionMethod,
        case_sensitive: bool,
        live_objects: &'a [SceneObject],
    ) -> Result<Vec<&'a SceneObject>> {
        if self.cached_object_count != Some(live_objects.len()) {
            self.invalidate();
            self.cached_object_count = Some(live_objects.len());
        }

        let bucket = match method {
            SelectionMethod::ByName => self.lookup_by_name(active, case_sensitive, live_objects),
            SelectionMethod::ByTopology => self.lookup_by_topology(active, live_objects)?,
        };

        let resolved = resolve(&bucket, live_objects);
        debug!(
            "select_similar({}, {method}) matched {} of {} objects",
            active.name,
            resolved.len(),
            live_objects.len()
        );
        Ok(resolved)
    }

    fn lookup_by_name(
        &mut self,
        active: &SceneObject,
        case_sensitive: bool,
        live_objects: &[SceneObject],
    ) -> Vec<ObjectId> {
        if self.by_name.is_empty() {
            self.rebuild_name_index(live_objects);
            self.stats.misses += 1;
        } else {
            self.stats.hits += 1;
        }

        if !active.is_mesh() {
            return Vec::new();
        }
        let Some(active_base) = base_name(&active.name) else {
            return Vec::new();
        };
        let Some(key) = NameKey::from_name(&active.name, false) else {
            return Vec::new();
        };
        let Some(bucket) = self.by_name.get(&key) else {
            return Vec::new();
        };

        if !case_sensitive {
            return bucket.clone();
        }

        let live_names: HashMap<ObjectId, &str> = live_objects
            .iter()
            .map(|obj| (obj.id, obj.name.as_str()))
            .collect();
        bucket
            .iter()
            .copied()
            .filter(|id| {
                live_names
                    .get(id)
                    .and_then(|name| base_name(name))
                    .is_some_and(|base| base == active_base)
            })
            .collect()
    }

    fn lookup_by_topology(
        &mut self,
        active: &SceneObject,
        live_objects: &[SceneObject],
    ) -> Result<Vec<ObjectId>> {
        let signature = active.mesh.ok_or_else(|| {
            HelpingHandError::cannot_compute(active.name.clone(), "object has no mesh data")
        })?;

        if self.by_topology.is_empty() {
            self.rebuild_topology_index(live_objects);
            self.stats.misses += 1;
        } else {
            self.stats.hits += 1;
        }

        Ok(self
            .by_topology
            .get(&signature)
            .cloned()
            .unwrap_or_default())
    }

    fn rebuild_name_index(&mut self, live_objects: &[SceneObject]) {
        for obj in live_objects.iter().filter(|obj| obj.is_mesh()) {
            if let Some(key) = NameKey::from_name(&obj.name, false) {
                self.by_name.entry(key).or_default().push(obj.id);
            }
        }
        self.stats.name_rebuilds += 1;
        debug!(
            "Rebuilt name index: {} groups over {} objects",
            self.by_name.len(),
            live_objects.len()
        );
    }

    fn rebuild_topology_index(&mut self, live_objects: &[SceneObject]) {
        for obj in live_objects.iter().filter(|obj| obj.is_mesh()) {
            if let Some(signature) = obj.mesh {
                self.by_topology.entry(signature).or_default().push(obj.id);
            }
        }
        self.stats.topology_rebuilds += 1;
        debug!(
            "Rebuilt topology index: {} signatures over {} objects",
            self.by_topology.len(),
            live_objects.len()
        );
    }
}

/// Map cached handles back onto live objects, skipping handles that vanished.
fn resolve<'a>(bucket: &[ObjectId], live_objects: &'a [SceneObject]) -> Vec<&'a SceneObject> {
    let by_id: HashMap<ObjectId, &'a SceneObject> =
        live_objects.iter().map(|obj| (obj.id, obj)).collect();

    bucket
        .iter()
        .filter_map(|id| {
            let found = by_id.get(id).copied();
            if found.is_none() {
                debug!("Cached object {id} is no longer live");
            }
            found
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::ObjectKind;

    fn mesh(id: u64, name: &str, sig: (usize, usize, usize)) -> SceneObject {
        SceneObject::new(ObjectId(id), name, ObjectKind::Mesh)
            .with_mesh(MeshSignature::new(sig.0, sig.1, sig.2))
    }

    fn names(objects: &[&SceneObject]) -> Vec<String> {
        objects.iter().map(|obj| obj.name.clone()).collect()
    }

    fn scene() -> Vec<SceneObject> {
        vec![
            mesh(1, "Cube", (8, 12, 6)),
            mesh(2, "Cube.001", (8, 12, 6)),
            mesh(3, "cube_04", (8, 12, 6)),
            mesh(4, "Sphere", (482, 960, 480)),
            SceneObject::new(ObjectId(5), "Cube.002", ObjectKind::Empty),
            mesh(6, "Plane", (4, 4, 1)),
            mesh(7, "Cube-9", (4, 4, 1)),
        ]
    }

    #[test]
    fn test_by_name_groups_case_insensitively() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        let result = index
            .select_similar(&live[1], SelectionMethod::ByName, false, &live)
            .unwrap();

        assert_eq!(names(&result), vec!["Cube", "Cube.001", "cube_04", "Cube-9"]);
    }

    #[test]
    fn test_by_name_case_sensitive_filters_bucket() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        let result = index
            .select_similar(&live[0], SelectionMethod::ByName, true, &live)
            .unwrap();

        assert_eq!(names(&result), vec!["Cube", "Cube.001", "Cube-9"]);

        let result = index
            .select_similar(&live[2], SelectionMethod::ByName, true, &live)
            .unwrap();
        assert_eq!(names(&result), vec!["cube_04"]);
    }

    #[test]
    fn test_non_mesh_objects_never_match() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        let result = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(result.iter().all(|obj| obj.is_mesh()));

        let empty_active = &live[4];
        let result = index
            .select_similar(empty_active, SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_by_topology_returns_identical_signatures_including_active() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        let result = index
            .select_similar(&live[5], SelectionMethod::ByTopology, false, &live)
            .unwrap();

        assert_eq!(names(&result), vec!["Plane", "Cube-9"]);
        assert!(result.iter().any(|obj| obj.id == live[5].id));
    }

    #[test]
    fn test_by_topology_without_mesh_data_cannot_compute() {
        let mut live = scene();
        live.push(SceneObject::new(ObjectId(8), "EmptyMesh", ObjectKind::Mesh));
        let mut index = SimilarityIndex::new();

        let err = index
            .select_similar(&live[7], SelectionMethod::ByTopology, false, &live)
            .unwrap_err();
        assert!(matches!(err, HelpingHandError::CannotCompute { .. }));

        let err = index
            .select_similar(&live[4], SelectionMethod::ByTopology, false, &live)
            .unwrap_err();
        assert!(matches!(err, HelpingHandError::CannotCompute { .. }));
    }

    #[test]
    fn test_empty_name_matches_nothing() {
        let live = vec![mesh(1, "", (1, 0, 0)), mesh(2, "A", (1, 0, 0))];
        let mut index = SimilarityIndex::new();

        let result = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_lookup_is_idempotent_across_invalidate() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        for method in [SelectionMethod::ByName, SelectionMethod::ByTopology] {
            let first = names(&index.select_similar(&live[0], method, false, &live).unwrap());
            let second = names(&index.select_similar(&live[0], method, false, &live).unwrap());
            index.invalidate();
            let third = names(&index.select_similar(&live[0], method, false, &live).unwrap());

            assert_eq!(first, second);
            assert_eq!(second, third);
        }
    }

    #[test]
    fn test_count_change_forces_rebuild() {
        let mut live = scene();
        let mut index = SimilarityIndex::new();

        let before = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap()
            .len();
        assert_eq!(index.statistics().name_rebuilds, 1);

        live.push(mesh(9, "Cube.010", (8, 12, 6)));
        let after = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();

        assert_eq!(after.len(), before + 1);
        assert!(after.iter().any(|obj| obj.name == "Cube.010"));
        assert_eq!(index.statistics().name_rebuilds, 2);
        assert_eq!(index.cached_object_count(), Some(live.len()));
    }

    #[test]
    fn test_same_count_reuses_cache() {
        let live = scene();
        let mut index = SimilarityIndex::new();

        index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        index
            .select_similar(&live[3], SelectionMethod::ByName, false, &live)
            .unwrap();

        let stats = index.statistics();
        assert_eq!(stats.name_rebuilds, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_in_place_edit_is_missed_until_invalidate() {
        let mut live = scene();
        let mut index = SimilarityIndex::new();

        index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();

        live[3].name = "Cube.777".to_string();
        let stale = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(!stale.iter().any(|obj| obj.name == "Cube.777"));

        index.invalidate();
        let fresh = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(fresh.iter().any(|obj| obj.name == "Cube.777"));
    }

    #[test]
    fn test_replaced_objects_are_dropped_from_results() {
        let mut live = scene();
        let mut index = SimilarityIndex::new();

        index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();

        live[1] = mesh(42, "Torus", (576, 1152, 576));
        let result = index
            .select_similar(&live[0], SelectionMethod::ByName, false, &live)
            .unwrap();
        assert!(result.iter().all(|obj| obj.id != ObjectId(2)));
    }

    #[test]
    fn test_invalidate_resets_count_sentinel() {
        let live = scene();
        let mut index = SimilarityIndex::new();
        index
            .select_similar(&live[0], SelectionMethod::ByTopology, false, &live)
            .unwrap();
        assert_eq!(index.cached_object_count(), Some(live.len()));

        index.invalidate();
        assert_eq!(index.cached_object_count(), None);
    }

    #[test]
    fn test_method_serde_names() {
        let method: SelectionMethod = serde_yaml::from_str("topology").unwrap();
        assert_eq!(method, SelectionMethod::ByTopology);
        let method: SelectionMethod = serde_yaml::from_str("NAME").unwrap();
        assert_eq!(method, SelectionMethod::ByName);
        assert_eq!(SelectionMethod::ByTopology.to_string(), "topology");
    }
}
