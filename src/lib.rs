//! # Helping Hand: batch object tools for 3D scenes
//!
//! Pure-logic object tools that run against a host-owned scene graph:
//!
//! - **Select Similar**: group objects by base name (`Cube`, `Cube.001`,
//!   `cube_04`) or by mesh topology, served from a lazily built cache
//! - **Batch Rename**: collision-safe `<prefix><base>_<NN>` renaming through a
//!   temporary-name pass
//! - **Link Data / Move to Collection**: selection-driven data sharing and
//!   collection membership edits
//! - **Release Check**: compare the installed version with a published tag
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 API (HelpingHandEngine)              │
//! ├──────────────────────────────────────────────────────┤
//! │  Core            │  Detectors         │  I/O         │
//! │ • Scene model    │ • SimilarityIndex  │ • Scene file │
//! │ • Naming         │ • BatchRenamer     │   host       │
//! │ • Config/Errors  │                    │              │
//! └──────────────────────────────────────────────────────┘
//!                 ▲ ObjectRepository (host)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use helping_hand_rs::{HelpingHandEngine, InMemoryScene};
//!
//! let mut scene = InMemoryScene::from_yaml_str(
//!     "objects: [{name: Rock}, {name: Rock.001}, {name: Tree}]\nactive: Rock\n",
//! )?;
//! let mut engine = HelpingHandEngine::default();
//!
//! let report = engine.select_similar(&mut scene)?;
//! assert_eq!(report.selected, vec!["Rock", "Rock.001"]);
//!
//! let renamed = engine.batch_rename(&mut scene)?;
//! assert_eq!(renamed.renamed, 2);
//! assert!(scene.find("SM_Object_02").is_some());
//! # Ok::<(), helping_hand_rs::HelpingHandError>(())
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core data model and shared infrastructure
pub mod core {
    //! Scene model, naming rules, configuration and errors.

    pub mod config;
    pub mod errors;
    pub mod naming;
    pub mod scene;
}

// Grouping and renaming algorithms
pub mod detectors {
    //! Similarity index and batch renamer.

    pub mod rename;
    pub mod similarity;
}

// Scene documents and the in-memory host
pub mod io {
    //! Scene file loading and the in-memory repository.

    pub mod scene_file;
}

// Public API and engine interface
pub mod api {
    //! High-level engine and release checks.

    pub mod engine;
    pub mod release;
}

// Re-export primary types for convenience
pub use crate::api::engine::HelpingHandEngine;
pub use crate::core::config::HelpingHandConfig;
pub use crate::core::errors::{HelpingHandError, RenameError, Result, ResultExt};
pub use crate::core::scene::{MeshSignature, ObjectId, ObjectKind, ObjectRepository, SceneObject};
pub use crate::detectors::rename::{BatchRenamer, RenameOptions, RenameReport};
pub use crate::detectors::similarity::{SelectionMethod, SimilarityIndex};
pub use crate::io::scene_file::InMemoryScene;
