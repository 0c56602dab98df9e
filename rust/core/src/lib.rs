// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Gunsmith Core
//!
//! Domain model for the firearm configurator: which semantic part a mesh
//! is, what it is called, and what color it should be.
//!
//! ## Overview
//!
//! - **Part Taxonomy**: static, categorised list of part types ([`taxonomy`])
//! - **Part Classifier**: admin tag first, then ordered name heuristics ([`classifier`])
//! - **Tagging Session**: the admin's editable mesh -> tag map ([`session`])
//! - **Colors**: hex parsing and the per-part [`ColorSelection`]
//! - **Pricing**: build catalog and price quotes ([`pricing`])
//!
//! ## Quick Start
//!
//! ```rust
//! use gunsmith_core::{classify, TagMap, TaggingSession};
//!
//! assert_eq!(classify("Slide_Main_002", &TagMap::new()), "slide");
//!
//! let mut session = TaggingSession::new("glock-19", Vec::new());
//! session.select_mesh("Mesh_0");
//! session.set_part_type("Mesh_0", "frame_main").unwrap();
//! assert_eq!(session.tags().get("Mesh_0").unwrap().display_name, "Frame Body");
//! ```

pub mod classifier;
pub mod color;
pub mod error;
pub mod part;
pub mod pricing;
pub mod session;
pub mod store;
pub mod tags;
pub mod taxonomy;

pub use classifier::{
    classify, classify_meshes, classify_with_source, heuristic_match, ClassificationSource,
    Classifications, MeshClassification,
};
pub use color::{Color, ColorSelection};
pub use error::{Error, Result};
pub use part::PartType;
pub use session::{MeshRow, Selection, TagField, TaggingSession};
pub use store::{MemoryTagStore, PartTagStore};
pub use tags::{persistable, PartTag, TagMap};
