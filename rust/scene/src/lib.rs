// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Gunsmith Scene
//!
//! Scene-side half of the configurator: loads a model, gives every mesh a
//! stable identifier and tints materials per part type without touching
//! the shared asset.
//!
//! ## Pipeline
//!
//! 1. [`load_model`] parses glTF/GLB into an immutable [`ModelAsset`]
//! 2. [`ModelInstance::new`] mirrors it into a per-viewer arena
//! 3. [`resolve_mesh_identities`] names every mesh (`Mesh_<n>` for unnamed ones)
//! 4. [`gunsmith_core::classify_meshes`] maps mesh ids to part types
//! 5. [`resolve_materials`] clones, strips, tints and highlights
//!
//! [`Configurator`] drives all five steps.
//!
//! ```rust
//! use std::sync::Arc;
//! use gunsmith_core::Color;
//! use gunsmith_scene::{Configurator, Material, ModelAsset};
//!
//! let mut builder = ModelAsset::builder();
//! let steel = builder.add_material(Material::standard(Color::from_u32(0x808080)));
//! builder.add_mesh(None, Some("Slide_Main_001"), &[steel]);
//! builder.add_mesh(None, None, &[steel]);
//!
//! let mut configurator = Configurator::new();
//! configurator.set_asset(Arc::new(builder.build()));
//! let out = configurator.select_part_type(Some("slide"));
//! assert!(out.get("Slide_Main_001").unwrap().is_selected);
//! assert!(!out.get("Mesh_0").unwrap().tinted);
//! ```

pub mod asset;
pub mod configurator;
pub mod error;
pub mod identity;
pub mod instance;
pub mod keys;
pub mod loader;
pub mod material;
pub mod tint;

pub use asset::{AssetMesh, AssetNode, ModelAsset, ModelAssetBuilder};
pub use configurator::Configurator;
pub use error::{Error, Result};
pub use identity::{mesh_identifiers, resolve_mesh_identities, SYNTHETIC_PREFIX};
pub use instance::{MaterialSlot, MeshState, ModelInstance, SceneNode};
pub use keys::{MaterialKey, NodeKey};
pub use loader::{load_glb, load_model};
pub use material::{Material, MaterialKind, TextureRef, TextureSlots};
pub use tint::{
    resolve_materials, RenderMaterialState, RenderMaterials, BASIC_HIGHLIGHT_MIX,
    SELECTION_EMISSIVE, SELECTION_INTENSITY,
};
