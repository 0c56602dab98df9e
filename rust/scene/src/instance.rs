// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-viewer model instances.
//!
//! A [`ModelInstance`] mirrors the node tree of a shared [`ModelAsset`] in
//! its own slot-map arena. Mesh nodes start out pointing at the asset's
//! materials ([`MaterialSlot::Shared`]); the first write to a mesh clones
//! those materials into the instance ([`MaterialSlot::Owned`]) and flips a
//! per-mesh flag so the clone happens exactly once per instance lifetime.
//! The captured original colors live next to that flag, outside the asset.

use std::sync::Arc;

use gunsmith_core::Color;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::asset::ModelAsset;
use crate::keys::{MaterialKey, NodeKey};
use crate::material::Material;

/// Where a mesh's material currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialSlot {
    /// Still the asset's material at this index (read-only).
    Shared(usize),
    /// Instance-owned clone.
    Owned(MaterialKey),
}

/// Per-instance state of a renderable node.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshState {
    pub materials: SmallVec<[MaterialSlot; 1]>,
    /// Whether the renderer should still apply the geometry's vertex colors.
    pub vertex_colors: bool,
    /// Set once the materials have been cloned into the instance.
    pub materials_cloned: bool,
    /// Pre-tint color of each material slot, captured on first processing.
    pub original_colors: Option<SmallVec<[Color; 1]>>,
    /// Base-color/alpha maps and vertex colors have been removed.
    pub color_maps_stripped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    pub mesh: Option<MeshState>,
}

impl SceneNode {
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Name, treating the empty string as absent.
    pub fn resolved_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// One viewer's copy of a model's scene graph.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    pub(crate) asset: Arc<ModelAsset>,
    pub(crate) nodes: SlotMap<NodeKey, SceneNode>,
    pub(crate) roots: Vec<NodeKey>,
    pub(crate) materials: SlotMap<MaterialKey, Material>,
    pub(crate) identities_resolved: bool,
}

impl ModelInstance {
    /// Mirror the asset's node tree. Materials stay shared until first write.
    pub fn new(asset: Arc<ModelAsset>) -> Self {
        let mut nodes: SlotMap<NodeKey, SceneNode> = SlotMap::with_key();
        let mut keys: Vec<NodeKey> = Vec::with_capacity(asset.nodes.len());

        for source in &asset.nodes {
            keys.push(nodes.insert(SceneNode {
                name: source.name.clone(),
                parent: None,
                children: Vec::with_capacity(source.children.len()),
                mesh: source.mesh.as_ref().map(|mesh| MeshState {
                    materials: mesh.materials.iter().map(|&i| MaterialSlot::Shared(i)).collect(),
                    vertex_colors: mesh.vertex_colors,
                    materials_cloned: false,
                    original_colors: None,
                    color_maps_stripped: false,
                }),
            }));
        }

        for (index, source) in asset.nodes.iter().enumerate() {
            let parent = keys[index];
            for &child in &source.children {
                let Some(&child_key) = keys.get(child) else {
                    continue;
                };
                if let Some(node) = nodes.get_mut(parent) {
                    node.children.push(child_key);
                }
                if let Some(node) = nodes.get_mut(child_key) {
                    node.parent = Some(parent);
                }
            }
        }

        let roots = asset.roots.iter().filter_map(|&r| keys.get(r).copied()).collect();

        Self {
            asset,
            nodes,
            roots,
            materials: SlotMap::with_key(),
            identities_resolved: false,
        }
    }

    pub fn asset(&self) -> &Arc<ModelAsset> {
        &self.asset
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of materials cloned into this instance so far.
    pub fn owned_material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn identities_resolved(&self) -> bool {
        self.identities_resolved
    }

    /// All nodes in document order (pre-order, children in source order).
    pub fn traverse(&self) -> Vec<NodeKey> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            order.push(key);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Mesh nodes in document order.
    pub fn mesh_nodes(&self) -> Vec<NodeKey> {
        self.traverse()
            .into_iter()
            .filter(|&key| self.nodes.get(key).is_some_and(SceneNode::is_mesh))
            .collect()
    }

    /// First mesh node (document order) whose name is `name`.
    pub fn find_mesh(&self, name: &str) -> Option<NodeKey> {
        self.mesh_nodes()
            .into_iter()
            .find(|&key| self.nodes[key].resolved_name() == Some(name))
    }

    /// Resolve a slot to the material it currently refers to.
    pub fn material(&self, slot: MaterialSlot) -> Option<&Material> {
        match slot {
            MaterialSlot::Shared(index) => self.asset.material(index),
            MaterialSlot::Owned(key) => self.materials.get(key),
        }
    }

    /// Materials of a mesh node in slot order; unresolvable slots are skipped.
    pub fn mesh_materials(&self, key: NodeKey) -> Vec<&Material> {
        self.nodes
            .get(key)
            .and_then(|node| node.mesh.as_ref())
            .map(|mesh| mesh.materials.iter().filter_map(|&slot| self.material(slot)).collect())
            .unwrap_or_default()
    }

    /// A mesh can be tinted when every slot resolves to a tintable material.
    pub fn is_tintable(&self, key: NodeKey) -> bool {
        let Some(mesh) = self.nodes.get(key).and_then(|node| node.mesh.as_ref()) else {
            return false;
        };
        !mesh.materials.is_empty()
            && mesh
                .materials
                .iter()
                .all(|&slot| self.material(slot).is_some_and(Material::is_tintable))
    }

    /// Clone the mesh's shared materials into the instance, once.
    ///
    /// Returns `true` if this call performed the clone.
    pub(crate) fn ensure_owned_materials(&mut self, key: NodeKey) -> bool {
        let Some(mesh) = self.nodes.get_mut(key).and_then(|node| node.mesh.as_mut()) else {
            return false;
        };
        if mesh.materials_cloned {
            return false;
        }
        for slot in mesh.materials.iter_mut() {
            if let MaterialSlot::Shared(index) = *slot {
                if let Some(source) = self.asset.materials.get(index) {
                    *slot = MaterialSlot::Owned(self.materials.insert(source.clone()));
                }
            }
        }
        mesh.materials_cloned = true;
        true
    }

    /// Record each slot's current color the first time the mesh is processed.
    pub(crate) fn capture_original_colors(&mut self, key: NodeKey) {
        let Some(mesh) = self.nodes.get(key).and_then(|node| node.mesh.as_ref()) else {
            return;
        };
        if mesh.original_colors.is_some() {
            return;
        }
        let colors: SmallVec<[Color; 1]> = mesh
            .materials
            .iter()
            .map(|&slot| self.material(slot).map(|m| m.color).unwrap_or_default())
            .collect();
        if let Some(mesh) = self.nodes.get_mut(key).and_then(|node| node.mesh.as_mut()) {
            mesh.original_colors = Some(colors);
        }
    }
}
