// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Immutable model assets.
//!
//! A [`ModelAsset`] is what a loader produces and what gets cached and
//! shared (behind an `Arc`) between every viewer that opens the same
//! model. Nothing in this crate mutates an asset after it is built; all
//! per-viewer state lives in [`ModelInstance`](crate::ModelInstance).

use smallvec::SmallVec;

use crate::material::Material;

/// Renderable part of a node: its material slots and geometry flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetMesh {
    /// One material index per primitive, into [`ModelAsset::materials`].
    pub materials: SmallVec<[usize; 1]>,
    /// Geometry carries a per-vertex color attribute.
    pub vertex_colors: bool,
}

/// A scene-graph node of the source asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetNode {
    pub name: Option<String>,
    pub children: Vec<usize>,
    pub mesh: Option<AssetMesh>,
}

/// A fully loaded model: node tree in document order plus its materials.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelAsset {
    pub(crate) nodes: Vec<AssetNode>,
    pub(crate) roots: Vec<usize>,
    pub(crate) materials: Vec<Material>,
}

impl ModelAsset {
    pub fn builder() -> ModelAssetBuilder {
        ModelAssetBuilder::default()
    }

    pub fn nodes(&self) -> &[AssetNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.mesh.is_some()).count()
    }
}

/// Incremental construction of a [`ModelAsset`].
///
/// Used by the glTF loader and by tests. A `parent` that does not name an
/// existing node makes the new node a root.
#[derive(Debug, Default)]
pub struct ModelAssetBuilder {
    asset: ModelAsset,
}

impl ModelAssetBuilder {
    pub fn add_material(&mut self, material: Material) -> usize {
        self.asset.materials.push(material);
        self.asset.materials.len() - 1
    }

    /// Add a non-renderable grouping node.
    pub fn add_group(&mut self, parent: Option<usize>, name: Option<&str>) -> usize {
        self.push_node(
            parent,
            AssetNode {
                name: name.map(str::to_string),
                children: Vec::new(),
                mesh: None,
            },
        )
    }

    /// Add a mesh node using the given material indices (one per primitive).
    pub fn add_mesh(&mut self, parent: Option<usize>, name: Option<&str>, materials: &[usize]) -> usize {
        self.push_node(
            parent,
            AssetNode {
                name: name.map(str::to_string),
                children: Vec::new(),
                mesh: Some(AssetMesh {
                    materials: materials.iter().copied().collect(),
                    vertex_colors: false,
                }),
            },
        )
    }

    /// Mark a mesh node's geometry as carrying vertex colors.
    pub fn set_vertex_colors(&mut self, node: usize, vertex_colors: bool) -> &mut Self {
        if let Some(mesh) = self.asset.nodes.get_mut(node).and_then(|n| n.mesh.as_mut()) {
            mesh.vertex_colors = vertex_colors;
        }
        self
    }

    pub fn build(self) -> ModelAsset {
        self.asset
    }

    fn push_node(&mut self, parent: Option<usize>, node: AssetNode) -> usize {
        let index = self.asset.nodes.len();
        self.asset.nodes.push(node);
        match parent.and_then(|p| self.asset.nodes.get_mut(p)) {
            Some(parent_node) if parent != Some(index) => parent_node.children.push(index),
            _ => self.asset.roots.push(index),
        }
        index
    }
}
