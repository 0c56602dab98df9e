// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! glTF / GLB model loading.
//!
//! Only the scene graph and materials are read; geometry buffers are never
//! decoded, so `.gltf` files with external buffers load without them.

use gltf::mesh::Semantic;
use gltf::Gltf;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::asset::{ModelAsset, ModelAssetBuilder};
use crate::error::{Error, Result};
use crate::material::{Material, MaterialKind, TextureRef, TextureSlots};
use gunsmith_core::Color;

/// Parse a binary GLB or JSON glTF document into a [`ModelAsset`].
///
/// Uses the default scene, or the first scene when none is marked default.
/// Nothing is returned on failure.
pub fn load_model(bytes: &[u8]) -> Result<ModelAsset> {
    let gltf = Gltf::from_slice(bytes)?;
    let document = &gltf.document;
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(Error::NoScene)?;

    let mut builder = ModelAsset::builder();
    let mut materials: FxHashMap<Option<usize>, usize> = FxHashMap::default();
    for node in scene.nodes() {
        add_node(&mut builder, &mut materials, None, &node);
    }
    let asset = builder.build();

    tracing::info!(
        scene = scene.index(),
        nodes = asset.nodes().len(),
        meshes = asset.mesh_count(),
        materials = asset.materials().len(),
        "Loaded model asset"
    );
    Ok(asset)
}

/// Alias of [`load_model`]; the format is detected from the bytes.
pub fn load_glb(bytes: &[u8]) -> Result<ModelAsset> {
    load_model(bytes)
}

fn add_node(
    builder: &mut ModelAssetBuilder,
    materials: &mut FxHashMap<Option<usize>, usize>,
    parent: Option<usize>,
    node: &gltf::Node<'_>,
) {
    let index = match node.mesh() {
        Some(mesh) => {
            let name = node.name().or_else(|| mesh.name());
            let mut slots: SmallVec<[usize; 1]> = SmallVec::new();
            let mut vertex_colors = false;
            for primitive in mesh.primitives() {
                let material = primitive.material();
                let slot = *materials
                    .entry(material.index())
                    .or_insert_with(|| builder.add_material(convert_material(&material)));
                slots.push(slot);
                vertex_colors |= primitive.get(&Semantic::Colors(0)).is_some();
            }
            let index = builder.add_mesh(parent, name, &slots);
            builder.set_vertex_colors(index, vertex_colors);
            index
        }
        None => builder.add_group(parent, node.name()),
    };

    for child in node.children() {
        add_node(builder, materials, Some(index), &child);
    }
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let [er, eg, eb] = material.emissive_factor();
    let emissive = Color::from_linear(er, eg, eb);

    let maps = TextureSlots {
        base_color: pbr.base_color_texture().map(|info| TextureRef(info.texture().index())),
        alpha: None,
        normal: material
            .normal_texture()
            .map(|normal| TextureRef(normal.texture().index())),
        metallic_roughness: pbr
            .metallic_roughness_texture()
            .map(|info| TextureRef(info.texture().index())),
        occlusion: material
            .occlusion_texture()
            .map(|occlusion| TextureRef(occlusion.texture().index())),
        emissive: material
            .emissive_texture()
            .map(|info| TextureRef(info.texture().index())),
    };

    Material {
        name: material.name().map(str::to_string),
        kind: if material.unlit() {
            MaterialKind::Basic
        } else {
            MaterialKind::Standard
        },
        color: Color::from_linear(r, g, b),
        opacity: a,
        emissive,
        emissive_intensity: if emissive.is_black() { 0.0 } else { 1.0 },
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        maps,
    }
}
