// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resolution and tinting.
//!
//! [`resolve_materials`] is a full recomputation pass over every mesh of an
//! instance. It never reads its own previous output: base colors come from
//! the current [`ColorSelection`] or the captured original color, and
//! selection emphasis is set or cleared from the current selection alone.
//!
//! One-time work per mesh, guarded by flags on [`MeshState`](crate::MeshState):
//!
//! - cloning the shared materials into the instance;
//! - capturing the pre-tint colors;
//! - removing base-color/alpha maps and vertex colors, on the first pass
//!   that actually applies a tint.

use gunsmith_core::{Classifications, Color, ColorSelection, PartType};
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

use crate::instance::{MaterialSlot, ModelInstance};
use crate::keys::NodeKey;

/// Emissive color layered on meshes of the selected part type.
pub const SELECTION_EMISSIVE: Color = Color::rgb(0.0, 1.0, 0.0);

/// Emissive intensity of the selection glow.
pub const SELECTION_INTENSITY: f32 = 1.0;

/// For materials without an emissive channel, how far the base color is
/// mixed toward [`SELECTION_EMISSIVE`] when selected.
pub const BASIC_HIGHLIGHT_MIX: f32 = 0.5;

/// Resolved render state of one mesh after a pass.
///
/// Colors describe the mesh's first material slot.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMaterialState {
    pub part_type: PartType,
    /// Tint or original color, before emphasis.
    pub base_color: Color,
    /// Color actually set on the material (differs from `base_color` only
    /// for selected meshes without an emissive channel).
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub is_selected: bool,
    /// A ColorSelection entry was applied.
    pub tinted: bool,
}

impl RenderMaterialState {
    pub fn has_emphasis(&self) -> bool {
        self.is_selected && (self.emissive_intensity > 0.0 || self.color != self.base_color)
    }
}

/// Per-mesh render states in mesh order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderMaterials {
    entries: Vec<(String, RenderMaterialState)>,
}

impl RenderMaterials {
    pub fn get(&self, mesh_id: &str) -> Option<&RenderMaterialState> {
        self.entries
            .iter()
            .find(|(id, _)| id == mesh_id)
            .map(|(_, state)| state)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderMaterialState)> {
        self.entries.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of meshes currently emphasized.
    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|(_, s)| s.is_selected).count()
    }
}

impl Serialize for RenderMaterials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, state) in &self.entries {
            map.serialize_entry(id, state)?;
        }
        map.end()
    }
}

/// Run one material pass over every mesh of `instance`.
///
/// `selected_part_type` of `None` or `""` clears all emphasis. Meshes whose
/// materials cannot be tinted are reported as-is and left untouched.
pub fn resolve_materials(
    instance: &mut ModelInstance,
    classifications: &Classifications,
    colors: &ColorSelection,
    selected_part_type: Option<&str>,
) -> RenderMaterials {
    let selected = selected_part_type.filter(|p| !p.is_empty());
    let meshes = instance.mesh_nodes();
    let mut entries = Vec::with_capacity(meshes.len());

    for key in meshes {
        let mesh_id = instance.nodes[key]
            .resolved_name()
            .unwrap_or_default()
            .to_string();
        let part_type = PartType::new(classifications.part_type(&mesh_id));

        let state = if instance.is_tintable(key) {
            let tint = colors.get(part_type.as_str());
            let is_selected = !part_type.is_unclassified() && selected == Some(part_type.as_str());
            apply(instance, key, part_type, tint, is_selected)
        } else {
            tracing::trace!(mesh = %mesh_id, "Material not tintable, left untouched");
            untouched(instance, key, part_type)
        };
        entries.push((mesh_id, state));
    }

    RenderMaterials { entries }
}

fn apply(
    instance: &mut ModelInstance,
    key: NodeKey,
    part_type: PartType,
    tint: Option<Color>,
    is_selected: bool,
) -> RenderMaterialState {
    instance.ensure_owned_materials(key);
    instance.capture_original_colors(key);

    let Some(mesh) = instance.nodes.get_mut(key).and_then(|node| node.mesh.as_mut()) else {
        return untouched(instance, key, part_type);
    };
    let strip = tint.is_some() && !mesh.color_maps_stripped;
    if strip {
        mesh.color_maps_stripped = true;
        mesh.vertex_colors = false;
    }
    let slots: SmallVec<[MaterialSlot; 1]> = mesh.materials.clone();
    let originals = mesh.original_colors.clone().unwrap_or_default();

    let mut first: Option<RenderMaterialState> = None;
    for (index, slot) in slots.into_iter().enumerate() {
        let MaterialSlot::Owned(material_key) = slot else {
            continue;
        };
        let Some(material) = instance.materials.get_mut(material_key) else {
            continue;
        };
        if strip {
            material.maps.strip_color_maps();
        }

        let base = tint.unwrap_or_else(|| originals.get(index).copied().unwrap_or(material.color));
        if material.supports_emissive() {
            material.color = base;
            if is_selected {
                material.emissive = SELECTION_EMISSIVE;
                material.emissive_intensity = SELECTION_INTENSITY;
            } else {
                material.emissive = Color::BLACK;
                material.emissive_intensity = 0.0;
            }
        } else {
            material.color = if is_selected {
                base.lerp(SELECTION_EMISSIVE, BASIC_HIGHLIGHT_MIX)
            } else {
                base
            };
        }

        if first.is_none() {
            first = Some(RenderMaterialState {
                part_type: part_type.clone(),
                base_color: base,
                color: material.color,
                emissive: material.emissive,
                emissive_intensity: material.emissive_intensity,
                is_selected,
                tinted: tint.is_some(),
            });
        }
    }

    first.unwrap_or_else(|| untouched(instance, key, part_type))
}

fn untouched(instance: &ModelInstance, key: NodeKey, part_type: PartType) -> RenderMaterialState {
    let material = instance.mesh_materials(key).into_iter().next();
    let color = material.map(|m| m.color).unwrap_or_default();
    RenderMaterialState {
        part_type,
        base_color: color,
        color,
        emissive: material.map(|m| m.emissive).unwrap_or(Color::BLACK),
        emissive_intensity: material.map(|m| m.emissive_intensity).unwrap_or(0.0),
        is_selected: false,
        tinted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ModelAsset;
    use crate::identity::resolve_mesh_identities;
    use crate::material::{Material, MaterialKind, TextureRef, TextureSlots};
    use gunsmith_core::{classify_meshes, TagMap};
    use std::sync::Arc;

    fn textured() -> Material {
        Material::standard(Color::from_u32(0x556677)).with_maps(TextureSlots {
            base_color: Some(TextureRef(0)),
            alpha: Some(TextureRef(1)),
            normal: Some(TextureRef(2)),
            ..TextureSlots::default()
        })
    }

    fn setup() -> (ModelInstance, Classifications) {
        let mut b = ModelAsset::builder();
        let metal = b.add_material(textured());
        let polymer = b.add_material(Material::standard(Color::from_u32(0x333333)));
        let flat = b.add_material(Material::basic(Color::from_u32(0x202020)));
        let exotic = b.add_material(Material::default().with_kind(MaterialKind::Other("toon".into())));
        let root = b.add_group(None, Some("pistol"));
        let slide = b.add_mesh(Some(root), Some("Slide_Main_001"), &[metal]);
        b.set_vertex_colors(slide, true);
        b.add_mesh(Some(root), Some("Frame_Main_001"), &[polymer]);
        b.add_mesh(Some(root), Some("Mag_Body"), &[flat]);
        b.add_mesh(Some(root), Some("Trigger_Shoe"), &[exotic]);
        b.add_mesh(Some(root), None, &[polymer]);

        let mut instance = ModelInstance::new(Arc::new(b.build()));
        let ids = resolve_mesh_identities(&mut instance);
        let classes = classify_meshes(&ids, &TagMap::default());
        (instance, classes)
    }

    fn palette() -> ColorSelection {
        ColorSelection::from_hex_map([("slide", "#ff0000"), ("frame", "#00ff00"), ("magazine", "#0000ff")])
            .unwrap()
    }

    #[test]
    fn tints_classified_meshes_only() {
        let (mut inst, classes) = setup();
        let out = resolve_materials(&mut inst, &classes, &palette(), None);

        let slide = out.get("Slide_Main_001").unwrap();
        assert!(slide.tinted);
        assert_eq!(slide.color.to_hex(), "#ff0000");

        let unnamed = out.get("Mesh_0").unwrap();
        assert_eq!(unnamed.part_type.as_str(), "");
        assert!(!unnamed.tinted);
        assert_eq!(unnamed.color, Color::from_u32(0x333333));
    }

    #[test]
    fn tinting_strips_color_maps_and_vertex_colors() {
        let (mut inst, classes) = setup();
        resolve_materials(&mut inst, &classes, &palette(), None);

        let key = inst.find_mesh("Slide_Main_001").unwrap();
        let mesh = inst.node(key).unwrap().mesh.as_ref().unwrap();
        assert!(mesh.color_maps_stripped);
        assert!(!mesh.vertex_colors);
        let material = inst.mesh_materials(key)[0];
        assert_eq!(material.maps.base_color, None);
        assert_eq!(material.maps.alpha, None);
        assert_eq!(material.maps.normal, Some(TextureRef(2)));

        // Shared asset still carries its textures.
        assert_eq!(inst.asset().material(0).unwrap().maps.base_color, Some(TextureRef(0)));
    }

    #[test]
    fn untinted_meshes_keep_textures() {
        let (mut inst, classes) = setup();
        resolve_materials(&mut inst, &classes, &ColorSelection::new(), None);
        let key = inst.find_mesh("Slide_Main_001").unwrap();
        assert_eq!(inst.mesh_materials(key)[0].maps.base_color, Some(TextureRef(0)));
        assert!(inst.node(key).unwrap().mesh.as_ref().unwrap().vertex_colors);
    }

    #[test]
    fn passes_are_idempotent() {
        let (mut inst, classes) = setup();
        let colors = palette();
        let first = resolve_materials(&mut inst, &classes, &colors, Some("slide"));
        let owned = inst.owned_material_count();
        let second = resolve_materials(&mut inst, &classes, &colors, Some("slide"));
        assert_eq!(first, second);
        assert_eq!(inst.owned_material_count(), owned);
    }

    #[test]
    fn selection_is_exclusive() {
        let (mut inst, classes) = setup();
        let out = resolve_materials(&mut inst, &classes, &palette(), Some("slide"));
        for (id, state) in out.iter() {
            if id == "Slide_Main_001" {
                assert!(state.is_selected);
                assert_eq!(state.emissive, SELECTION_EMISSIVE);
                assert_eq!(state.emissive_intensity, SELECTION_INTENSITY);
            } else {
                assert!(!state.has_emphasis(), "{id} should not be emphasized");
                assert_eq!(state.emissive_intensity, 0.0);
            }
        }
        assert_eq!(out.selected_count(), 1);
    }

    #[test]
    fn deselection_restores_plain_state() {
        let (mut inst, classes) = setup();
        let colors = palette();
        let plain = resolve_materials(&mut inst, &classes, &colors, None);
        resolve_materials(&mut inst, &classes, &colors, Some("magazine"));
        let restored = resolve_materials(&mut inst, &classes, &colors, None);
        assert_eq!(plain, restored);
    }

    #[test]
    fn basic_materials_highlight_by_color() {
        let (mut inst, classes) = setup();
        let out = resolve_materials(&mut inst, &classes, &palette(), Some("magazine"));
        let mag = out.get("Mag_Body").unwrap();
        assert!(mag.is_selected);
        assert_eq!(mag.emissive_intensity, 0.0);
        assert_ne!(mag.color, mag.base_color);
        assert!(mag.has_emphasis());
    }

    #[test]
    fn removed_tint_falls_back_to_original() {
        let (mut inst, classes) = setup();
        resolve_materials(&mut inst, &classes, &palette(), None);
        let out = resolve_materials(&mut inst, &classes, &ColorSelection::new(), None);
        assert_eq!(out.get("Frame_Main_001").unwrap().color, Color::from_u32(0x333333));
    }

    #[test]
    fn untintable_materials_are_left_alone() {
        let (mut inst, classes) = setup();
        let mut colors = palette();
        colors.set(PartType::new("trigger"), Color::from_u32(0xffffff));
        let out = resolve_materials(&mut inst, &classes, &colors, Some("trigger"));
        let trigger = out.get("Trigger_Shoe").unwrap();
        assert!(!trigger.tinted);
        assert!(!trigger.is_selected);
        let key = inst.find_mesh("Trigger_Shoe").unwrap();
        assert!(!inst.node(key).unwrap().mesh.as_ref().unwrap().materials_cloned);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let (mut inst, classes) = setup();
        let out = resolve_materials(&mut inst, &classes, &palette(), None);
        let json = serde_json::to_value(&out).unwrap();
        let slide = &json["Slide_Main_001"];
        assert_eq!(slide["partType"], "slide");
        assert_eq!(slide["baseColor"], "#ff0000");
        assert_eq!(slide["isSelected"], false);
    }
}
