// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configurator pipeline driver.
//!
//! Owns one model instance plus the inputs of the material pass and reruns
//! the whole pipeline (identities, classification, materials) whenever an
//! input changes. A failed load leaves everything as it was.

use std::sync::Arc;

use gunsmith_core::color::default_finish;
use gunsmith_core::{classify_meshes, Classifications, Color, ColorSelection, PartType, TagMap};

use crate::asset::ModelAsset;
use crate::error::{Error, Result};
use crate::identity::resolve_mesh_identities;
use crate::instance::ModelInstance;
use crate::loader::load_model;
use crate::tint::{resolve_materials, RenderMaterials};

#[derive(Debug, Default)]
pub struct Configurator {
    instance: Option<ModelInstance>,
    mesh_ids: Vec<String>,
    tags: TagMap,
    classifications: Classifications,
    colors: ColorSelection,
    selected: Option<PartType>,
    render: RenderMaterials,
}

impl Configurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and install a model. On error the previous model and its
    /// render output are kept.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<&RenderMaterials> {
        match load_model(bytes) {
            Ok(asset) => Ok(self.set_asset(Arc::new(asset))),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    has_model = self.instance.is_some(),
                    "Model load failed, keeping previous state"
                );
                Err(err)
            }
        }
    }

    /// Install an already loaded (possibly shared) asset.
    ///
    /// Admin tags and the part-type selection belong to the previous model
    /// and are cleared; install the new model's tags with [`set_tags`].
    /// Color picks are keyed by part type and carry over.
    ///
    /// [`set_tags`]: Configurator::set_tags
    pub fn set_asset(&mut self, asset: Arc<ModelAsset>) -> &RenderMaterials {
        let mut instance = ModelInstance::new(asset);
        self.mesh_ids = resolve_mesh_identities(&mut instance);
        self.instance = Some(instance);
        self.tags = TagMap::new();
        self.selected = None;
        self.reclassify();
        self.recompute()
    }

    /// Replace the admin tags for the current model.
    pub fn set_tags(&mut self, tags: TagMap) -> &RenderMaterials {
        self.tags = tags;
        self.reclassify();
        self.recompute()
    }

    /// Set one part type's finish. Ignored for the unclassified type.
    pub fn set_color(&mut self, part_type: impl Into<PartType>, color: Color) -> &RenderMaterials {
        self.colors.set(part_type.into(), color);
        self.recompute()
    }

    /// Replace the whole color selection, then fill in defaults for any
    /// classified part type it does not cover.
    pub fn set_colors(&mut self, colors: ColorSelection) -> &RenderMaterials {
        self.colors = colors;
        self.seed_missing_colors();
        self.recompute()
    }

    /// Emphasize every mesh of `part_type`; `None` or `""` clears emphasis.
    pub fn select_part_type(&mut self, part_type: Option<&str>) -> &RenderMaterials {
        self.selected = part_type.filter(|p| !p.is_empty()).map(PartType::new);
        self.recompute()
    }

    /// Emphasize the part type of one mesh.
    pub fn select_mesh(&mut self, mesh_id: &str) -> Result<&RenderMaterials> {
        if !self.mesh_ids.iter().any(|id| id == mesh_id) {
            return Err(Error::MeshNotFound(mesh_id.to_string()));
        }
        let part_type = self.classifications.part_type(mesh_id).to_string();
        Ok(self.select_part_type(Some(&part_type)))
    }

    pub fn instance(&self) -> Option<&ModelInstance> {
        self.instance.as_ref()
    }

    pub fn mesh_ids(&self) -> &[String] {
        &self.mesh_ids
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    pub fn colors(&self) -> &ColorSelection {
        &self.colors
    }

    pub fn selected_part_type(&self) -> Option<&PartType> {
        self.selected.as_ref()
    }

    pub fn render_materials(&self) -> &RenderMaterials {
        &self.render
    }

    fn reclassify(&mut self) {
        self.classifications = classify_meshes(&self.mesh_ids, &self.tags);
        self.seed_missing_colors();
    }

    fn seed_missing_colors(&mut self) {
        for part_type in self.classifications.part_types() {
            if self.colors.get(part_type.as_str()).is_none() {
                let finish = default_finish(part_type.as_str());
                self.colors.set(part_type, finish);
            }
        }
    }

    fn recompute(&mut self) -> &RenderMaterials {
        if let Some(instance) = self.instance.as_mut() {
            self.render = resolve_materials(
                instance,
                &self.classifications,
                &self.colors,
                self.selected.as_ref().map(PartType::as_str),
            );
            tracing::debug!(
                meshes = self.render.len(),
                selected = self.render.selected_count(),
                "Material pass complete"
            );
        }
        &self.render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use gunsmith_core::PartTag;

    fn asset() -> Arc<ModelAsset> {
        let mut b = ModelAsset::builder();
        let m = b.add_material(Material::standard(Color::from_u32(0x999999)));
        b.add_mesh(None, Some("Slide_Main_001"), &[m]);
        b.add_mesh(None, Some("Frame_Main_001"), &[m]);
        b.add_mesh(None, None, &[m]);
        Arc::new(b.build())
    }

    #[test]
    fn seeds_default_finishes_for_classified_parts() {
        let mut cfg = Configurator::new();
        let out = cfg.set_asset(asset());
        assert_eq!(out.get("Slide_Main_001").unwrap().color.to_hex(), "#2a2a2a");
        assert_eq!(out.get("Frame_Main_001").unwrap().color.to_hex(), "#8a8a8a");
        assert!(!out.get("Mesh_0").unwrap().tinted);
        assert_eq!(cfg.colors().len(), 2);
    }

    #[test]
    fn user_colors_survive_reclassification() {
        let mut cfg = Configurator::new();
        cfg.set_asset(asset());
        cfg.set_color("slide", Color::from_u32(0x9a7d55));
        let tags = TagMap::from_tags([PartTag {
            mesh_name: "Mesh_0".into(),
            part_type: PartType::new("magazine"),
            display_name: "Magazine".into(),
            customizable: true,
        }]);
        let out = cfg.set_tags(tags);
        assert_eq!(out.get("Slide_Main_001").unwrap().color.to_hex(), "#9a7d55");
        assert_eq!(out.get("Mesh_0").unwrap().color.to_hex(), "#222222");
    }

    #[test]
    fn failed_load_keeps_previous_model() {
        let mut cfg = Configurator::new();
        cfg.set_asset(asset());
        cfg.select_part_type(Some("frame"));
        let before = cfg.render_materials().clone();

        assert!(cfg.load_bytes(b"\x00\x01 definitely not gltf").is_err());
        assert_eq!(cfg.render_materials(), &before);
        assert_eq!(cfg.mesh_ids().len(), 3);
    }

    #[test]
    fn failed_first_load_leaves_nothing() {
        let mut cfg = Configurator::new();
        assert!(cfg.load_bytes(b"{}").is_err());
        assert!(cfg.instance().is_none());
        assert!(cfg.render_materials().is_empty());
    }

    #[test]
    fn select_mesh_selects_its_part_type() {
        let mut cfg = Configurator::new();
        cfg.set_asset(asset());
        let out = cfg.select_mesh("Frame_Main_001").unwrap();
        assert!(out.get("Frame_Main_001").unwrap().is_selected);
        assert!(!out.get("Slide_Main_001").unwrap().is_selected);
        assert!(matches!(cfg.select_mesh("nope"), Err(Error::MeshNotFound(_))));
    }

    #[test]
    fn new_model_does_not_inherit_tags_or_selection() {
        let mut cfg = Configurator::new();
        let mut a = ModelAsset::builder();
        let m = a.add_material(Material::standard(Color::from_u32(0x999999)));
        a.add_mesh(None, Some("Body"), &[m]);
        cfg.set_asset(Arc::new(a.build()));
        cfg.set_tags(TagMap::from_tags([PartTag {
            mesh_name: "Body".into(),
            part_type: PartType::new("bolt"),
            display_name: "Bolt".into(),
            customizable: true,
        }]));
        cfg.select_part_type(Some("bolt"));
        assert!(cfg.render_materials().get("Body").unwrap().is_selected);

        let mut b = ModelAsset::builder();
        let m = b.add_material(Material::standard(Color::from_u32(0x999999)));
        b.add_mesh(None, Some("Body"), &[m]);
        let out = cfg.set_asset(Arc::new(b.build())).clone();

        let body = out.get("Body").unwrap();
        assert!(body.part_type.is_unclassified());
        assert!(!body.is_selected);
        assert!(!body.tinted);
        assert!(cfg.tags().is_empty());
        assert!(cfg.selected_part_type().is_none());
    }

    #[test]
    fn selecting_unclassified_emphasizes_nothing() {
        let mut cfg = Configurator::new();
        cfg.set_asset(asset());
        let out = cfg.select_mesh("Mesh_0").unwrap();
        assert_eq!(out.selected_count(), 0);
        assert!(cfg.selected_part_type().is_none());
    }
}
