// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface materials as seen by the tinting engine.

use gunsmith_core::Color;
use serde::Serialize;

/// Index of a texture in the source asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureRef(pub usize);

/// Shading model of a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Metallic-roughness PBR; supports emissive.
    Standard,
    /// Blinn-Phong; supports emissive.
    Phong,
    /// Unlit flat color; no emissive channel.
    Basic,
    /// Anything the engine does not know how to tint.
    Other(String),
}

/// Texture maps attached to a material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextureSlots {
    pub base_color: Option<TextureRef>,
    pub alpha: Option<TextureRef>,
    pub normal: Option<TextureRef>,
    pub metallic_roughness: Option<TextureRef>,
    pub occlusion: Option<TextureRef>,
    pub emissive: Option<TextureRef>,
}

impl TextureSlots {
    /// Drop the maps that override a flat color (base color and alpha),
    /// keeping surface-detail maps. Returns whether anything was removed.
    pub fn strip_color_maps(&mut self) -> bool {
        let had_any = self.base_color.is_some() || self.alpha.is_some();
        self.base_color = None;
        self.alpha = None;
        had_any
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: Option<String>,
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub maps: TextureSlots,
}

impl Material {
    pub fn standard(color: Color) -> Self {
        Self {
            name: None,
            kind: MaterialKind::Standard,
            color,
            opacity: 1.0,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            metalness: 1.0,
            roughness: 1.0,
            maps: TextureSlots::default(),
        }
    }

    pub fn basic(color: Color) -> Self {
        Self {
            kind: MaterialKind::Basic,
            metalness: 0.0,
            ..Self::standard(color)
        }
    }

    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_maps(mut self, maps: TextureSlots) -> Self {
        self.maps = maps;
        self
    }

    pub fn supports_emissive(&self) -> bool {
        matches!(self.kind, MaterialKind::Standard | MaterialKind::Phong)
    }

    pub fn is_tintable(&self) -> bool {
        !matches!(self.kind, MaterialKind::Other(_))
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Color::WHITE)
    }
}
