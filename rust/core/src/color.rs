// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colors and per-part color selections.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::part::PartType;

/// An sRGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let packed = match digits.len() {
            3 => {
                let short = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                (r * 17) << 16 | (g * 17) << 8 | (b * 17)
            }
            6 => u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };
        Ok(Self::from_u32(packed))
    }

    /// Convert a linear-light color (as stored in glTF material factors) to sRGB.
    pub fn from_linear(r: f32, g: f32, b: f32) -> Self {
        fn encode(c: f32) -> f32 {
            let c = c.clamp(0.0, 1.0);
            if c <= 0.003_130_8 {
                c * 12.92
            } else {
                1.055 * c.powf(1.0 / 2.4) - 0.055
            }
        }
        Self::rgb(encode(r), encode(g), encode(b))
    }

    /// Packed `0xRRGGBB`, rounding each channel.
    pub fn to_u32(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        q(self.r) << 16 | q(self.g) << 8 | q(self.b)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.to_u32())
    }

    /// Linear interpolation towards `other` (`t` clamped to `0..=1`).
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn is_black(self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Color::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Default finish used for part types without a dedicated default.
pub const FALLBACK_FINISH: Color = Color::rgb(119.0 / 255.0, 119.0 / 255.0, 119.0 / 255.0);

/// Default finish for the coarse part types the customer view starts with.
pub fn default_finish(part_type: &str) -> Color {
    match part_type {
        "frame" => Color::from_u32(0x8a8a8a),
        "slide" => Color::from_u32(0x2a2a2a),
        "trigger" => Color::from_u32(0x444444),
        "magazine" => Color::from_u32(0x222222),
        _ => FALLBACK_FINISH,
    }
}

/// Mapping from part type to the finish color chosen for it.
///
/// Unclassified part types never get an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSelection {
    colors: rustc_hash::FxHashMap<PartType, Color>,
}

impl ColorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a selection for the given part types with their default finishes.
    pub fn seeded<'a, I>(part_types: I) -> Self
    where
        I: IntoIterator<Item = &'a PartType>,
    {
        let mut selection = Self::new();
        for part_type in part_types {
            if !part_type.is_unclassified() {
                selection
                    .colors
                    .insert(part_type.clone(), default_finish(part_type.as_str()));
            }
        }
        selection
    }

    /// Build from raw hex strings, rejecting the first malformed value.
    pub fn from_hex_map<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut selection = Self::new();
        for (part_type, hex) in entries {
            selection.set(PartType::new(part_type), Color::from_hex(hex)?);
        }
        Ok(selection)
    }

    /// Assign a color. Returns `false` (and ignores the call) for the unclassified sentinel.
    pub fn set(&mut self, part_type: PartType, color: Color) -> bool {
        if part_type.is_unclassified() {
            return false;
        }
        self.colors.insert(part_type, color);
        true
    }

    pub fn get(&self, part_type: &str) -> Option<Color> {
        if part_type.is_empty() {
            return None;
        }
        self.colors.get(part_type).copied()
    }

    pub fn remove(&mut self, part_type: &str) -> Option<Color> {
        self.colors.remove(part_type)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartType, &Color)> {
        self.colors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_long_and_short_hex() {
        let c = Color::from_hex("#FF8000").unwrap();
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 128.0 / 255.0);
        assert_relative_eq!(c.b, 0.0);

        assert_eq!(Color::from_hex("#fa0").unwrap(), Color::from_hex("#ffaa00").unwrap());
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "ff0000", "#ff00", "#gg0000", "#ff00000", "# ff000"] {
            assert_eq!(
                Color::from_hex(bad),
                Err(Error::InvalidColor(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn hex_output_is_lowercase_and_stable() {
        assert_eq!(Color::from_hex("#9A7D55").unwrap().to_hex(), "#9a7d55");
        assert_eq!(Color::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_relative_eq!(mid.r, 0.5);
        assert_relative_eq!(mid.g, 0.5);
        assert_relative_eq!(mid.b, 0.5);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 4.0), Color::WHITE);
    }

    #[test]
    fn linear_to_srgb() {
        let c = Color::from_linear(0.0, 1.0, 0.214_041);
        assert_relative_eq!(c.r, 0.0);
        assert_relative_eq!(c.g, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.b, 0.5, epsilon = 1e-3);
    }

    #[test]
    fn seeded_selection_uses_defaults() {
        let types = [
            PartType::new("slide"),
            PartType::new("frame"),
            PartType::new("barrel_main"),
            PartType::unclassified(),
        ];
        let selection = ColorSelection::seeded(&types);
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.get("slide").unwrap().to_hex(), "#2a2a2a");
        assert_eq!(selection.get("frame").unwrap().to_hex(), "#8a8a8a");
        assert_eq!(selection.get("barrel_main").unwrap().to_hex(), "#777777");
        assert_eq!(selection.get(""), None);
    }

    #[test]
    fn unclassified_is_never_colored() {
        let mut selection = ColorSelection::new();
        assert!(!selection.set(PartType::unclassified(), Color::WHITE));
        assert!(selection.is_empty());
    }

    #[test]
    fn from_hex_map_rejects_bad_entry() {
        let err = ColorSelection::from_hex_map([("slide", "#111111"), ("frame", "red")]);
        assert_eq!(err, Err(Error::InvalidColor("red".into())));
    }

    #[test]
    fn selection_serializes_as_hex_map() {
        let selection = ColorSelection::from_hex_map([("trigger", "#ABCDEF")]).unwrap();
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r##"{"trigger":"#abcdef"}"##);
        let back: ColorSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
