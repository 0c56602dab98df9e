// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use std::collections::BTreeMap;

use gunsmith_core::{ColorSelection, PartTag};
use serde::Deserialize;

/// Query string of the taxonomy listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxonomyQuery {
    /// Case-insensitive label filter.
    #[serde(default)]
    pub q: Option<String>,
}

/// Body of `PUT /api/v1/models/:id/parts`.
#[derive(Debug, Clone, Deserialize)]
pub struct PartsRequest {
    pub parts: Vec<PartTag>,
}

/// Body of `POST /api/v1/models/:id/render`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Part type -> `#rgb` / `#rrggbb`. Missing classified part types get
    /// their default finish.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub selected_part_type: Option<String>,
}

impl RenderRequest {
    /// Validate every color; the first malformed value is the error.
    pub fn color_selection(&self) -> gunsmith_core::Result<ColorSelection> {
        ColorSelection::from_hex_map(self.colors.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
