// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use gunsmith_core::pricing::{BuildConfig, CatalogFirearm, Finish};
use gunsmith_core::{Classifications, PartTag};
use serde::{Deserialize, Serialize};

/// Uploaded (or re-opened) model: its mesh ids and their classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub model_id: String,
    pub meshes: Vec<String>,
    pub classifications: Classifications,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ModelRecord>,
}

/// Library metadata of an uploaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    pub size: usize,
    pub mesh_count: usize,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

/// One row of the model library listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub record: ModelRecord,
    pub tagged_parts: usize,
}

/// Persisted part tags of a model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartsResponse {
    pub model_id: String,
    pub parts: Vec<PartTag>,
}

/// Firearms and finish palette on offer.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub firearms: &'static [CatalogFirearm],
    pub finishes: &'static [Finish],
}

/// A stored customer build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConfig {
    pub id: String,
    #[serde(flatten)]
    pub build: BuildConfig,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}
