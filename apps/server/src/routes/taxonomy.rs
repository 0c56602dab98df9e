// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part taxonomy endpoints.

use axum::{
    extract::{Path, Query},
    Json,
};
use gunsmith_core::taxonomy::{self, FilteredCategory};
use serde::Serialize;

use crate::types::TaxonomyQuery;

/// One part type resolved against the taxonomy.
#[derive(Debug, Serialize)]
pub struct PartTypeInfo {
    pub value: String,
    pub label: String,
    pub category: Option<&'static str>,
    pub known: bool,
}

/// GET /api/v1/taxonomy - Categories, optionally filtered by `q`.
pub async fn list(Query(query): Query<TaxonomyQuery>) -> Json<Vec<FilteredCategory>> {
    let q = query.q.unwrap_or_default();
    let categories = taxonomy::search(&q);
    tracing::debug!(query = %q, categories = categories.len(), "Taxonomy listing");
    Json(categories)
}

/// GET /api/v1/taxonomy/:part_type - Label and category; unknown values echo back.
pub async fn lookup(Path(part_type): Path<String>) -> Json<PartTypeInfo> {
    Json(PartTypeInfo {
        label: taxonomy::label_for(&part_type).to_string(),
        category: taxonomy::category_for(&part_type),
        known: taxonomy::is_known(&part_type),
        value: part_type,
    })
}
