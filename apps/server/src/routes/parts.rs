// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part tag persistence endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use gunsmith_core::{persistable, PartTagStore, TagMap};

use crate::error::ApiError;
use crate::types::{PartsRequest, PartsResponse};
use crate::AppState;

async fn require_model(state: &AppState, model_id: &str) -> Result<(), ApiError> {
    if state.store.has_model(model_id).await {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Model not found: {}", model_id)))
    }
}

/// GET /api/v1/models/:id/parts - Persisted tags, empty when none were saved.
pub async fn get_parts(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<PartsResponse>, ApiError> {
    require_model(&state, &model_id).await?;

    let store = (*state.store).clone();
    let response = tokio::task::spawn_blocking(move || {
        let parts = store.load(&model_id)?;
        Ok::<_, ApiError>(PartsResponse { model_id, parts })
    })
    .await??;
    Ok(Json(response))
}

/// PUT /api/v1/models/:id/parts - Replace the model's whole tag set.
///
/// Unclassified entries are dropped; a later entry for the same mesh
/// replaces an earlier one; any part type outside the taxonomy rejects the
/// whole request.
pub async fn put_parts(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    Json(request): Json<PartsRequest>,
) -> Result<Json<PartsResponse>, ApiError> {
    require_model(&state, &model_id).await?;

    let received = request.parts.len();
    let mut store = (*state.store).clone();
    let response = tokio::task::spawn_blocking(move || {
        let tags = TagMap::from_tags(request.parts);
        let parts = persistable(tags.iter())?;
        store.save(&model_id, &parts)?;
        Ok::<_, ApiError>(PartsResponse { model_id, parts })
    })
    .await??;

    tracing::info!(
        model_id = %response.model_id,
        received,
        saved = response.parts.len(),
        "Part tags saved"
    );
    Ok(Json(response))
}
