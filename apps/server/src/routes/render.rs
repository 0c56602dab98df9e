// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server-side material resolution.

use axum::{
    extract::{Path, State},
    Json,
};
use gunsmith_core::{PartTagStore, TagMap};
use gunsmith_scene::{Configurator, RenderMaterials};

use crate::error::ApiError;
use crate::types::RenderRequest;
use crate::AppState;

/// POST /api/v1/models/:id/render - Per-mesh material state.
///
/// Colors are validated before anything else runs. Classified part types
/// missing from `colors` get their default finish.
pub async fn render(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderMaterials>, ApiError> {
    let colors = request.color_selection()?;
    let asset = state.assets.get_or_load(&model_id, &state.store).await?;

    let store = (*state.store).clone();
    let selected = request.selected_part_type;
    let (materials, id) = tokio::task::spawn_blocking(move || {
        let tags = TagMap::from_tags(store.load(&model_id)?);
        let mut configurator = Configurator::new();
        configurator.set_asset(asset);
        configurator.set_tags(tags);
        configurator.set_colors(colors);
        let materials = configurator.select_part_type(selected.as_deref()).clone();
        Ok::<_, ApiError>((materials, model_id))
    })
    .await??;

    tracing::info!(
        model_id = %id,
        meshes = materials.len(),
        selected = materials.selected_count(),
        "Materials resolved"
    );
    Ok(Json(materials))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, json, send, upload_pistol};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn tints_and_highlights_by_part_type() {
        let (app, _dir) = app().await;
        let id = upload_pistol(&app).await;
        let body = json!({ "colors": { "slide": "#9A7D55" }, "selectedPartType": "slide" });
        let (status, out) = send(&app, json("POST", &format!("/api/v1/models/{id}/render"), body)).await;
        assert_eq!(status, StatusCode::OK);

        let slide = &out["Slide_Main_001"];
        assert_eq!(slide["baseColor"], "#9a7d55");
        assert_eq!(slide["isSelected"], true);
        assert_eq!(slide["emissive"], "#00ff00");

        let frame = &out["Frame_Main_001"];
        assert_eq!(frame["baseColor"], "#8a8a8a");
        assert_eq!(frame["isSelected"], false);
        assert_eq!(frame["emissiveIntensity"], 0.0);

        let unnamed = &out["Mesh_0"];
        assert_eq!(unnamed["partType"], "");
        assert_eq!(unnamed["tinted"], false);
    }

    #[tokio::test]
    async fn malformed_color_is_a_bad_request() {
        let (app, _dir) = app().await;
        let id = upload_pistol(&app).await;
        let body = json!({ "colors": { "slide": "2a2a2a" } });
        let (status, err) = send(&app, json("POST", &format!("/api/v1/models/{id}/render"), body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INVALID_COLOR");
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let (app, _dir) = app().await;
        let (status, _) = send(&app, json("POST", "/api/v1/models/abc/render", json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
