// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog, price quote and saved build endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use gunsmith_core::pricing::{self, BuildConfig, PriceQuote, CATALOG, FINISH_PALETTE};

use crate::error::ApiError;
use crate::routes::unix_now;
use crate::services::ModelStore;
use crate::types::{CatalogResponse, SavedConfig};
use crate::AppState;

/// GET /api/v1/catalog - Firearms and finish palette.
pub async fn catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        firearms: CATALOG,
        finishes: FINISH_PALETTE,
    })
}

/// POST /api/v1/price - Quote a build.
pub async fn price(Json(build): Json<BuildConfig>) -> Result<Json<PriceQuote>, ApiError> {
    let quote = pricing::quote(&build)?;
    tracing::debug!(
        firearm_id = %build.firearm_id,
        finishes = build.finishes.len(),
        total = quote.total,
        "Quoted build"
    );
    Ok(Json(quote))
}

/// POST /api/v1/configs - Save a build after validating its finishes.
pub async fn save_config(
    State(state): State<AppState>,
    Json(build): Json<BuildConfig>,
) -> Result<(StatusCode, Json<SavedConfig>), ApiError> {
    pricing::quote(&build)?;

    let created = unix_now()?;
    let mut seed = serde_json::to_vec(&build)?;
    seed.extend_from_slice(&created.as_nanos().to_le_bytes());
    let id = format!("cfg_{}", &ModelStore::generate_key(&seed)[..6]);

    let saved = SavedConfig {
        id,
        build,
        created_at: created.as_secs(),
    };
    state.store.put_config(&saved.id, &saved).await?;
    tracing::info!(config_id = %saved.id, firearm_id = %saved.build.firearm_id, "Build saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/configs/:id - Retrieve a saved build.
pub async fn get_config(
    State(state): State<AppState>,
    Path(config_id): Path<String>,
) -> Result<Json<SavedConfig>, ApiError> {
    state
        .store
        .get_config::<SavedConfig>(&config_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Config not found: {}", config_id)))
}

#[cfg(test)]
mod tests {
    use crate::routes::testing::{app, get, json, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn quotes_palette_and_custom_finishes() {
        let (app, _dir) = app().await;
        let build = json!({
            "firearmId": "mvp-01",
            "parts": { "sights": "sight_iron" },
            "finishes": { "slide": "#2a2a2a", "frame": "#123456", "mag_catch": "#9A7D55" }
        });
        let (status, quote) = send(&app, json("POST", "/api/v1/price", build)).await;
        assert_eq!(status, StatusCode::OK);
        // 300 + 50 + (120 + 90) + (120 + 110) + (130 + 40)
        assert_eq!(quote["total"], 960);
        assert_eq!(quote["breakdown"]["partsSum"], 50);
        assert_eq!(quote["breakdown"]["finishBreakdown"]["frame"]["matPrice"], 120);
        assert_eq!(quote["currency"], "USD");
        assert_eq!(quote["etaDays"], 12);
    }

    #[tokio::test]
    async fn bad_hex_is_rejected() {
        let (app, _dir) = app().await;
        let build = json!({ "firearmId": "mvp-01", "finishes": { "slide": "#12345" } });
        let (status, err) = send(&app, json("POST", "/api/v1/price", build)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "INVALID_COLOR");
    }

    #[tokio::test]
    async fn catalog_lists_palette() {
        let (app, _dir) = app().await;
        let (_, body) = send(&app, get("/api/v1/catalog")).await;
        assert_eq!(body["firearms"][0]["id"], "mvp-01");
        assert_eq!(body["firearms"][0]["partGroups"].as_array().unwrap().len(), 3);
        assert_eq!(body["finishes"][2]["id"], "H-267");
    }

    #[tokio::test]
    async fn saved_configs_round_trip() {
        let (app, _dir) = app().await;
        let build = json!({ "firearmId": "mvp-01", "parts": {}, "finishes": { "slide": "#fff" } });
        let (status, saved) = send(&app, json("POST", "/api/v1/configs", build)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = saved["id"].as_str().unwrap();
        assert!(id.starts_with("cfg_"));
        assert_eq!(saved["firearmId"], "mvp-01");

        let (status, loaded) = send(&app, get(&format!("/api/v1/configs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loaded, saved);

        let (status, _) = send(&app, get("/api/v1/configs/cfg_none")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
