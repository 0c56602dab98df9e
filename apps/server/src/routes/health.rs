// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check and API information endpoints.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const fn endpoint(method: &'static str, path: &'static str, description: &'static str) -> EndpointInfo {
    EndpointInfo {
        method,
        path,
        description,
    }
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "gunsmith-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "gunsmith-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Firearm configurator: part tagging, material tinting and quotes",
        endpoints: vec![
            endpoint("GET", "/api/v1/health", "Health check endpoint"),
            endpoint("GET", "/api/v1/taxonomy", "Part type categories (?q= filters labels)"),
            endpoint("GET", "/api/v1/taxonomy/:part_type", "Label and category of one part type"),
            endpoint("GET", "/api/v1/models", "Model library with tagged part counts"),
            endpoint("POST", "/api/v1/models", "Upload a glTF/GLB model (multipart field 'file', optional name, sku, basePrice, description)"),
            endpoint("GET", "/api/v1/models/:id", "Mesh ids and classifications of a model"),
            endpoint("DELETE", "/api/v1/models/:id", "Remove a model and its part tags"),
            endpoint("GET", "/api/v1/models/:id/parts", "Persisted part tags"),
            endpoint("PUT", "/api/v1/models/:id/parts", "Replace persisted part tags"),
            endpoint("POST", "/api/v1/models/:id/render", "Per-mesh material state for colors and selection"),
            endpoint("GET", "/api/v1/catalog", "Firearms and finish palette"),
            endpoint("POST", "/api/v1/price", "Price quote for a build"),
            endpoint("POST", "/api/v1/configs", "Save a build"),
            endpoint("GET", "/api/v1/configs/:id", "Retrieve a saved build"),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::{app, get, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_is_healthy() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "gunsmith-server");
    }

    #[tokio::test]
    async fn info_lists_endpoints() {
        let Json(info) = info().await;
        assert!(info.endpoints.iter().any(|e| e.path == "/api/v1/models/:id/render"));
    }
}
