// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown part type: {0}")]
    UnknownPartType(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::Multipart(_)
            | ApiError::InvalidColor(_)
            | ApiError::UnknownPartType(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InvalidModel(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Internal(_) | ApiError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ApiError::Multipart(_) => "MULTIPART_ERROR",
            ApiError::InvalidModel(_) => "INVALID_MODEL",
            ApiError::InvalidColor(_) => "INVALID_COLOR",
            ApiError::UnknownPartType(_) => "UNKNOWN_PART_TYPE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Join(_) => "TASK_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<gunsmith_core::Error> for ApiError {
    fn from(err: gunsmith_core::Error) -> Self {
        use gunsmith_core::Error;
        match err {
            Error::InvalidColor(hex) => ApiError::InvalidColor(hex),
            Error::UnknownPartType(part_type) => ApiError::UnknownPartType(part_type),
            Error::MeshNotSelected { .. } => ApiError::BadRequest(err.to_string()),
            Error::Persistence(message) => ApiError::Storage(message),
        }
    }
}

impl From<gunsmith_scene::Error> for ApiError {
    fn from(err: gunsmith_scene::Error) -> Self {
        use gunsmith_scene::Error;
        match err {
            Error::Gltf(_) | Error::NoScene => ApiError::InvalidModel(err.to_string()),
            Error::MeshNotFound(_) => ApiError::NotFound(err.to_string()),
            Error::Core(core) => core.into(),
        }
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_client_errors() {
        let err: ApiError = gunsmith_core::Error::InvalidColor("#zz".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_COLOR");

        let err: ApiError = gunsmith_core::Error::UnknownPartType("laser".into()).into();
        assert_eq!(err.code(), "UNKNOWN_PART_TYPE");

        let err: ApiError = gunsmith_core::Error::Persistence("disk full".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn scene_errors_map_by_kind() {
        let err: ApiError = gunsmith_scene::Error::NoScene.into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = gunsmith_scene::Error::MeshNotFound("Mesh_9".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError =
            gunsmith_scene::Error::Core(gunsmith_core::Error::InvalidColor("#1".into())).into();
        assert_eq!(err.code(), "INVALID_COLOR");
    }
}
