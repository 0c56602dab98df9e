// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model library endpoints: upload, listing, inspection and deletion.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use gunsmith_core::{classify_meshes, PartTagStore, TagMap};
use gunsmith_scene::{resolve_mesh_identities, ModelAsset, ModelInstance};

use crate::error::ApiError;
use crate::routes::unix_now;
use crate::services::{AssetCache, ModelStore};
use crate::types::{LibraryEntry, ModelRecord, ModelResponse};
use crate::AppState;

/// Fields of the upload form. Only the file is required.
#[derive(Debug, Default)]
struct UploadForm {
    data: Option<Vec<u8>>,
    file_name: Option<String>,
    name: Option<String>,
    sku: Option<String>,
    base_price: Option<f64>,
    description: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_price(raw: &str) -> Result<Option<f64>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(Some(price)),
        _ => Err(ApiError::BadRequest(format!("Invalid basePrice: {}", raw))),
    }
}

/// Extract the model file (`file` or `model`) and its metadata fields.
async fn extract_upload(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        match field_name.as_str() {
            "file" | "model" => {
                form.file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                tracing::debug!(size = bytes.len(), "Extracted file from multipart");
                form.data = Some(bytes.to_vec());
            }
            "name" => form.name = non_empty(field.text().await?),
            "sku" => form.sku = non_empty(field.text().await?),
            "description" => form.description = non_empty(field.text().await?),
            "basePrice" => form.base_price = parse_price(&field.text().await?)?,
            _ => {}
        }
    }
    Ok(form)
}

/// Resolve mesh ids and classify them against the stored tags.
pub(crate) async fn describe(
    store: &ModelStore,
    model_id: String,
    asset: Arc<ModelAsset>,
    record: Option<ModelRecord>,
) -> Result<ModelResponse, ApiError> {
    let store = store.clone();
    tokio::task::spawn_blocking(move || {
        let tags = TagMap::from_tags(store.load(&model_id)?);
        let mut instance = ModelInstance::new(asset);
        let meshes = resolve_mesh_identities(&mut instance);
        let classifications = classify_meshes(&meshes, &tags);
        Ok::<_, ApiError>(ModelResponse {
            model_id,
            meshes,
            classifications,
            record,
        })
    })
    .await?
}

/// POST /api/v1/models - Upload a glTF/GLB model with optional `name`,
/// `sku`, `basePrice` and `description` fields.
///
/// The model is parsed before it is stored, and cached only once it is on
/// disk, so a file that fails either step leaves no trace.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ModelResponse>), ApiError> {
    let UploadForm {
        data,
        file_name,
        name,
        sku,
        base_price,
        description,
    } = extract_upload(&mut multipart).await?;
    let data = data.ok_or_else(|| {
        tracing::warn!("No model file field found in multipart request");
        ApiError::MissingFile
    })?;

    if data.len() > state.config.max_file_size_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }
    if data.is_empty() {
        return Err(ApiError::MissingFile);
    }

    let model_id = ModelStore::generate_key(&data);
    let asset = AssetCache::parse(data.clone()).await?;
    state.store.put_model(&data).await?;

    let record = ModelRecord {
        name: name
            .or(file_name)
            .unwrap_or_else(|| format!("Model {}", &model_id[..8])),
        id: model_id.clone(),
        sku,
        base_price,
        description,
        size: data.len(),
        mesh_count: asset.mesh_count(),
        created_at: unix_now()?.as_secs(),
    };
    let record = state.store.put_record(&record).await?;
    state.assets.insert(&model_id, Arc::clone(&asset)).await;

    let response = describe(&state.store, model_id, asset, Some(record)).await?;
    tracing::info!(
        model_id = %response.model_id,
        size = data.len(),
        meshes = response.meshes.len(),
        "Model uploaded"
    );
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/models - Library records in upload order, with the number
/// of tagged parts of each.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<LibraryEntry>>, ApiError> {
    let records = state.store.list_records().await?;
    let store = state.store.as_ref().clone();
    let entries = tokio::task::spawn_blocking(move || {
        records
            .into_iter()
            .map(|record| {
                let tagged_parts = store.load(&record.id)?.len();
                Ok(LibraryEntry {
                    record,
                    tagged_parts,
                })
            })
            .collect::<Result<Vec<_>, ApiError>>()
    })
    .await??;
    Ok(Json(entries))
}

/// GET /api/v1/models/:id - Mesh ids and classifications of a stored model.
pub async fn get_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<Json<ModelResponse>, ApiError> {
    let asset = state.assets.get_or_load(&model_id, &state.store).await?;
    let record = state.store.get_record(&model_id).await?;
    Ok(Json(describe(&state.store, model_id, asset, record).await?))
}

/// DELETE /api/v1/models/:id - Remove a model, its tags and its cached
/// asset.
pub async fn delete_model(
    State(state): State<AppState>,
    Path(model_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let existed = state.store.delete_model(&model_id).await?;
    let evicted = state.assets.evict(&model_id).await;
    if !existed {
        return Err(ApiError::NotFound(format!("Model not found: {}", model_id)));
    }
    tracing::info!(model_id = %model_id, evicted, "Model deleted");
    Ok(StatusCode::NO_CONTENT)
}
