// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disk-backed storage for uploaded models, part tags and saved builds.

use crate::error::ApiError;
use crate::types::ModelRecord;
use gunsmith_core::{PartTag, PartTagStore};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

const LIBRARY_KEY: &str = "library-v1";

/// Content-addressable store on top of cacache.
///
/// Keys: `<model_id>-model` for raw model bytes, `<model_id>-parts-v1` for
/// the persisted tag set, `config-<id>` for saved builds and `library-v1`
/// for the model library records, in upload order.
#[derive(Debug, Clone)]
pub struct ModelStore {
    data_dir: PathBuf,
    /// Serializes read-modify-write of the library record list.
    library: Arc<Mutex<()>>,
}

impl ModelStore {
    /// Create a store in the specified directory.
    pub async fn new(data_dir: impl AsRef<Path>) -> Self {
        let path = data_dir.as_ref().to_path_buf();

        if let Err(e) = tokio::fs::create_dir_all(&path).await {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to create data directory"
            );
        }

        Self {
            data_dir: path,
            library: Arc::new(Mutex::new(())),
        }
    }

    /// Model id for uploaded content (SHA256 hash).
    pub fn generate_key(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    fn model_key(model_id: &str) -> String {
        format!("{}-model", model_id)
    }

    fn parts_key(model_id: &str) -> String {
        format!("{}-parts-v1", model_id)
    }

    fn config_key(config_id: &str) -> String {
        format!("config-{}", config_id)
    }

    /// Store model bytes under their content hash and return it.
    pub async fn put_model(&self, data: &[u8]) -> Result<String, ApiError> {
        let model_id = Self::generate_key(data);
        let key = Self::model_key(&model_id);
        if !self.has(&key).await {
            self.set_bytes(&key, data).await?;
        }
        Ok(model_id)
    }

    pub async fn get_model(&self, model_id: &str) -> Result<Option<Vec<u8>>, ApiError> {
        self.get_bytes(&Self::model_key(model_id)).await
    }

    pub async fn has_model(&self, model_id: &str) -> bool {
        self.has(&Self::model_key(model_id)).await
    }

    /// Insert or replace the library record of a model. A re-uploaded model
    /// keeps its position and original `created_at`. Returns the stored
    /// record.
    pub async fn put_record(&self, record: &ModelRecord) -> Result<ModelRecord, ApiError> {
        let _guard = self.library.lock().await;
        let mut records = self.list_records().await?;
        let stored = match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = record.clone();
                existing.created_at = created_at;
                existing.clone()
            }
            None => {
                records.push(record.clone());
                record.clone()
            }
        };
        self.set(LIBRARY_KEY, &records).await?;
        Ok(stored)
    }

    pub async fn get_record(&self, model_id: &str) -> Result<Option<ModelRecord>, ApiError> {
        Ok(self
            .list_records()
            .await?
            .into_iter()
            .find(|r| r.id == model_id))
    }

    /// Library records in upload order.
    pub async fn list_records(&self) -> Result<Vec<ModelRecord>, ApiError> {
        Ok(self.get(LIBRARY_KEY).await?.unwrap_or_default())
    }

    /// Remove a model, its library record and its part tags. Returns
    /// whether anything was stored for `model_id`.
    pub async fn delete_model(&self, model_id: &str) -> Result<bool, ApiError> {
        let _guard = self.library.lock().await;
        let mut records = self.list_records().await?;
        let before = records.len();
        records.retain(|r| r.id != model_id);
        let had_record = records.len() != before;
        if had_record {
            self.set(LIBRARY_KEY, &records).await?;
        }

        let had_model = self.has_model(model_id).await;
        if had_model {
            self.remove(&Self::model_key(model_id)).await?;
        }
        let parts_key = Self::parts_key(model_id);
        if self.has(&parts_key).await {
            self.remove(&parts_key).await?;
        }
        Ok(had_record || had_model)
    }

    pub async fn put_config<T: Serialize>(&self, config_id: &str, value: &T) -> Result<(), ApiError> {
        self.set(&Self::config_key(config_id), value).await
    }

    pub async fn get_config<T: DeserializeOwned>(&self, config_id: &str) -> Result<Option<T>, ApiError> {
        self.get(&Self::config_key(config_id)).await
    }

    /// Get a stored JSON value by key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match cacache::read(&self.data_dir, key).await {
            Ok(data) => {
                let value: T = serde_json::from_slice(&data)?;
                Ok(Some(value))
            }
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    /// Store a JSON value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ApiError> {
        let data = serde_json::to_vec(value)?;
        cacache::write(&self.data_dir, key, &data).await?;
        tracing::debug!(key = %key, size = data.len(), "Stored value");
        Ok(())
    }

    /// Check if a key exists.
    pub async fn has(&self, key: &str) -> bool {
        cacache::metadata(&self.data_dir, key)
            .await
            .map(|entry| entry.is_some())
            .unwrap_or(false)
    }

    /// Remove an entry by key.
    pub async fn remove(&self, key: &str) -> Result<(), ApiError> {
        cacache::remove(&self.data_dir, key).await?;
        tracing::debug!(key = %key, "Removed entry");
        Ok(())
    }

    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError> {
        match cacache::read(&self.data_dir, key).await {
            Ok(data) => Ok(Some(data)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    pub async fn set_bytes(&self, key: &str, data: &[u8]) -> Result<(), ApiError> {
        cacache::write(&self.data_dir, key, data).await?;
        tracing::debug!(key = %key, size = data.len(), "Stored raw bytes");
        Ok(())
    }
}

/// Blocking tag persistence, used from `spawn_blocking` by the parts routes.
impl PartTagStore for ModelStore {
    fn load(&self, model_id: &str) -> gunsmith_core::Result<Vec<PartTag>> {
        match cacache::read_sync(&self.data_dir, Self::parts_key(model_id)) {
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|e| gunsmith_core::Error::Persistence(e.to_string())),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(Vec::new()),
            Err(e) => Err(gunsmith_core::Error::Persistence(e.to_string())),
        }
    }

    fn save(&mut self, model_id: &str, tags: &[PartTag]) -> gunsmith_core::Result<()> {
        let data =
            serde_json::to_vec(tags).map_err(|e| gunsmith_core::Error::Persistence(e.to_string()))?;
        cacache::write_sync(&self.data_dir, Self::parts_key(model_id), data)
            .map_err(|e| gunsmith_core::Error::Persistence(e.to_string()))?;
        tracing::debug!(model_id = %model_id, parts = tags.len(), "Stored part tags");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gunsmith_core::PartType;

    fn tag(mesh: &str, part_type: &str) -> PartTag {
        PartTag {
            mesh_name: mesh.into(),
            part_type: PartType::new(part_type),
            display_name: mesh.into(),
            customizable: true,
        }
    }

    #[tokio::test]
    async fn models_are_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).await;

        let id = store.put_model(b"glb bytes").await.unwrap();
        assert_eq!(id, ModelStore::generate_key(b"glb bytes"));
        assert_eq!(id.len(), 64);
        assert_eq!(store.put_model(b"glb bytes").await.unwrap(), id);
        assert!(store.has_model(&id).await);
        assert_eq!(store.get_model(&id).await.unwrap().unwrap(), b"glb bytes");
        assert!(store.get_model("missing").await.unwrap().is_none());
    }

    fn record(id: &str, name: &str, created_at: u64) -> ModelRecord {
        ModelRecord {
            id: id.into(),
            name: name.into(),
            sku: None,
            base_price: None,
            description: None,
            size: 9,
            mesh_count: 1,
            created_at,
        }
    }

    #[tokio::test]
    async fn records_keep_upload_order_and_first_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).await;
        assert!(store.list_records().await.unwrap().is_empty());

        store.put_record(&record("a", "Glock 19", 1)).await.unwrap();
        store.put_record(&record("b", "AR-15", 2)).await.unwrap();
        let stored = store.put_record(&record("a", "Glock 19 Gen 5", 3)).await.unwrap();
        assert_eq!(stored.created_at, 1);

        let records = store.list_records().await.unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Glock 19 Gen 5", "AR-15"]);
        assert_eq!(records[0].created_at, 1);
        assert_eq!(store.get_record("b").await.unwrap().unwrap().created_at, 2);
    }

    #[tokio::test]
    async fn delete_drops_model_record_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ModelStore::new(dir.path()).await;
        let id = store.put_model(b"glb bytes").await.unwrap();
        store.put_record(&record(&id, "Glock 19", 1)).await.unwrap();
        store.save(&id, &[tag("a", "slide")]).unwrap();

        assert!(store.delete_model(&id).await.unwrap());
        assert!(!store.has_model(&id).await);
        assert!(store.get_model(&id).await.unwrap().is_none());
        assert!(store.get_record(&id).await.unwrap().is_none());
        assert!(store.load(&id).unwrap().is_empty());
        assert!(!store.delete_model(&id).await.unwrap());
    }

    #[test]
    fn part_tags_replace_the_whole_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ModelStore {
            data_dir: dir.path().to_path_buf(),
            library: Arc::new(Mutex::new(())),
        };

        assert!(store.load("m").unwrap().is_empty());
        store.save("m", &[tag("a", "slide"), tag("b", "frame")]).unwrap();
        store.save("m", &[tag("c", "trigger")]).unwrap();

        let loaded = store.load("m").unwrap();
        assert_eq!(loaded, vec![tag("c", "trigger")]);
        assert!(store.load("other").unwrap().is_empty());
    }
}
