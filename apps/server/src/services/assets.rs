// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory cache of parsed model assets.
//!
//! Parsed assets are immutable and shared: every request that renders a
//! model builds its own instance on top of the same `Arc<ModelAsset>`.

use std::collections::VecDeque;
use std::sync::Arc;

use gunsmith_scene::{load_model, ModelAsset};
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::services::store::ModelStore;

#[derive(Debug, Default)]
struct Entries {
    assets: FxHashMap<String, Arc<ModelAsset>>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

/// Bounded cache; once full, the oldest inserted asset is evicted.
#[derive(Debug)]
pub struct AssetCache {
    entries: RwLock<Entries>,
    capacity: usize,
}

impl AssetCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            capacity: capacity.max(1),
        }
    }

    /// Parse `data` off the async runtime without caching it.
    pub async fn parse(data: Vec<u8>) -> Result<Arc<ModelAsset>, ApiError> {
        Ok(Arc::new(
            tokio::task::spawn_blocking(move || load_model(&data)).await??,
        ))
    }

    /// Cache a parsed asset under `model_id`.
    pub async fn insert(&self, model_id: &str, asset: Arc<ModelAsset>) {
        let mut entries = self.entries.write().await;
        if entries.assets.insert(model_id.to_string(), asset).is_none() {
            entries.order.push_back(model_id.to_string());
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.assets.remove(&oldest);
                tracing::debug!(model_id = %oldest, "Asset evicted");
            }
        }
        tracing::debug!(model_id = %model_id, cached = entries.assets.len(), "Asset cached");
    }

    /// Drop a cached asset. Returns whether it was present.
    pub async fn evict(&self, model_id: &str) -> bool {
        let mut entries = self.entries.write().await;
        entries.order.retain(|id| id != model_id);
        entries.assets.remove(model_id).is_some()
    }

    /// Cached asset, or parse it from the store.
    pub async fn get_or_load(&self, model_id: &str, store: &ModelStore) -> Result<Arc<ModelAsset>, ApiError> {
        if let Some(asset) = self.entries.read().await.assets.get(model_id) {
            tracing::debug!(model_id = %model_id, "Asset cache HIT");
            return Ok(Arc::clone(asset));
        }

        let data = store
            .get_model(model_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Model not found: {}", model_id)))?;
        tracing::debug!(model_id = %model_id, size = data.len(), "Asset cache MISS");
        let asset = Self::parse(data).await?;
        self.insert(model_id, Arc::clone(&asset)).await;
        Ok(asset)
    }

    #[cfg(test)]
    pub async fn contains(&self, model_id: &str) -> bool {
        self.entries.read().await.assets.contains_key(model_id)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.assets.len()
    }
}
