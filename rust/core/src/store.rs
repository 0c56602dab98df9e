// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part tag persistence seam.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::tags::PartTag;

/// Storage for the persisted tag set of each model.
///
/// `save` replaces the model's entire set; it never merges.
pub trait PartTagStore {
    /// Persisted tags for `model_id`, in stored order. Empty when none exist.
    fn load(&self, model_id: &str) -> Result<Vec<PartTag>>;

    /// Replace the stored tags for `model_id`.
    fn save(&mut self, model_id: &str, tags: &[PartTag]) -> Result<()>;
}

/// In-memory store, used by tests and embedded tooling.
#[derive(Debug, Default, Clone)]
pub struct MemoryTagStore {
    models: FxHashMap<String, Vec<PartTag>>,
    fail_with: Option<String>,
}

impl MemoryTagStore {
    /// A store whose every `save` fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            models: FxHashMap::default(),
            fail_with: Some(message.into()),
        }
    }
}

impl PartTagStore for MemoryTagStore {
    fn load(&self, model_id: &str) -> Result<Vec<PartTag>> {
        Ok(self.models.get(model_id).cloned().unwrap_or_default())
    }

    fn save(&mut self, model_id: &str, tags: &[PartTag]) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(Error::Persistence(message.clone()));
        }
        self.models.insert(model_id.to_string(), tags.to_vec());
        Ok(())
    }
}
