// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tagging Session
//!
//! Editable mesh -> tag state for one admin working on one model. The
//! session is an explicitly owned value; every mutation goes through the
//! methods below.
//!
//! ```text
//!   Unselected --select_mesh(a)--> MeshSelected(a)
//!   MeshSelected(a) --select_mesh(a)--> Unselected
//!   MeshSelected(a) --select_mesh(b)--> MeshSelected(b)
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::part::PartType;
use crate::store::PartTagStore;
use crate::tags::{persistable, PartTag, TagMap};
use crate::taxonomy;

/// Selection state of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    MeshSelected(String),
}

/// Direct edit of a tag field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagField {
    DisplayName(String),
    Customizable(bool),
}

/// One row of the mesh list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshRow<'a> {
    pub mesh_id: &'a str,
    pub tag: Option<&'a PartTag>,
    pub is_tagged: bool,
    pub is_selected: bool,
}

/// Admin tagging session for a single model.
#[derive(Debug, Clone)]
pub struct TaggingSession {
    model_id: String,
    tags: TagMap,
    selection: Selection,
}

impl TaggingSession {
    /// Start a session from whatever was persisted for the model.
    pub fn new(model_id: impl Into<String>, persisted: Vec<PartTag>) -> Self {
        Self {
            model_id: model_id.into(),
            tags: TagMap::from_tags(persisted),
            selection: Selection::Unselected,
        }
    }

    /// Start a session seeded from a tag store.
    pub fn load<S: PartTagStore + ?Sized>(model_id: &str, store: &S) -> Result<Self> {
        let persisted = store.load(model_id)?;
        Ok(Self::new(model_id, persisted))
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_mesh(&self) -> Option<&str> {
        match &self.selection {
            Selection::MeshSelected(id) => Some(id.as_str()),
            Selection::Unselected => None,
        }
    }

    /// Toggle selection of `mesh_id`, creating its default tag on first selection.
    pub fn select_mesh(&mut self, mesh_id: &str) -> &Selection {
        if self.selected_mesh() == Some(mesh_id) {
            self.selection = Selection::Unselected;
        } else {
            self.tags.get_or_insert_default(mesh_id);
            self.selection = Selection::MeshSelected(mesh_id.to_string());
        }
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::Unselected;
    }

    /// Set the part type of the selected mesh.
    ///
    /// The display name follows the new type's label only while it still holds
    /// a default value: empty, the mesh id, or the label of the previous type.
    pub fn set_part_type(&mut self, mesh_id: &str, part_type: &str) -> Result<&PartTag> {
        if self.selected_mesh() != Some(mesh_id) {
            return Err(Error::MeshNotSelected {
                expected: mesh_id.to_string(),
                actual: self.selected_mesh().map(str::to_string),
            });
        }
        let new_type = if part_type.is_empty() {
            PartType::unclassified()
        } else {
            PartType::known(part_type)?
        };

        let tag = self.tags.get_or_insert_default(mesh_id);
        let previous_label = if tag.part_type.is_unclassified() {
            ""
        } else {
            taxonomy::label_for(tag.part_type.as_str())
        };
        let display_is_default = tag.display_name.is_empty()
            || tag.display_name == tag.mesh_name
            || tag.display_name == previous_label;

        if display_is_default {
            tag.display_name = taxonomy::label_for(new_type.as_str()).to_string();
        }
        tag.part_type = new_type;
        Ok(tag)
    }

    /// Edit a display field on any mesh's tag, selected or not.
    pub fn update_field(&mut self, mesh_id: &str, field: TagField) -> &PartTag {
        let tag = self.tags.get_or_insert_default(mesh_id);
        match field {
            TagField::DisplayName(name) => tag.display_name = name,
            TagField::Customizable(flag) => tag.customizable = flag,
        }
        tag
    }

    /// Tags that `save` would write.
    pub fn pending_save(&self) -> Result<Vec<PartTag>> {
        persistable(self.tags.iter())
    }

    /// Persist the classified tags, replacing the model's entire stored set.
    ///
    /// On failure the in-memory state is left exactly as it was.
    pub fn save<S: PartTagStore + ?Sized>(&self, store: &mut S) -> Result<usize> {
        let parts = self.pending_save()?;
        store.save(&self.model_id, &parts)?;
        Ok(parts.len())
    }

    pub fn tagged_count(&self) -> usize {
        self.tags.classified_count()
    }

    /// Rows for a mesh list, in the order of `mesh_ids`.
    pub fn rows<'a, S: AsRef<str>>(&'a self, mesh_ids: &'a [S]) -> Vec<MeshRow<'a>> {
        let selected = self.selected_mesh();
        mesh_ids
            .iter()
            .map(|mesh_id| {
                let mesh_id = mesh_id.as_ref();
                let tag = self.tags.get(mesh_id);
                MeshRow {
                    mesh_id,
                    tag,
                    is_tagged: tag.is_some_and(PartTag::is_classified),
                    is_selected: selected == Some(mesh_id),
                }
            })
            .collect()
    }
}
