// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Admin-authored part tags and the ordered map that holds them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::part::PartType;
use crate::taxonomy;

/// Association of one mesh to a part type plus display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartTag {
    pub mesh_name: String,
    #[serde(default)]
    pub part_type: PartType,
    pub display_name: String,
    #[serde(default = "default_customizable")]
    pub customizable: bool,
}

fn default_customizable() -> bool {
    true
}

impl PartTag {
    /// Tag created on first interaction with a mesh: unclassified,
    /// display name equal to the mesh id, customizable.
    pub fn new_default(mesh_name: impl Into<String>) -> Self {
        let mesh_name = mesh_name.into();
        Self {
            display_name: mesh_name.clone(),
            mesh_name,
            part_type: PartType::unclassified(),
            customizable: true,
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.part_type.is_unclassified()
    }
}

/// Insertion-ordered map from mesh id to its tag. At most one tag per mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    tags: Vec<PartTag>,
    index: FxHashMap<String, usize>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted sequence. A later entry for the same mesh replaces
    /// the earlier one in place.
    pub fn from_tags<I: IntoIterator<Item = PartTag>>(tags: I) -> Self {
        let mut map = Self::new();
        for tag in tags {
            map.insert(tag);
        }
        map
    }

    /// Insert or replace the tag for `tag.mesh_name`, returning the previous one.
    pub fn insert(&mut self, tag: PartTag) -> Option<PartTag> {
        match self.index.get(&tag.mesh_name) {
            Some(&slot) => Some(std::mem::replace(&mut self.tags[slot], tag)),
            None => {
                self.index.insert(tag.mesh_name.clone(), self.tags.len());
                self.tags.push(tag);
                None
            }
        }
    }

    pub fn get(&self, mesh_id: &str) -> Option<&PartTag> {
        self.index.get(mesh_id).map(|&slot| &self.tags[slot])
    }

    pub fn get_mut(&mut self, mesh_id: &str) -> Option<&mut PartTag> {
        match self.index.get(mesh_id) {
            Some(&slot) => Some(&mut self.tags[slot]),
            None => None,
        }
    }

    /// Tag for `mesh_id`, creating the default tag if none exists yet.
    pub fn get_or_insert_default(&mut self, mesh_id: &str) -> &mut PartTag {
        let slot = match self.index.get(mesh_id) {
            Some(&slot) => slot,
            None => {
                self.index.insert(mesh_id.to_string(), self.tags.len());
                self.tags.push(PartTag::new_default(mesh_id));
                self.tags.len() - 1
            }
        };
        &mut self.tags[slot]
    }

    pub fn contains(&self, mesh_id: &str) -> bool {
        self.index.contains_key(mesh_id)
    }

    /// Authoritative part type for a mesh, if an admin classified it.
    pub fn part_type_of(&self, mesh_id: &str) -> Option<&PartType> {
        self.get(mesh_id)
            .map(|tag| &tag.part_type)
            .filter(|part_type| !part_type.is_unclassified())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Number of tags with a non-empty part type.
    pub fn classified_count(&self) -> usize {
        self.tags.iter().filter(|tag| tag.is_classified()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartTag> {
        self.tags.iter()
    }
}

impl FromIterator<PartTag> for TagMap {
    fn from_iter<I: IntoIterator<Item = PartTag>>(iter: I) -> Self {
        Self::from_tags(iter)
    }
}

/// Tags eligible for persistence: unclassified tags are dropped and every
/// remaining part type must be assignable (taxonomy or coarse type).
pub fn persistable<'a, I>(tags: I) -> Result<Vec<PartTag>>
where
    I: IntoIterator<Item = &'a PartTag>,
{
    tags.into_iter()
        .filter(|tag| tag.is_classified())
        .map(|tag| {
            if taxonomy::is_assignable(tag.part_type.as_str()) {
                Ok(tag.clone())
            } else {
                Err(Error::UnknownPartType(tag.part_type.as_str().to_string()))
            }
        })
        .collect()
}
