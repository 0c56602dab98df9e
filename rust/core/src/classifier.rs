// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Part Classifier
//!
//! Maps a mesh identifier to a part type. Resolution order:
//!
//! 1. the admin tag for the mesh, when its part type is non-empty;
//! 2. the first heuristic name matcher that fires (case-insensitive substring);
//! 3. unclassified.
//!
//! The matcher list is evaluated strictly in order, so a name that contains
//! several needles (`trigger_guard_frame_mount`) resolves to the earliest
//! entry. Reordering [`HEURISTIC_MATCHERS`] changes results for models that
//! are already uploaded.

use serde::Serialize;

use crate::part::PartType;
use crate::tags::TagMap;

/// One heuristic rule: any needle contained in the lowercased mesh name selects `part_type`.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    pub needles: &'static [&'static str],
    pub part_type: &'static str,
}

impl NameMatcher {
    fn matches(&self, lowercase_name: &str) -> bool {
        self.needles.iter().any(|needle| lowercase_name.contains(needle))
    }
}

/// Heuristic matchers in priority order.
pub const HEURISTIC_MATCHERS: &[NameMatcher] = &[
    NameMatcher {
        needles: &["slide"],
        part_type: "slide",
    },
    NameMatcher {
        needles: &["frame", "grip"],
        part_type: "frame",
    },
    NameMatcher {
        needles: &["trigger"],
        part_type: "trigger",
    },
    NameMatcher {
        needles: &["mag"],
        part_type: "magazine",
    },
];

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    AdminTag,
    Heuristic,
    Unclassified,
}

/// First heuristic part type matching `mesh_id`, if any.
pub fn heuristic_match(mesh_id: &str) -> Option<&'static str> {
    let name = mesh_id.to_lowercase();
    HEURISTIC_MATCHERS
        .iter()
        .find(|matcher| matcher.matches(&name))
        .map(|matcher| matcher.part_type)
}

/// Classify one mesh, reporting which rule decided.
pub fn classify_with_source(mesh_id: &str, tags: &TagMap) -> (PartType, ClassificationSource) {
    if let Some(part_type) = tags.part_type_of(mesh_id) {
        return (part_type.clone(), ClassificationSource::AdminTag);
    }
    match heuristic_match(mesh_id) {
        Some(part_type) => (PartType::new(part_type), ClassificationSource::Heuristic),
        None => (PartType::unclassified(), ClassificationSource::Unclassified),
    }
}

/// Classify one mesh.
pub fn classify(mesh_id: &str, tags: &TagMap) -> PartType {
    classify_with_source(mesh_id, tags).0
}

/// Classification of one mesh in a [`Classifications`] list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshClassification {
    pub mesh_id: String,
    pub part_type: PartType,
    pub source: ClassificationSource,
}

/// Ordered mesh id -> part type assignments for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classifications {
    entries: Vec<MeshClassification>,
}

impl Classifications {
    /// Part type for `mesh_id`; unclassified when the mesh is unknown.
    pub fn part_type(&self, mesh_id: &str) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.mesh_id == mesh_id)
            .map(|entry| entry.part_type.as_str())
            .unwrap_or("")
    }

    pub fn get(&self, mesh_id: &str) -> Option<&MeshClassification> {
        self.entries.iter().find(|entry| entry.mesh_id == mesh_id)
    }

    /// Distinct classified part types in first-seen order.
    pub fn part_types(&self) -> Vec<PartType> {
        let mut seen = rustc_hash::FxHashSet::default();
        self.entries
            .iter()
            .filter(|entry| !entry.part_type.is_unclassified())
            .filter(|entry| seen.insert(entry.part_type.as_str()))
            .map(|entry| entry.part_type.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshClassification> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify every mesh in `mesh_ids`, preserving order.
pub fn classify_meshes<S: AsRef<str>>(mesh_ids: &[S], tags: &TagMap) -> Classifications {
    let entries = mesh_ids
        .iter()
        .map(|mesh_id| {
            let mesh_id = mesh_id.as_ref();
            let (part_type, source) = classify_with_source(mesh_id, tags);
            MeshClassification {
                mesh_id: mesh_id.to_string(),
                part_type,
                source,
            }
        })
        .collect();
    Classifications { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::PartTag;

    fn tags(entries: &[(&str, &str)]) -> TagMap {
        entries
            .iter()
            .map(|(mesh, part_type)| PartTag {
                mesh_name: mesh.to_string(),
                part_type: PartType::new(*part_type),
                display_name: mesh.to_string(),
                customizable: true,
            })
            .collect()
    }

    #[test]
    fn heuristic_fallback() {
        assert_eq!(classify("Slide_Main_002", &TagMap::new()), "slide");
        assert_eq!(classify("FRAME_main_001", &TagMap::new()), "frame");
        assert_eq!(classify("GripPanel_L", &TagMap::new()), "frame");
        assert_eq!(classify("trigger_shoe", &TagMap::new()), "trigger");
        assert_eq!(classify("Magazine_Body", &TagMap::new()), "magazine");
        assert_eq!(classify("mag_release", &TagMap::new()), "magazine");
    }

    #[test]
    fn no_match_is_unclassified() {
        let part_type = classify("Widget_7", &TagMap::new());
        assert!(part_type.is_unclassified());
        assert_eq!(
            classify_with_source("Widget_7", &TagMap::new()).1,
            ClassificationSource::Unclassified
        );
    }

    #[test]
    fn admin_tag_wins_over_heuristic() {
        let map = tags(&[("Slide_Main_002", "barrel_main")]);
        assert_eq!(
            classify_with_source("Slide_Main_002", &map),
            (PartType::new("barrel_main"), ClassificationSource::AdminTag)
        );
    }

    #[test]
    fn empty_admin_tag_falls_through() {
        let map = tags(&[("Slide_Main_002", "")]);
        assert_eq!(
            classify_with_source("Slide_Main_002", &map),
            (PartType::new("slide"), ClassificationSource::Heuristic)
        );
    }

    #[test]
    fn first_matcher_in_list_wins() {
        // frame precedes trigger and mag in the list
        assert_eq!(heuristic_match("trigger_guard_frame_mount"), Some("frame"));
        // slide precedes everything
        assert_eq!(heuristic_match("mag_slide_grip"), Some("slide"));
        assert_eq!(heuristic_match("trigger_mag"), Some("trigger"));
    }

    #[test]
    fn classify_meshes_preserves_order_and_collects_types() {
        let map = tags(&[("Part_A", "bolt")]);
        let ids = ["Slide_Main_001", "Frame_Main_001", "Mesh_0", "Part_A", "Slide_Cover"];
        let result = classify_meshes(&ids, &map);

        let types: Vec<_> = result.iter().map(|c| c.part_type.as_str()).collect();
        assert_eq!(types, ["slide", "frame", "", "bolt", "slide"]);
        assert_eq!(result.part_type("Part_A"), "bolt");
        assert_eq!(result.part_type("nope"), "");
        assert_eq!(
            result.part_types(),
            vec![PartType::new("slide"), PartType::new("frame"), PartType::new("bolt")]
        );
    }
}
