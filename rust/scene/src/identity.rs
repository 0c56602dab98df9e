// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh identity resolution.
//!
//! Every mesh node gets a stable identifier: its own name when it has one,
//! otherwise `Mesh_<n>` where `n` counts unnamed meshes in document order.
//! Names are written back into the instance, so a second pass sees only
//! named meshes and changes nothing.

use rustc_hash::FxHashSet;

use crate::instance::ModelInstance;

/// Prefix of synthesized mesh names.
pub const SYNTHETIC_PREFIX: &str = "Mesh_";

/// Name every mesh node and return all mesh identifiers in document order.
///
/// A synthesized name that would collide with an existing mesh name skips
/// ahead to the next free ordinal.
pub fn resolve_mesh_identities(instance: &mut ModelInstance) -> Vec<String> {
    if instance.identities_resolved {
        return mesh_identifiers(instance);
    }
    let meshes = instance.mesh_nodes();

    let taken: FxHashSet<String> = meshes
        .iter()
        .filter_map(|&key| instance.nodes[key].resolved_name().map(str::to_string))
        .collect();

    let mut ordinal = 0usize;
    let mut synthesized = 0usize;
    let mut identifiers = Vec::with_capacity(meshes.len());

    for key in meshes {
        let node = &mut instance.nodes[key];
        if let Some(name) = node.resolved_name() {
            identifiers.push(name.to_string());
            continue;
        }
        let mut name = format!("{SYNTHETIC_PREFIX}{ordinal}");
        while taken.contains(&name) {
            ordinal += 1;
            name = format!("{SYNTHETIC_PREFIX}{ordinal}");
        }
        ordinal += 1;
        synthesized += 1;
        node.name = Some(name.clone());
        identifiers.push(name);
    }

    instance.identities_resolved = true;
    tracing::debug!(
        meshes = identifiers.len(),
        synthesized,
        "Resolved mesh identities"
    );
    identifiers
}

/// Current mesh names in document order, without assigning any.
/// Unnamed meshes (before resolution) are reported as empty strings.
pub fn mesh_identifiers(instance: &ModelInstance) -> Vec<String> {
    instance
        .mesh_nodes()
        .into_iter()
        .map(|key| instance.nodes[key].resolved_name().unwrap_or_default().to_string())
        .collect()
}
