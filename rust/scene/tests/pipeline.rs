// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use approx::assert_relative_eq;

use gunsmith_core::{
    classify_meshes, ColorSelection, MemoryTagStore, PartTag, PartType, TagMap, TaggingSession,
};
use gunsmith_scene::{
    load_model, resolve_materials, resolve_mesh_identities, Configurator, MaterialKind,
    ModelInstance, TextureRef,
};

const PISTOL: &[u8] = include_bytes!("fixtures/pistol.gltf");

fn pistol() -> Arc<gunsmith_scene::ModelAsset> {
    Arc::new(load_model(PISTOL).expect("fixture loads"))
}

#[test]
fn loads_fixture_scene_graph() {
    let asset = pistol();
    assert_eq!(asset.mesh_count(), 3);
    assert_eq!(asset.roots().len(), 1);

    let slide = &asset.nodes()[1];
    assert_eq!(slide.name.as_deref(), Some("Slide_Main_001"));
    assert!(slide.mesh.as_ref().unwrap().vertex_colors);

    let frame = &asset.nodes()[2];
    assert_eq!(frame.name.as_deref(), Some("Frame_Main_001"));
    assert_eq!(frame.mesh.as_ref().unwrap().materials.len(), 2);

    assert!(asset.nodes()[3].name.is_none());
}

#[test]
fn loads_fixture_materials() {
    let asset = pistol();
    let kinds: Vec<_> = asset.materials().iter().map(|m| m.kind.clone()).collect();
    // Steel, Polymer, default (frame's second primitive), Decal.
    assert_eq!(
        kinds,
        [
            MaterialKind::Standard,
            MaterialKind::Standard,
            MaterialKind::Standard,
            MaterialKind::Basic
        ]
    );
    let steel = &asset.materials()[0];
    assert_eq!(steel.name.as_deref(), Some("Steel"));
    assert_eq!(steel.maps.base_color, Some(TextureRef(0)));
    assert_eq!(steel.maps.normal, Some(TextureRef(1)));
    assert_relative_eq!(steel.roughness, 0.4);
}

#[test]
fn end_to_end_classification_and_tint() {
    let mut cfg = Configurator::new();
    let out = cfg.load_bytes(PISTOL).unwrap().clone();

    assert_eq!(cfg.mesh_ids(), ["Slide_Main_001", "Frame_Main_001", "Mesh_0"]);
    let types: Vec<&str> = cfg
        .mesh_ids()
        .iter()
        .map(|id| cfg.classifications().part_type(id))
        .collect();
    assert_eq!(types, ["slide", "frame", ""]);

    assert!(out.get("Slide_Main_001").unwrap().tinted);
    assert!(out.get("Frame_Main_001").unwrap().tinted);
    let unnamed = out.get("Mesh_0").unwrap();
    assert!(!unnamed.tinted);
    assert!(unnamed.part_type.is_unclassified());
}

#[test]
fn shared_asset_is_never_mutated() {
    let asset = pistol();
    let pristine = (*asset).clone();

    let mut a = ModelInstance::new(Arc::clone(&asset));
    let mut b = ModelInstance::new(Arc::clone(&asset));
    let ids = resolve_mesh_identities(&mut a);
    resolve_mesh_identities(&mut b);
    let classes = classify_meshes(&ids, &TagMap::new());
    let colors = ColorSelection::from_hex_map([("slide", "#ffffff"), ("frame", "#9a7d55")]).unwrap();

    resolve_materials(&mut a, &classes, &colors, Some("slide"));
    let untouched_b = resolve_materials(&mut b, &classes, &ColorSelection::new(), None);

    assert_eq!(*asset, pristine);
    assert!(!untouched_b.get("Slide_Main_001").unwrap().tinted);
    let slide_b = b.find_mesh("Slide_Main_001").unwrap();
    assert_eq!(b.mesh_materials(slide_b)[0].maps.base_color, Some(TextureRef(0)));
}

#[test]
fn repeated_passes_do_not_drift() {
    let mut instance = ModelInstance::new(pistol());
    let ids = resolve_mesh_identities(&mut instance);
    let classes = classify_meshes(&ids, &TagMap::new());
    let colors = ColorSelection::seeded(classes.part_types().iter());

    let first = resolve_materials(&mut instance, &classes, &colors, Some("frame"));
    let cloned = instance.owned_material_count();
    for _ in 0..3 {
        let again = resolve_materials(&mut instance, &classes, &colors, Some("frame"));
        assert_eq!(again, first);
    }
    assert_eq!(instance.owned_material_count(), cloned);
    assert_eq!(resolve_mesh_identities(&mut instance), ids);
}

#[test]
fn admin_tags_flow_into_tinting() {
    let mut store = MemoryTagStore::default();
    let mut session = TaggingSession::load("pistol", &store).unwrap();
    session.select_mesh("Mesh_0");
    session.set_part_type("Mesh_0", "magazine").unwrap();
    session.select_mesh("Slide_Main_001");
    session.set_part_type("Slide_Main_001", "frame").unwrap();
    assert_eq!(session.save(&mut store).unwrap(), 2);

    let reloaded = TaggingSession::load("pistol", &store).unwrap();
    let mut cfg = Configurator::new();
    cfg.load_bytes(PISTOL).unwrap();
    let out = cfg.set_tags(reloaded.tags().clone()).clone();

    // Admin tag beats the "slide" heuristic.
    assert_eq!(out.get("Slide_Main_001").unwrap().part_type, PartType::new("frame"));
    let mag = out.get("Mesh_0").unwrap();
    assert_eq!(mag.part_type.as_str(), "magazine");
    assert!(mag.tinted);
}

#[test]
fn unsaved_unclassified_tags_are_dropped() {
    let mut store = MemoryTagStore::default();
    let mut session = TaggingSession::new(
        "pistol",
        vec![
            PartTag {
                mesh_name: "m1".into(),
                part_type: PartType::new("slide"),
                display_name: "Slide".into(),
                customizable: true,
            },
            PartTag::new_default("m2"),
        ],
    );
    session.select_mesh("m3");
    session.save(&mut store).unwrap();

    let saved = TaggingSession::load("pistol", &store).unwrap();
    let names: Vec<&str> = saved.tags().iter().map(|t| t.mesh_name.as_str()).collect();
    assert_eq!(names, ["m1"]);
}
