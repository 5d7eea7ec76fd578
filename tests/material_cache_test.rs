use viewer_ngin::{
    MaterialCache, RenderMode, RenderModeApplier,
    data_structures::{
        material::{Material, MaterialSlot, StandardMaterial},
        scene_graph::NodeId,
    },
    lighting::Lighting,
};

use crate::common::test_utils::{materials, sample_scene};

mod common;

#[test]
fn capture_snapshots_every_mesh_with_a_material() {
    let scene = sample_scene();
    let mut cache = MaterialCache::new();

    assert_eq!(cache.capture(&*scene), 2);
    assert_eq!(cache.len(), 2);
    for (id, material) in materials(&*scene) {
        let snapshot = cache.lookup(id).expect("mesh has no snapshot");
        assert_eq!(snapshot.material, material);
        assert!(!snapshot.wireframe);

        let node = scene.find(id).expect("snapshot of an unknown node");
        assert_eq!(node.mesh().and_then(|mesh| mesh.material.as_ref()), Some(&material));
    }
    assert!(scene.find(NodeId::new()).is_none());
}

#[test]
fn meshes_without_material_are_skipped() {
    let scene = sample_scene();
    let mut cache = MaterialCache::new();
    cache.capture(&*scene);

    let mut bare = Vec::new();
    scene.traverse(&mut |node| {
        if node.mesh().is_some_and(|mesh| mesh.material.is_none()) {
            bare.push(node.id());
        }
    });
    assert_eq!(bare.len(), 1);
    assert!(cache.lookup(bare[0]).is_none());
}

#[test]
fn capture_is_idempotent() {
    let mut scene = sample_scene();
    let mut cache = MaterialCache::new();
    cache.capture(&*scene);
    let before = materials(&*scene);

    // restyle the live materials, a second capture must not pick that up
    RenderModeApplier::default().apply(
        RenderMode::Solid,
        &mut *scene,
        &cache,
        &mut Lighting::default(),
    );
    assert_eq!(cache.capture(&*scene), 0);
    assert_eq!(cache.len(), 2);

    for (id, material) in before {
        assert_eq!(cache.lookup(id).unwrap().material, material);
    }
}

#[test]
fn snapshots_are_independent_of_live_materials() {
    let mut scene = sample_scene();
    let mut cache = MaterialCache::new();
    cache.capture(&*scene);

    scene.traverse_mut(&mut |node| {
        if let Some(slot) = node.mesh_mut().and_then(|mesh| mesh.material.as_mut()) {
            slot.iter_mut().for_each(|m| m.set_metalness(0.42));
        }
    });

    for (id, _) in materials(&*scene) {
        let snapshot = cache.lookup(id).unwrap();
        assert!(snapshot.material.iter().all(|m| m.metalness() != Some(0.42)));
    }
}

#[test]
fn clear_then_capture_holds_exactly_one_entry_per_mesh() {
    let mut scene = sample_scene();
    let mut cache = MaterialCache::new();
    cache.capture(&*scene);
    RenderModeApplier::default().apply(
        RenderMode::Wireframe,
        &mut *scene,
        &cache,
        &mut Lighting::default(),
    );

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.capture(&*scene), 2);
    assert_eq!(cache.len(), 2);

    // whatever was live at capture time becomes the new original
    for (id, _) in materials(&*scene) {
        assert!(cache.lookup(id).unwrap().wireframe);
    }
}

#[test]
fn multi_material_snapshot_records_any_wireframe() {
    let slot = MaterialSlot::Multi(vec![
        Material::Standard(StandardMaterial::default()),
        Material::Standard(StandardMaterial {
            wireframe: true,
            ..Default::default()
        }),
    ]);
    assert!(slot.wireframe());
    assert!(!MaterialSlot::from(StandardMaterial::default()).wireframe());
}
