use crate::fixtures::{random_ray, triangle_soup};
use na::Isometry3;
use octoray3d::partitioning::{OctreeBuildOptions, OctreeRepr, OctreeReprError, Pruning};
use octoray3d::scene::{NodeId, Scene, SceneError, SceneNode};
use octoray3d::shape::{HasOctree, Mesh, MeshGeometry};

fn indexed_scene(geometry: MeshGeometry) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let mesh = scene.insert(SceneNode::mesh(
        Isometry3::translation(1.0, 2.0, 3.0),
        Mesh::new(geometry),
    ));
    (scene, mesh)
}

fn assert_same_hits(a: &Scene, a_id: NodeId, b: &Scene, b_id: NodeId, seed: u64) {
    let mut rng = oorandom::Rand32::new(seed);

    for i in 0..200 {
        let ray = random_ray(&mut rng, 25.0, i, 8);
        let a_hit = a.cast_ray_first_with(a_id, &ray, f32::MAX, Pruning::default());
        let b_hit = b.cast_ray_first_with(b_id, &ray, f32::MAX, Pruning::default());
        assert_eq!(a_hit.map(|hit| hit.hit), b_hit.map(|hit| hit.hit));
    }
}

#[test]
fn attached_octree_yields_identical_hits() {
    let mut rng = oorandom::Rand32::new(17);
    let geometry = triangle_soup(&mut rng, 400, 20.0);
    let options = OctreeBuildOptions::default().with_leaf_threshold(12);

    let (mut built, built_id) = indexed_scene(geometry.clone());
    let repr = built.build_octree(built_id, &options).unwrap().to_repr();

    let (mut attached, attached_id) = indexed_scene(geometry);
    attached.attach_octree(attached_id, &repr).unwrap();

    assert_eq!(
        attached.mesh(attached_id).unwrap().octree(),
        built.mesh(built_id).unwrap().octree()
    );
    assert_same_hits(&built, built_id, &attached, attached_id, 3);
}

#[test]
fn attaching_to_a_smaller_geometry_is_rejected() {
    let mut rng = oorandom::Rand32::new(5);
    let geometry = triangle_soup(&mut rng, 50, 10.0);
    let (mut scene, mesh) = indexed_scene(geometry);
    let repr = scene
        .build_octree(mesh, &OctreeBuildOptions::default())
        .unwrap()
        .to_repr();

    let (mut other, other_mesh) = indexed_scene(triangle_soup(&mut rng, 10, 10.0));
    let result = other.attach_octree(other_mesh, &repr);

    assert!(matches!(
        result,
        Err(SceneError::Repr(OctreeReprError::OffsetOutOfBounds {
            index_count: 30,
            ..
        }))
    ));
    assert!(other.mesh(other_mesh).unwrap().octree().is_none());

    let group = other.insert(SceneNode::group(Isometry3::identity()));
    assert_eq!(
        other.attach_octree(group, &repr),
        Err(SceneError::NotAMesh(group))
    );
}

#[cfg(feature = "serde-serialize")]
#[test]
fn json_round_trip_yields_identical_hits() {
    let mut rng = oorandom::Rand32::new(23);
    let geometry = triangle_soup(&mut rng, 300, 20.0);
    let options = OctreeBuildOptions::default().with_leaf_threshold(10);

    let (mut built, built_id) = indexed_scene(geometry.clone());
    let repr = built.build_octree(built_id, &options).unwrap().to_repr();
    let json = serde_json::to_string(&repr).unwrap();
    assert!(json.contains(r#""kind":"internal""#));
    assert!(json.contains(r#""kind":"leaf""#));

    let decoded: OctreeRepr = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, repr);

    let (mut attached, attached_id) = indexed_scene(geometry);
    attached.attach_octree(attached_id, &decoded).unwrap();
    assert_same_hits(&built, built_id, &attached, attached_id, 9);
}

#[cfg(feature = "serde-serialize")]
#[test]
fn handwritten_json_is_validated() {
    let valid = r#"{
        "root": {
            "kind": "internal",
            "aabb": { "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0] },
            "children": [{
                "kind": "leaf",
                "aabb": { "min": [0.0, 0.0, 0.0], "max": [0.5, 0.5, 0.5] },
                "indices": { "ranges": [{ "start": 0, "end": 3 }], "count": 2 }
            }]
        }
    }"#;
    let repr: OctreeRepr = serde_json::from_str(valid).unwrap();
    let octree = octoray3d::partitioning::SpatialOctree::from_repr(&repr).unwrap();
    assert_eq!(octree.leaf_count(), 1);
    assert_eq!(octree.triangle_participations(), 2);

    let miscounted = valid.replace(r#""count": 2"#, r#""count": 5"#);
    let repr: OctreeRepr = serde_json::from_str(&miscounted).unwrap();
    assert_eq!(
        octoray3d::partitioning::SpatialOctree::from_repr(&repr),
        Err(OctreeReprError::CountMismatch {
            declared: 5,
            actual: 2
        })
    );
}
