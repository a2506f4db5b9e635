use crate::fixtures::{square, triangle_soup};
use na::{Isometry3, Point3, Vector3};
use octoray3d::partitioning::{OctreeBuildError, OctreeBuildOptions, OrderingViolation};
use octoray3d::query::Ray;
use octoray3d::scene::{Scene, SceneError, SceneNode, SubtreeBuildReport};
use octoray3d::shape::{GeometryGroup, HasOctree, Mesh, MeshGeometry};

#[test]
fn failing_meshes_do_not_prevent_other_builds() {
    let mut rng = oorandom::Rand32::new(8);
    let mut scene = Scene::new();
    let root = scene.insert(SceneNode::group(Isometry3::identity()));
    let inner = scene.insert(SceneNode::group(Isometry3::translation(0.0, 5.0, 0.0)));

    let fresh = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(triangle_soup(&mut rng, 20, 5.0)),
    ));
    let prebuilt = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(triangle_soup(&mut rng, 20, 5.0)),
    ));
    // Groups listed out of order.
    let mut vertices = square(Point3::new(10.0, 0.0, -4.0), 1.0);
    vertices.extend(square(Point3::new(10.0, 0.0, -8.0), 1.0));
    let unsorted = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(MeshGeometry::new(vertices).with_groups(vec![
            GeometryGroup::new(6, 6, 0),
            GeometryGroup::new(0, 6, 0),
        ])),
    ));
    let hollow = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(MeshGeometry::new(Vec::new())),
    ));

    scene.add_child(root, fresh).unwrap();
    scene.add_child(root, inner).unwrap();
    scene.add_child(inner, prebuilt).unwrap();
    scene.add_child(inner, unsorted).unwrap();
    scene.add_child(root, hollow).unwrap();

    let options = OctreeBuildOptions::default().with_leaf_threshold(4);
    let _ = scene.build_octree(prebuilt, &options).unwrap();

    let report = scene.build_octrees_for_subtree(root, &options).unwrap();
    assert_eq!(
        report,
        SubtreeBuildReport {
            built: vec![fresh],
            skipped: vec![prebuilt],
            failed: vec![
                (
                    unsorted,
                    OctreeBuildError::OrderingViolation(OrderingViolation {
                        offset: 0,
                        last_start: 6
                    })
                ),
                (hollow, OctreeBuildError::MissingGeometry),
            ],
        }
    );
    assert!(scene.mesh(fresh).unwrap().octree().is_some());
    assert!(scene.mesh(unsorted).unwrap().octree().is_none());

    // The mesh without an octree is still searched by brute force.
    let ray = Ray::new(Point3::new(10.2, 5.1, 10.0), -Vector3::z());
    let hit = scene.cast_ray_first(inner, &ray, f32::MAX).unwrap();
    assert_eq!(hit.node, unsorted);
    assert_eq!(hit.hit.face_index, 0);
    assert_eq!(hit.hit.distance, 14.0);
}

#[test]
fn octrees_can_only_be_built_for_meshes() {
    let mut scene = Scene::new();
    let group = scene.insert(SceneNode::group(Isometry3::identity()));

    assert!(matches!(
        scene.build_octree(group, &OctreeBuildOptions::default()),
        Err(SceneError::NotAMesh(id)) if id == group
    ));

    let report = scene
        .build_octrees_for_subtree(group, &OctreeBuildOptions::default())
        .unwrap();
    assert_eq!(report, SubtreeBuildReport::default());

    let removed = scene.insert(SceneNode::group(Isometry3::identity()));
    let _ = scene.remove_subtree(removed).unwrap();
    assert_eq!(
        scene.build_octrees_for_subtree(removed, &OctreeBuildOptions::default()),
        Err(SceneError::UnknownNode(removed))
    );
}
