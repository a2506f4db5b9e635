use crate::fixtures::{random_pose, random_ray, square, triangle_soup};
use approx::assert_relative_eq;
use na::{Isometry3, Point3, Vector3};
use octoray3d::partitioning::{OctreeBuildOptions, Pruning};
use octoray3d::query::Ray;
use octoray3d::scene::{NodeId, Scene, SceneNode};
use octoray3d::shape::{Mesh, MeshGeometry};

fn down_ray() -> Ray {
    Ray::new(Point3::new(0.3, 0.1, 0.0), -Vector3::z())
}

/// A group with a mesh whose box contains the ray origin (hit at distance 10), and a small
/// square at depth `square_depth` below the ray origin.
fn two_meshes(square_depth: f32) -> (Scene, NodeId, NodeId, NodeId) {
    let mut around = square(Point3::new(0.0, 0.0, -10.0), 1.0);
    around.extend(square(Point3::new(0.0, 0.0, 50.0), 1.0));

    let mut scene = Scene::new();
    let root = scene.insert(SceneNode::group(Isometry3::identity()));
    let first = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(MeshGeometry::new(around)),
    ));
    let second = scene.insert(SceneNode::mesh(
        Isometry3::translation(0.0, 0.0, -square_depth),
        Mesh::new(MeshGeometry::new(square(Point3::origin(), 1.0))),
    ));
    // Inserted last so only the bounds can bring it first.
    scene.add_child(root, second).unwrap();
    scene.add_child(root, first).unwrap();

    (scene, root, first, second)
}

#[test]
fn mesh_containing_the_origin_is_visited_first() {
    let (scene, root, first, second) = two_meshes(20.0);

    assert_eq!(scene.distance_to_bounds(first, &down_ray()), Some(0.0));
    assert_relative_eq!(scene.distance_to_bounds(second, &down_ray()).unwrap(), 20.0);
    let order: Vec<_> = scene
        .ordered_children(root, &down_ray())
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(order, vec![first, second]);

    let (hit, tested) =
        scene.cast_ray_first_traced(root, &down_ray(), f32::MAX, Pruning::BranchAndBound);
    let hit = hit.unwrap();
    assert_eq!(hit.node, first);
    assert_relative_eq!(hit.hit.distance, 10.0);
    // The second mesh cannot be closer than 20.
    assert_eq!(tested, vec![first]);

    let (exhaustive, tested) =
        scene.cast_ray_first_traced(root, &down_ray(), f32::MAX, Pruning::Disabled);
    assert_eq!(exhaustive, Some(hit));
    assert_eq!(tested, vec![first, second]);
}

#[test]
fn closer_mesh_is_still_visited() {
    let (scene, root, first, second) = two_meshes(5.0);

    let (hit, tested) =
        scene.cast_ray_first_traced(root, &down_ray(), f32::MAX, Pruning::BranchAndBound);
    let hit = hit.unwrap();
    assert_eq!(hit.node, second);
    assert_relative_eq!(hit.hit.distance, 5.0);
    assert_relative_eq!(hit.hit.point, Point3::new(0.3, 0.1, -5.0), epsilon = 1.0e-5);
    assert_eq!(tested, vec![first, second]);
}

#[test]
fn max_distance_is_exclusive() {
    let (scene, root, _, second) = two_meshes(5.0);

    assert!(scene.cast_ray_first(root, &down_ray(), 5.0).is_none());
    assert_eq!(
        scene.cast_ray_first(root, &down_ray(), 5.5).map(|hit| hit.node),
        Some(second)
    );
}

#[test]
fn hits_are_expressed_in_world_space() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneNode::group(Isometry3::translation(3.0, 0.0, 0.0)));
    let group = scene.insert(SceneNode::group(Isometry3::rotation(
        Vector3::y() * core::f32::consts::FRAC_PI_2,
    )));
    // Facing +z locally, hence +x once rotated.
    let mesh = scene.insert(SceneNode::mesh(
        Isometry3::translation(0.0, 0.0, 1.0),
        Mesh::new(MeshGeometry::new(square(Point3::origin(), 1.0))),
    ));
    scene.add_child(root, group).unwrap();
    scene.add_child(group, mesh).unwrap();
    let _ = scene.build_octree(mesh, &OctreeBuildOptions::default()).unwrap();

    let ray = Ray::new(Point3::new(10.0, 0.2, 0.3), -Vector3::x());
    let hit = scene.cast_ray_first(root, &ray, f32::MAX).unwrap();

    assert_eq!(hit.node, mesh);
    assert_relative_eq!(hit.hit.distance, 6.0, epsilon = 1.0e-5);
    assert_relative_eq!(hit.hit.point, Point3::new(4.0, 0.2, 0.3), epsilon = 1.0e-5);
    assert_relative_eq!(hit.hit.normal, Vector3::x(), epsilon = 1.0e-5);

    // The same mesh seen from behind is culled.
    let behind = Ray::new(Point3::new(-10.0, 0.2, 0.3), Vector3::x());
    assert!(scene.cast_ray_first(root, &behind, f32::MAX).is_none());
}

#[test]
fn nodes_without_content_are_never_hit() {
    let mut scene = Scene::new();
    let root = scene.insert(SceneNode::group(Isometry3::identity()));
    let marker = scene.insert(SceneNode::empty(Isometry3::identity()));
    let hollow = scene.insert(SceneNode::mesh(
        Isometry3::identity(),
        Mesh::new(MeshGeometry::new(Vec::new())),
    ));
    scene.add_child(root, marker).unwrap();
    scene.add_child(root, hollow).unwrap();

    assert!(scene.ordered_children(root, &down_ray()).is_empty());
    assert!(scene.cast_ray_first(root, &down_ray(), f32::MAX).is_none());
    assert!(scene.cast_ray_first(marker, &down_ray(), f32::MAX).is_none());
    assert!(scene.cast_ray_first(hollow, &down_ray(), f32::MAX).is_none());

    let removed = scene.insert(SceneNode::group(Isometry3::identity()));
    assert_eq!(scene.remove_subtree(removed), Ok(1));
    assert!(scene.cast_ray_first(removed, &down_ray(), f32::MAX).is_none());
}

#[test]
fn scene_search_matches_brute_force_over_all_meshes() {
    let mut rng = oorandom::Rand32::new(2024);
    let mut scene = Scene::new();
    let root = scene.insert(SceneNode::group(Isometry3::identity()));
    let mut groups = vec![root];

    for i in 0..12 {
        let parent = groups[i % groups.len()];
        if i % 4 == 3 {
            let group = scene.insert(SceneNode::group(random_pose(&mut rng, 10.0)));
            scene.add_child(parent, group).unwrap();
            groups.push(group);
        } else {
            let geometry = triangle_soup(&mut rng, 80, 8.0);
            let pose = random_pose(&mut rng, 20.0);
            let mesh = scene.insert(SceneNode::mesh(pose, Mesh::new(geometry)));
            scene.add_child(parent, mesh).unwrap();
            if i % 2 == 0 {
                let options = OctreeBuildOptions::default().with_leaf_threshold(8);
                let _ = scene.build_octree(mesh, &options).unwrap();
            }
        }
    }

    let meshes = all_meshes(&scene, root);
    assert_eq!(meshes.len(), 9);

    let mut hits = 0;

    for i in 0..300 {
        let ray = random_ray(&mut rng, 40.0, i, 7);
        let expected = meshes
            .iter()
            .filter_map(|id| {
                let pos = scene.world_transform(*id)?;
                let hit = scene.mesh(*id)?.intersect_ray_all(&pos, &ray, f32::MAX);
                hit.first().map(|hit| hit.distance)
            })
            .min_by(|a, b| a.total_cmp(b));

        for pruning in [Pruning::BranchAndBound, Pruning::Disabled] {
            let found = scene.cast_ray_first_with(root, &ray, f32::MAX, pruning);
            assert_eq!(expected.is_some(), found.is_some(), "ray {ray:?}");
            if let (Some(expected), Some(found)) = (expected, found) {
                assert_relative_eq!(expected, found.hit.distance, epsilon = 1.0e-3);
            }
        }

        if expected.is_some() {
            hits += 1;
        }
    }

    assert!(hits > 0);
}

fn all_meshes(scene: &Scene, root: NodeId) -> Vec<NodeId> {
    let mut stack = vec![root];
    let mut meshes = Vec::new();

    while let Some(id) = stack.pop() {
        let node = scene.get(id).unwrap();
        if node.as_mesh().is_some() {
            meshes.push(id);
        }
        stack.extend_from_slice(node.children());
    }

    meshes
}
