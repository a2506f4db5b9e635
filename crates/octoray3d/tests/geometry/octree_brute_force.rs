use crate::fixtures::{random_pose, random_ray, triangle_soup};
use approx::assert_relative_eq;
use octoray3d::partitioning::{OctreeBuildOptions, Pruning};
use octoray3d::shape::{HasOctree, Mesh, Side};

fn check_against_brute_force(seed: u64, side: Side, leaf_threshold: usize) {
    let mut rng = oorandom::Rand32::new(seed);
    let geometry = triangle_soup(&mut rng, 500, 20.0);
    let pos = random_pose(&mut rng, 10.0);

    let brute = Mesh::new(geometry.clone()).with_side(side);
    let mut indexed = Mesh::new(geometry).with_side(side);
    let options = OctreeBuildOptions::default().with_leaf_threshold(leaf_threshold);
    let _ = indexed.build_octree(&options).unwrap();
    assert!(indexed.octree().unwrap().leaf_count() > 1);

    let mut hits = 0;
    let mut misses = 0;

    for i in 0..300 {
        let ray = random_ray(&mut rng, 30.0, i, 10).transform_by(&pos);
        let expected = brute.cast_ray_first(&pos, &ray, f32::MAX, Pruning::default());

        for pruning in [Pruning::BranchAndBound, Pruning::Disabled] {
            let found = indexed.cast_ray_first(&pos, &ray, f32::MAX, pruning);

            match (expected, found) {
                (Some(expected), Some(found)) => {
                    assert_relative_eq!(expected.distance, found.distance, epsilon = 1.0e-4);
                    assert_relative_eq!(expected.point, found.point, epsilon = 1.0e-3);
                }
                (None, None) => {}
                _ => panic!("ray {ray:?}: brute force found {expected:?}, octree found {found:?}"),
            }
        }

        if expected.is_some() {
            hits += 1;
        } else {
            misses += 1;
        }
    }

    assert!(hits > 0);
    assert!(misses > 0);
}

#[test]
fn octree_matches_brute_force_on_front_faces() {
    check_against_brute_force(42, Side::Front, 16);
}

#[test]
fn octree_matches_brute_force_on_both_faces() {
    check_against_brute_force(1234, Side::Double, 16);
}

#[test]
fn octree_matches_brute_force_with_deep_trees() {
    check_against_brute_force(7, Side::Double, 3);
}

#[test]
fn closest_hit_is_the_first_of_all_hits() {
    let mut rng = oorandom::Rand32::new(99);
    let geometry = triangle_soup(&mut rng, 300, 10.0);
    let pos = random_pose(&mut rng, 5.0);
    let mut mesh = Mesh::new(geometry).with_side(Side::Double);
    let _ = mesh.build_octree(&OctreeBuildOptions::default().with_leaf_threshold(8)).unwrap();

    for i in 1..100 {
        let ray = random_ray(&mut rng, 15.0, i, 1000).transform_by(&pos);
        let all = mesh.intersect_ray_all(&pos, &ray, f32::MAX);
        let first = mesh.cast_ray_first(&pos, &ray, f32::MAX, Pruning::default());

        assert!(all.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert_eq!(all.is_empty(), first.is_none());
        if let (Some(closest), Some(first)) = (all.first(), first) {
            assert_relative_eq!(closest.distance, first.distance, epsilon = 1.0e-4);
        }
    }
}
