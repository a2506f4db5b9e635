/*!
octoray
========

**octoray** answers "first hit along a ray" queries against triangle meshes
and hierarchies of meshes.

Each mesh may carry a [`SpatialOctree`](partitioning::SpatialOctree) over its
triangles, searched with a nearest-first branch-and-bound traversal. Scene
hierarchies are searched the same way, ordering and pruning whole subtrees
with lazily cached bounding boxes and spheres before delegating to the mesh
index (or to a brute-force scan when a mesh has no index).

```
use octoray3d::math::{Isometry, Point, Vector};
use octoray3d::query::Ray;
use octoray3d::scene::{Scene, SceneNode};
use octoray3d::shape::{Mesh, MeshGeometry};
use octoray3d::partitioning::OctreeBuildOptions;

let geometry = MeshGeometry::new(vec![
    Point::new(-1.0, -1.0, 0.0),
    Point::new(1.0, -1.0, 0.0),
    Point::new(0.0, 1.0, 0.0),
]);

let mut scene = Scene::new();
let root = scene.insert(SceneNode::group(Isometry::identity()));
let mesh = scene.insert(SceneNode::mesh(Isometry::identity(), Mesh::new(geometry)));
scene.add_child(root, mesh).unwrap();
scene.build_octree(mesh, &OctreeBuildOptions::default()).unwrap();

let ray = Ray::new(Point::new(0.0, 0.0, 5.0), -Vector::z());
let hit = scene.cast_ray_first(root, &ray, 100.0).unwrap();
assert_eq!(hit.node, mesh);
assert_eq!(hit.hit.face_index, 0);
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;
#[cfg(test)]
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;
pub mod query;
pub mod scene;
pub mod shape;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use na::{Isometry3, Point3, UnitVector3, Vector3};

    /// The scalar type used throughout this crate.
    pub type Real = f32;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The transformation type: a rigid translation + rotation.
    pub use Isometry3 as Isometry;
}
