//! Ray casting queries against bounding volumes, meshes, and scene hierarchies.

pub use self::ray::{
    ray_toi_with_sphere, ray_triangle_intersection, Ray, RayCast, RayHit, RayIntersection,
    SceneHit,
};

mod ray;
