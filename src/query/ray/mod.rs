//! Ray casting.

#[doc(inline)]
pub use self::ray::{Ray, RayCast, RayHit, RayIntersection};
pub use self::ray_bounding_sphere::ray_toi_with_sphere;
pub use self::ray_scene::SceneHit;
pub use self::ray_triangle::ray_triangle_intersection;

#[doc(hidden)]
pub mod ray;
mod ray_aabb;
mod ray_bounding_sphere;
mod ray_mesh;
mod ray_scene;
mod ray_triangle;
