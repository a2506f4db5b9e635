use crate::bounding_volume::BoundingSphere;
use crate::math::{Point, Real};
use crate::query::{Ray, RayCast};
use num::Zero;

impl RayCast for BoundingSphere {
    #[inline]
    fn cast_local_ray(&self, ray: &Ray, max_toi: Real, solid: bool) -> Option<Real> {
        ray_toi_with_sphere(self.center(), self.radius(), ray, solid).filter(|toi| *toi <= max_toi)
    }
}

/// Computes the time of impact of a ray on a sphere.
///
/// If the ray starts inside the sphere, the time of impact is 0 if `solid` is `true`, and
/// the time at which the ray leaves the sphere otherwise.
#[inline]
pub fn ray_toi_with_sphere(
    center: &Point<Real>,
    radius: Real,
    ray: &Ray,
    solid: bool,
) -> Option<Real> {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    if a.is_zero() {
        return if c > 0.0 { None } else { Some(0.0) };
    }

    if c > 0.0 && b > 0.0 {
        return None;
    }

    let delta = b * b - a * c;

    if delta < 0.0 {
        return None;
    }

    let t = (-b - delta.sqrt()) / a;

    if t <= 0.0 {
        // The origin is inside the sphere.
        if solid {
            Some(0.0)
        } else {
            Some((-b + delta.sqrt()) / a)
        }
    } else {
        Some(t)
    }
}
