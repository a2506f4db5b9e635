//! Rays, ray hits, and the ray casting trait of bounding volumes.

use crate::math::{Isometry, Point, Real, Vector};

/// A half-line starting at `origin` and following `dir`.
///
/// The direction is kept normalized, so times of impact along a ray are distances.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Unit direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// The ray starting at `origin` toward `dir`, normalized. A zero direction results in a ray that can only hit
    /// shapes containing its origin.
    ///
    /// ```
    /// use octoray3d::math::{Point, Vector};
    /// use octoray3d::query::Ray;
    ///
    /// let ray = Ray::new(Point::origin(), Vector::new(0.0, 3.0, 0.0));
    /// assert_eq!(ray.dir, Vector::y());
    /// ```
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray {
            origin,
            dir: dir.try_normalize(0.0).unwrap_or_else(Vector::zeros),
        }
    }

    /// This ray moved by `m`, e.g. from local to world space.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Ray {
            origin: m * self.origin,
            dir: m * self.dir,
        }
    }

    /// This world-space ray expressed in the local space of an object placed at `m`.
    #[inline]
    pub fn inverse_transform_by(&self, m: &Isometry<Real>) -> Self {
        Ray {
            origin: m.inverse_transform_point(&self.origin),
            dir: m.inverse_transform_vector(&self.dir),
        }
    }

    /// The point at distance `t` along this ray.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// A ray crossing a triangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayIntersection {
    /// The distance between the ray origin and the hit point.
    pub distance: Real,
    /// The unit normal of the hit face, following its counter-clockwise winding.
    ///
    /// This is not flipped toward the ray when the back face of the triangle is hit.
    pub normal: Vector<Real>,
}

/// The closest hit of a ray with the triangles of a mesh.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// The distance between the ray origin and `point`.
    pub distance: Real,
    /// The hit point.
    pub point: Point<Real>,
    /// The unit normal of the hit face.
    pub normal: Vector<Real>,
    /// The index of the hit triangle (its triangle-start offset divided by 3).
    pub face_index: u32,
}

impl RayHit {
    /// This hit moved by `m`. Rigid motions keep `distance`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        RayHit {
            distance: self.distance,
            point: m * self.point,
            normal: m * self.normal,
            face_index: self.face_index,
        }
    }
}

/// Volumes a ray can be cast against, to order and prune the content they enclose.
pub trait RayCast {
    /// The distance along `ray` at which it enters this volume, `ray` being expressed in
    /// the local space of the volume.
    ///
    /// With `solid`, a ray starting inside is reported at distance 0, otherwise at the
    /// distance where it leaves. Entries beyond `max_time_of_impact` are ignored.
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool) -> Option<Real>;

    /// Does `ray` reach this volume before `max_time_of_impact`?
    #[inline]
    fn intersects_local_ray(&self, ray: &Ray, max_time_of_impact: Real) -> bool {
        self.cast_local_ray(ray, max_time_of_impact, true).is_some()
    }

    /// Same as [`Self::cast_local_ray`] with a world-space ray and the volume placed at `m`.
    #[inline]
    fn cast_ray(
        &self,
        m: &Isometry<Real>,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
    ) -> Option<Real> {
        let ls_ray = ray.inverse_transform_by(m);
        self.cast_local_ray(&ls_ray, max_time_of_impact, solid)
    }
}
