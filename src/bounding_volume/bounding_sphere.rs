//! Spheres enclosing meshes and scene subtrees.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Point, Real};
use num::Zero;

/// A sphere enclosing some content.
///
/// Scene nodes keep one next to their AABB: for elongated or rotated content, the
/// sphere is sometimes the tighter of the two.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingSphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// The sphere of the given center and radius.
    pub fn new(center: Point<Real>, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// A sphere around a point cloud, or `None` if `pts` is empty.
    ///
    /// It is centered on the AABB center of the points and reaches the farthest one. It is
    /// not minimal.
    pub fn from_points(pts: &[Point<Real>]) -> Option<BoundingSphere> {
        if pts.is_empty() {
            return None;
        }

        let center = Aabb::from_points(pts.iter().copied()).center();
        let radius_sq = pts
            .iter()
            .map(|pt| na::distance_squared(&center, pt))
            .fold(0.0, Real::max);

        Some(BoundingSphere::new(center, radius_sq.sqrt()))
    }

    /// The center.
    #[inline]
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The radius.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// This sphere moved by `pos`. Rigid motions keep the radius.
    #[inline]
    pub fn transform_by(&self, pos: &Isometry<Real>) -> BoundingSphere {
        BoundingSphere::new(pos * self.center, self.radius)
    }
}

impl BoundingVolume for BoundingSphere {
    #[inline]
    fn center(&self) -> Point<Real> {
        *self.center()
    }

    #[inline]
    fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        na::distance_squared(&self.center, &other.center) <= reach * reach
    }

    #[inline]
    fn contains(&self, other: &BoundingSphere) -> bool {
        na::distance(&self.center, &other.center) + other.radius <= self.radius
    }

    fn merge(&mut self, other: &BoundingSphere) {
        let mut dir = other.center - self.center;
        let norm = dir.normalize_mut();

        if norm.is_zero() {
            self.radius = self.radius.max(other.radius);
            return;
        }

        // Farthest points of both spheres along the line joining their centers.
        let self_proj = self.center.coords.dot(&dir);
        let other_proj = other.center.coords.dot(&dir);

        let far = if self_proj + self.radius > other_proj + other.radius {
            self.center + dir * self.radius
        } else {
            other.center + dir * other.radius
        };
        let near = if self.radius - self_proj > other.radius - other_proj {
            self.center - dir * self.radius
        } else {
            other.center - dir * other.radius
        };

        self.center = na::center(&near, &far);
        self.radius = na::distance(&far, &self.center);
    }

    #[inline]
    fn merged(&self, other: &BoundingSphere) -> BoundingSphere {
        let mut res = *self;
        res.merge(other);
        res
    }
}
