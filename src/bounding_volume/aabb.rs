//! Axis Aligned Bounding Box.

use crate::bounding_volume::{BoundingSphere, BoundingVolume};
use crate::math::{Isometry, Point, Real, Vector, DIM};
use num::Bounded;

/// An Axis-Aligned Bounding Box.
///
/// An AABB is the smallest box, with edges parallel to the coordinate axes,
/// enclosing a shape. It is the bounding volume used by the octree nodes and
/// by the scene bounds cache.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of the box.
    pub mins: Point<Real>,
    /// The point with the largest coordinates of the box.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// The box spanning from `mins` to `maxs`, which should be smaller on every axis.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// An inverted box, neutral for [`Aabb::take_point`] and [`BoundingVolume::merge`].
    ///
    /// It fails [`Aabb::is_valid`] until a point is taken into it.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// The tightest box around `pts`, or an invalid one if there are no points.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Returns `true` if `mins <= maxs` on every axis and all components are finite.
    pub fn is_valid(&self) -> bool {
        (0..DIM).all(|i| {
            self.mins[i].is_finite() && self.maxs[i].is_finite() && self.mins[i] <= self.maxs[i]
        })
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The axis-aligned box enclosing this box once moved by `pos`.
    ///
    /// Rotations grow the box: each world half-extent sums the absolute projections of
    /// the local ones.
    #[inline]
    pub fn transform_by(&self, pos: &Isometry<Real>) -> Self {
        let center = pos * self.center();
        let rot = pos.rotation.to_rotation_matrix();
        let half_extents = rot.matrix().abs() * self.half_extents();

        Aabb::new(center - half_extents, center + half_extents)
    }

    /// The sphere passing through the corners of this box.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.extents().norm() * 0.5)
    }

    /// Is `point` inside this box or on its boundary?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Splits this AABB into its 8 octants.
    ///
    /// Each octant spans from the center of `self` to one of its corners. The
    /// octant `i` lies on the positive side of the axis `k` iff the bit `k` of
    /// `i` is set.
    pub fn split_at_center(&self) -> [Aabb; 8] {
        let center = self.center();

        core::array::from_fn(|i| {
            let mut mins = self.mins;
            let mut maxs = self.maxs;

            for k in 0..DIM {
                if i & (1 << k) == 0 {
                    maxs[k] = center[k];
                } else {
                    mins[k] = center[k];
                }
            }

            Aabb::new(mins, maxs)
        })
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}
