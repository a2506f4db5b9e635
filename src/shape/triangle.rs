//! Triangles read out of a mesh geometry.

use crate::math::{Point, Real, Vector};
use na::Unit;

/// A triangle, with its vertices in counter-clockwise order when seen from its front face.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The first vertex.
    pub a: Point<Real>,
    /// The second vertex.
    pub b: Point<Real>,
    /// The third vertex.
    pub c: Point<Real>,
}

impl Triangle {
    /// The triangle `a, b, c`.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// `AB × AC`: normal to the front face, with a norm of twice the area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The unit normal of the front face, or `None` if the triangle is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<Unit<Vector<Real>>> {
        Unit::try_new(self.scaled_normal(), crate::math::DEFAULT_EPSILON)
    }
}
