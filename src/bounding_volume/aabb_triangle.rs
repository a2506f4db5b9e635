use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DIM};
use crate::shape::Triangle;

impl Triangle {
    /// Computes the local-space [`Aabb`] of this triangle.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let a = self.a.coords;
        let b = self.b.coords;
        let c = self.c.coords;

        let mut min = Point::origin();
        let mut max = Point::origin();

        for d in 0..DIM {
            min[d] = a[d].min(b[d]).min(c[d]);
            max[d] = a[d].max(b[d]).max(c[d]);
        }

        Aabb::new(min, max)
    }
}

/// Tests whether an AABB and a triangle overlap, using the separating axis theorem.
///
/// The 13 candidate axes are the three box face normals, the triangle normal, and the nine
/// cross products between the box axes and the triangle edges. Touching counts as an
/// overlap, so a triangle lying exactly on the face shared by two boxes overlaps both.
pub fn aabb_intersects_triangle(aabb: &Aabb, triangle: &Triangle) -> bool {
    let center = aabb.center();
    let half_extents = aabb.half_extents();
    let verts = [
        triangle.a - center,
        triangle.b - center,
        triangle.c - center,
    ];

    // Box face normals: compare the triangle AABB with the box.
    for i in 0..DIM {
        let min = verts[0][i].min(verts[1][i]).min(verts[2][i]);
        let max = verts[0][i].max(verts[1][i]).max(verts[2][i]);

        if min > half_extents[i] || max < -half_extents[i] {
            return false;
        }
    }

    let edges = [
        verts[1] - verts[0],
        verts[2] - verts[1],
        verts[0] - verts[2],
    ];

    // Triangle plane.
    let normal = edges[0].cross(&edges[1]);
    let plane_dist = normal.dot(&verts[0]);
    if plane_dist.abs() > half_extents.dot(&normal.abs()) {
        return false;
    }

    // Edge-edge axes.
    for edge in &edges {
        for i in 0..DIM {
            let axis = Vector::ith(i, 1.0).cross(edge);
            if is_separating_axis(&axis, &verts, &half_extents) {
                return false;
            }
        }
    }

    true
}

#[inline]
fn is_separating_axis(
    axis: &Vector<Real>,
    verts: &[Vector<Real>; 3],
    half_extents: &Vector<Real>,
) -> bool {
    let p0 = axis.dot(&verts[0]);
    let p1 = axis.dot(&verts[1]);
    let p2 = axis.dot(&verts[2]);
    let radius = half_extents.dot(&axis.abs());

    p0.min(p1).min(p2) > radius || p0.max(p1).max(p2) < -radius
}
