use crate::query::{Ray, RayIntersection};
use crate::shape::{Side, Triangle};

/// Computes the intersection between a ray and a triangle.
///
/// The front face of the triangle is the one whose normal, following the counter-clockwise
/// winding `a, b, c`, points against the ray direction. Only the faces allowed by `side` can
/// be hit. Degenerate triangles and rays parallel to the triangle plane never hit.
pub fn ray_triangle_intersection(
    triangle: &Triangle,
    ray: &Ray,
    side: Side,
) -> Option<RayIntersection> {
    let ab = triangle.b - triangle.a;
    let ac = triangle.c - triangle.a;
    let n = triangle.scaled_normal();
    let d = n.dot(&ray.dir);

    let accepted = match side {
        Side::Front => d < 0.0,
        Side::Back => d > 0.0,
        Side::Double => d != 0.0,
    };

    if !accepted {
        return None;
    }

    let ap = ray.origin - triangle.a;
    let t = ap.dot(&n);

    // The origin is behind the face the ray points at.
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    // Barycentric coordinates, scaled by |d|.
    let e = -ray.dir.cross(&ap);
    let abs_d = d.abs();

    let (v, w, distance) = if d > 0.0 {
        (-ac.dot(&e), ab.dot(&e), -t / abs_d)
    } else {
        (ac.dot(&e), -ab.dot(&e), t / abs_d)
    };

    if v < 0.0 || v > abs_d || w < 0.0 || v + w > abs_d {
        return None;
    }

    Some(RayIntersection {
        distance,
        normal: n.normalize(),
    })
}
