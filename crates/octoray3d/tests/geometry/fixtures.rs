use na::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use octoray3d::query::Ray;
use octoray3d::shape::MeshGeometry;

pub fn random_point(rng: &mut oorandom::Rand32, extent: f32) -> Point3<f32> {
    Point3::from(Vector3::from_fn(|_, _| (rng.rand_float() - 0.5) * extent))
}

/// `count` small triangles scattered in a cube of side `extent` centered on the origin.
pub fn triangle_soup(rng: &mut oorandom::Rand32, count: usize, extent: f32) -> MeshGeometry {
    let mut vertices = Vec::with_capacity(count * 3);

    for _ in 0..count {
        let a = random_point(rng, extent);
        vertices.push(a);
        vertices.push(a + random_point(rng, 2.0).coords);
        vertices.push(a + random_point(rng, 2.0).coords);
    }

    MeshGeometry::new(vertices)
}

/// A square of side `2 * half_side` in the plane `z = z`, facing +z.
pub fn square(center: Point3<f32>, half_side: f32) -> Vec<Point3<f32>> {
    let corner = |x: f32, y: f32| center + Vector3::new(x * half_side, y * half_side, 0.0);
    vec![
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, -1.0),
        corner(1.0, 1.0),
        corner(-1.0, 1.0),
    ]
}

pub fn random_pose(rng: &mut oorandom::Rand32, extent: f32) -> Isometry3<f32> {
    let rotation = na::Unit::try_new(
        na::Quaternion::new(
            rng.rand_float(),
            rng.rand_float(),
            rng.rand_float(),
            rng.rand_float(),
        ),
        1.0e-5,
    )
    .unwrap_or(UnitQuaternion::identity());
    let translation = Translation3::from(random_point(rng, extent).coords);
    Isometry3::from_parts(translation, rotation)
}

/// A ray starting on a sphere of radius `radius`, aimed at a random point of the cube of
/// side `radius`, or away from it once every `miss_every` rays.
pub fn random_ray(rng: &mut oorandom::Rand32, radius: f32, i: usize, miss_every: usize) -> Ray {
    let dir = Vector3::from_fn(|_, _| rng.rand_float() - 0.5);
    let origin = Point3::from(dir.try_normalize(1.0e-6).unwrap_or(Vector3::x()) * radius);
    let target = random_point(rng, radius);

    if i % miss_every == 0 {
        Ray::new(origin, origin - target)
    } else {
        Ray::new(origin, target - origin)
    }
}
