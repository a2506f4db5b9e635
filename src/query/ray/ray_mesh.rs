use crate::math::{Isometry, Real};
use crate::partitioning::Pruning;
use crate::query::{ray_triangle_intersection, Ray, RayHit};
use crate::shape::{HasOctree, Mesh};
use ordered_float::OrderedFloat;

impl Mesh {
    /// Casts a ray, expressed in the local space of this mesh, against its triangle at
    /// `offset`, using the side of its material.
    fn local_ray_hit(&self, ray: &Ray, offset: u32, material_index: usize) -> Option<RayHit> {
        let triangle = self.geometry().triangle(offset)?;
        let inter = ray_triangle_intersection(&triangle, ray, self.side(material_index))?;

        Some(RayHit {
            distance: inter.distance,
            point: ray.point_at(inter.distance),
            normal: inter.normal,
            face_index: offset / 3,
        })
    }

    /// All the hits of a local-space ray closer than `max_distance`, sorted by increasing
    /// distance.
    ///
    /// This tests every triangle of the mesh and ignores its octree.
    pub fn intersect_local_ray_all(&self, ray: &Ray, max_distance: Real) -> Vec<RayHit> {
        let mut hits: Vec<_> = self
            .geometry()
            .triangle_offsets()
            .filter_map(|(offset, material)| self.local_ray_hit(ray, offset, material))
            .filter(|hit| hit.distance < max_distance)
            .collect();

        hits.sort_by_key(|hit| OrderedFloat(hit.distance));
        hits
    }

    /// All the hits of a ray with this mesh placed at `m`, sorted by increasing distance.
    pub fn intersect_ray_all(
        &self,
        m: &Isometry<Real>,
        ray: &Ray,
        max_distance: Real,
    ) -> Vec<RayHit> {
        let ls_ray = ray.inverse_transform_by(m);
        self.intersect_local_ray_all(&ls_ray, max_distance)
            .into_iter()
            .map(|hit| hit.transform_by(m))
            .collect()
    }

    /// The closest hit of a local-space ray, strictly closer than `max_distance`.
    ///
    /// The octree of the mesh is searched if it has one. Otherwise every triangle is tested.
    pub fn cast_local_ray_first(
        &self,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
    ) -> Option<RayHit> {
        if let Some(octree) = self.octree() {
            let geometry = self.geometry();
            // A triangle listed by several groups is hit if any of their sides accepts it.
            return octree.cast_ray(ray, max_distance, pruning, |offset, _| {
                geometry
                    .materials_at(offset)
                    .find_map(|material_index| self.local_ray_hit(ray, offset, material_index))
            });
        }

        let mut best_hit: Option<RayHit> = None;

        for (offset, material_index) in self.geometry().triangle_offsets() {
            if let Some(hit) = self.local_ray_hit(ray, offset, material_index) {
                let best_distance = best_hit.map_or(max_distance, |best| best.distance);
                if hit.distance < best_distance {
                    best_hit = Some(hit);
                }
            }
        }

        best_hit
    }

    /// The closest hit of a ray with this mesh placed at `m`, strictly closer than
    /// `max_distance`.
    ///
    /// The ray is expressed in the local space of the mesh to search its octree, and the hit
    /// is expressed back in the frame of the ray.
    pub fn cast_ray_first(
        &self,
        m: &Isometry<Real>,
        ray: &Ray,
        max_distance: Real,
        pruning: Pruning,
    ) -> Option<RayHit> {
        let ls_ray = ray.inverse_transform_by(m);
        self.cast_local_ray_first(&ls_ray, max_distance, pruning)
            .map(|hit| hit.transform_by(m))
    }
}
