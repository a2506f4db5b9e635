use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::partitioning::{
    OctreeBuildError, OctreeBuildOptions, OctreeBuilder, OctreeRepr, OctreeReprError,
    SpatialOctree,
};
use crate::shape::MeshGeometry;

/// The faces of a triangle that can be hit by a ray.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Side {
    /// Only the face whose normal (following the counter-clockwise winding) points against
    /// the ray direction.
    #[default]
    Front,
    /// Only the face whose normal points along the ray direction.
    Back,
    /// Both faces.
    Double,
}

/// Capability of shapes with a local-space bounding volume.
pub trait HasBounds {
    /// The local-space AABB, or `None` if the shape is empty.
    fn local_aabb(&self) -> Option<Aabb>;
    /// A local-space bounding sphere, or `None` if the shape is empty.
    fn local_bounding_sphere(&self) -> Option<BoundingSphere>;
}

/// Capability of shapes optionally owning a spatial index over their triangles.
pub trait HasOctree {
    /// The spatial index, if one was built or attached.
    fn octree(&self) -> Option<&SpatialOctree>;
    /// Removes the spatial index and returns it.
    fn take_octree(&mut self) -> Option<SpatialOctree>;
}

/// A triangle mesh: a geometry, the faces each of its materials exposes, and an optional
/// octree accelerating ray casts against the geometry.
#[derive(Clone, Debug)]
pub struct Mesh {
    geometry: MeshGeometry,
    sides: Vec<Side>,
    octree: Option<SpatialOctree>,
}

impl Mesh {
    /// A mesh exposing the front faces of all its materials.
    pub fn new(geometry: MeshGeometry) -> Self {
        Self {
            geometry,
            sides: vec![Side::Front],
            octree: None,
        }
    }

    /// Sets the same side for all the materials.
    pub fn with_side(mut self, side: Side) -> Self {
        self.sides = vec![side];
        self
    }

    /// Sets one side per material index.
    pub fn with_sides(mut self, sides: Vec<Side>) -> Self {
        self.sides = sides;
        self
    }

    /// The geometry of this mesh.
    #[inline]
    pub fn geometry(&self) -> &MeshGeometry {
        &self.geometry
    }

    /// Replaces the geometry of this mesh.
    ///
    /// The octree no longer matches the geometry and is dropped.
    pub fn set_geometry(&mut self, geometry: MeshGeometry) {
        self.geometry = geometry;
        self.octree = None;
    }

    /// The side exposed by the material `material_index`.
    ///
    /// Materials without an explicit side use the first one.
    pub fn side(&self, material_index: usize) -> Side {
        self.sides
            .get(material_index)
            .or_else(|| self.sides.first())
            .copied()
            .unwrap_or_default()
    }

    /// Builds the octree of this mesh, replacing any existing one.
    pub fn build_octree(
        &mut self,
        options: &OctreeBuildOptions,
    ) -> Result<&SpatialOctree, OctreeBuildError> {
        let octree = OctreeBuilder::new(*options).build(&self.geometry)?;
        Ok(self.octree.insert(octree))
    }

    /// Attaches a previously persisted octree to this mesh, replacing any existing one.
    ///
    /// The persisted form is validated, and every triangle it lists must exist in the geometry.
    pub fn attach_octree(&mut self, repr: &OctreeRepr) -> Result<(), OctreeReprError> {
        let octree = SpatialOctree::from_repr(repr)?;
        let index_count = self.geometry.index_count();

        for (_, indices) in octree.leaves() {
            for range in indices.ranges() {
                if range.end as usize + 3 > index_count {
                    return Err(OctreeReprError::OffsetOutOfBounds {
                        offset: range.end,
                        index_count,
                    });
                }
            }
        }

        self.octree = Some(octree);
        Ok(())
    }
}

impl HasBounds for Mesh {
    #[inline]
    fn local_aabb(&self) -> Option<Aabb> {
        self.geometry.local_aabb()
    }

    #[inline]
    fn local_bounding_sphere(&self) -> Option<BoundingSphere> {
        self.geometry.local_bounding_sphere()
    }
}

impl HasOctree for Mesh {
    #[inline]
    fn octree(&self) -> Option<&SpatialOctree> {
        self.octree.as_ref()
    }

    #[inline]
    fn take_octree(&mut self) -> Option<SpatialOctree> {
        self.octree.take()
    }
}
