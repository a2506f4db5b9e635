//! Storage of the triangles of a mesh.

use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Point, Real};
use crate::shape::Triangle;

/// A run of triangle-start offsets sharing the same material.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeometryGroup {
    /// The first vertex reference of the group.
    pub start: u32,
    /// The number of vertex references of the group.
    pub count: u32,
    /// The material used by the triangles of the group.
    pub material_index: usize,
}

impl GeometryGroup {
    /// Creates a new group.
    pub fn new(start: u32, count: u32, material_index: usize) -> Self {
        Self {
            start,
            count,
            material_index,
        }
    }
}

/// The portion of the vertex references actually drawn (and queried).
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct DrawRange {
    /// The first vertex reference of the range.
    pub start: u32,
    /// The number of vertex references of the range, or `None` for "up to the end".
    pub count: Option<u32>,
}

impl DrawRange {
    /// A range starting at `start` and covering `count` vertex references.
    pub fn new(start: u32, count: u32) -> Self {
        Self {
            start,
            count: Some(count),
        }
    }

    fn end(&self) -> u64 {
        self.count
            .map_or(u64::MAX, |count| self.start as u64 + count as u64)
    }
}

/// The vertex positions and triangles of a mesh, in its local space.
///
/// Triangles are addressed by their *triangle-start offset*: the position of their first
/// vertex reference in the index buffer, or in the vertex buffer if the geometry is not
/// indexed. Offsets are always multiples of 3.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGeometry {
    vertices: Vec<Point<Real>>,
    indices: Option<Vec<u32>>,
    groups: Vec<GeometryGroup>,
    draw_range: DrawRange,
    aabb: Option<Aabb>,
    bounding_sphere: Option<BoundingSphere>,
}

impl MeshGeometry {
    /// A non-indexed geometry: each consecutive triplet of vertices forms a triangle.
    pub fn new(vertices: Vec<Point<Real>>) -> Self {
        let (aabb, bounding_sphere) = local_bounds(&vertices);

        Self {
            vertices,
            indices: None,
            groups: Vec::new(),
            draw_range: DrawRange::default(),
            aabb,
            bounding_sphere,
        }
    }

    /// An indexed geometry: each consecutive triplet of indices forms a triangle.
    pub fn indexed(vertices: Vec<Point<Real>>, indices: Vec<u32>) -> Self {
        Self::new(vertices).with_indices(indices)
    }

    /// Sets the index buffer of this geometry.
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Sets the material groups of this geometry.
    pub fn with_groups(mut self, groups: Vec<GeometryGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets the draw range of this geometry.
    pub fn with_draw_range(mut self, draw_range: DrawRange) -> Self {
        self.draw_range = draw_range;
        self
    }

    /// The vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer, if this geometry is indexed.
    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// The material groups.
    #[inline]
    pub fn groups(&self) -> &[GeometryGroup] {
        &self.groups
    }

    /// The draw range.
    #[inline]
    pub fn draw_range(&self) -> DrawRange {
        self.draw_range
    }

    /// Does this geometry have no vertex?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The number of vertex references: the length of the index buffer if there is one,
    /// the number of vertices otherwise.
    #[inline]
    pub fn index_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertices.len(),
        }
    }

    /// The triangle starting at the vertex reference `offset`.
    ///
    /// Returns `None` if the triangle references vertices that do not exist.
    pub fn triangle(&self, offset: u32) -> Option<Triangle> {
        let offset = offset as usize;
        let ids = match &self.indices {
            Some(indices) => {
                let ids = indices.get(offset..offset.checked_add(3)?)?;
                [ids[0] as usize, ids[1] as usize, ids[2] as usize]
            }
            None => [offset, offset + 1, offset + 2],
        };

        Some(Triangle::new(
            *self.vertices.get(ids[0])?,
            *self.vertices.get(ids[1])?,
            *self.vertices.get(ids[2])?,
        ))
    }

    /// The materials under which the triangle at `offset` is listed by
    /// [`Self::triangle_offsets`], once per group listing it.
    ///
    /// Overlapping groups list a triangle several times, possibly with different materials.
    pub fn materials_at(&self, offset: u32) -> impl Iterator<Item = usize> + '_ {
        let offset = offset as u64;
        self.triangle_spans()
            .into_iter()
            .filter(move |(start, end, _)| {
                offset % 3 == 0 && offset >= *start && offset + 3 <= *end
            })
            .map(|(_, _, material_index)| material_index)
    }

    /// Iterates through the triangle-start offsets of this geometry, paired with their
    /// material index.
    ///
    /// Only the triangles inside the draw range are listed. If the geometry has groups, the
    /// groups are walked in their order and their triangles clipped to the draw range;
    /// otherwise all the triangles of the draw range are listed with material 0.
    pub fn triangle_offsets(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.triangle_spans()
            .into_iter()
            .flat_map(|(start, end, material_index)| {
                // Triangles start on multiples of 3 and must fit entirely in the span.
                let first = start.div_ceil(3) * 3;
                (first..end)
                    .step_by(3)
                    .take_while(move |offset| offset + 3 <= end)
                    .map(move |offset| (offset as u32, material_index))
            })
    }

    /// The `[start, end)` vertex reference spans drawn with each material, in group order.
    fn triangle_spans(&self) -> Vec<(u64, u64, usize)> {
        let index_count = self.index_count() as u64;
        let draw_start = self.draw_range.start as u64;
        let draw_end = self.draw_range.end();

        if self.groups.is_empty() {
            return vec![(draw_start, draw_end.min(index_count), 0)];
        }

        self.groups
            .iter()
            .map(|group| {
                let start = (group.start as u64).max(draw_start);
                let end = (group.start as u64 + group.count as u64)
                    .min(draw_end)
                    .min(index_count);
                (start, end, group.material_index)
            })
            .collect()
    }

    /// The number of triangles listed by [`Self::triangle_offsets`].
    pub fn triangle_count(&self) -> usize {
        self.triangle_offsets().count()
    }

    /// The AABB of the vertices, or `None` if there are none.
    #[inline]
    pub fn local_aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    /// A bounding sphere of the vertices, or `None` if there are none.
    ///
    /// It is centered on the center of the AABB, and not necessarily minimal.
    #[inline]
    pub fn local_bounding_sphere(&self) -> Option<BoundingSphere> {
        self.bounding_sphere
    }
}

fn local_bounds(vertices: &[Point<Real>]) -> (Option<Aabb>, Option<BoundingSphere>) {
    let aabb = Aabb::from_points(vertices.iter().copied());

    if aabb.is_valid() {
        (Some(aabb), BoundingSphere::from_points(vertices))
    } else {
        (None, None)
    }
}
