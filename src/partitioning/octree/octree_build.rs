use super::{IndexRangeSet, OctreeNode, OrderingViolation, SpatialOctree};
use crate::bounding_volume::{aabb_intersects_triangle, Aabb};
use crate::shape::MeshGeometry;

/// Indicates an inconsistency while building an octree.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum OctreeBuildError {
    /// Triangle offsets were not given in ascending order.
    #[error("unordered triangle offsets: {0}")]
    OrderingViolation(#[from] OrderingViolation),
    /// A node with triangles could not assign any of them to its octants.
    ///
    /// This reveals an inconsistency of the box-triangle overlap test, not a user error.
    #[error("the node at depth {depth} lists {triangles} triangles but none overlaps its octants.")]
    EmptyPartition {
        /// The depth of the faulty node.
        depth: usize,
        /// The number of triangles of the faulty node.
        triangles: usize,
    },
    /// The mesh has no vertex.
    #[error("the mesh has no geometry to index.")]
    MissingGeometry,
    /// A triangle references a vertex that does not exist.
    #[error("the triangle at offset {offset} references a missing vertex.")]
    InvalidIndex {
        /// The offset of the faulty triangle.
        offset: u32,
    },
}

/// Parameters of the octree construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OctreeBuildOptions {
    /// Nodes with fewer triangles than this become leaves.
    ///
    /// Nodes that share all the triangles of their parent with a sibling also become leaves
    /// whatever their triangle count: splitting them would only duplicate their triangles.
    pub leaf_threshold: usize,
    /// The maximum depth of a leaf, the root being at depth 0.
    ///
    /// Nodes reaching this depth become leaves whatever their triangle count. This bounds
    /// the recursion on degenerate geometry, e.g., many coincident triangles.
    pub max_depth: usize,
}

impl Default for OctreeBuildOptions {
    fn default() -> Self {
        Self {
            leaf_threshold: 100_000,
            max_depth: 16,
        }
    }
}

impl OctreeBuildOptions {
    /// Sets the leaf threshold.
    pub fn with_leaf_threshold(mut self, leaf_threshold: usize) -> Self {
        self.leaf_threshold = leaf_threshold;
        self
    }

    /// Sets the maximum depth. A depth of 0 is treated as 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Builds the octree of a mesh geometry.
#[derive(Copy, Clone, Debug, Default)]
pub struct OctreeBuilder {
    options: OctreeBuildOptions,
}

#[derive(Default)]
struct BuildStats {
    internal_nodes: usize,
    leaves: usize,
    participations: usize,
    forced_leaves: usize,
}

impl OctreeBuilder {
    /// A builder using the given options.
    pub fn new(options: OctreeBuildOptions) -> Self {
        Self { options }
    }

    /// The options of this builder.
    pub fn options(&self) -> &OctreeBuildOptions {
        &self.options
    }

    /// Builds the octree of `geometry`, covering the local AABB of the geometry.
    pub fn build(&self, geometry: &MeshGeometry) -> Result<SpatialOctree, OctreeBuildError> {
        let aabb = geometry
            .local_aabb()
            .ok_or(OctreeBuildError::MissingGeometry)?;
        self.build_in_bounds(geometry, aabb)
    }

    /// Builds the octree of `geometry`, with a root covering `aabb`.
    ///
    /// Triangles that do not overlap `aabb` are not indexed.
    pub fn build_in_bounds(
        &self,
        geometry: &MeshGeometry,
        aabb: Aabb,
    ) -> Result<SpatialOctree, OctreeBuildError> {
        if geometry.is_empty() {
            return Err(OctreeBuildError::MissingGeometry);
        }

        let mut indices = IndexRangeSet::new();
        for (offset, _) in geometry.triangle_offsets() {
            let triangle = geometry
                .triangle(offset)
                .ok_or(OctreeBuildError::InvalidIndex { offset })?;

            if aabb_intersects_triangle(&aabb, &triangle) {
                indices.add(offset)?;
            }
        }

        let mut stats = BuildStats::default();
        let root = self.build_node(geometry, aabb, &indices, 0, &mut stats)?;
        let octree = SpatialOctree::from_root(root);

        log::debug!(
            "built octree over {} triangles: {} internal nodes, {} leaves, depth {}, {} triangle participations",
            indices.count(),
            stats.internal_nodes,
            stats.leaves,
            octree.depth(),
            stats.participations,
        );
        if stats.forced_leaves > 0 {
            log::warn!(
                "{} octree leaves stopped above the leaf threshold ({}), by the maximum depth ({}) or for lack of separation",
                stats.forced_leaves,
                self.options.leaf_threshold,
                self.options.max_depth,
            );
        }

        Ok(octree)
    }

    fn build_node(
        &self,
        geometry: &MeshGeometry,
        aabb: Aabb,
        indices: &IndexRangeSet,
        depth: usize,
        stats: &mut BuildStats,
    ) -> Result<OctreeNode, OctreeBuildError> {
        let octants = aabb.split_at_center();
        let mut partitions: [IndexRangeSet; 8] = core::array::from_fn(|_| IndexRangeSet::new());

        for offset in indices.iter() {
            let triangle = geometry
                .triangle(offset)
                .ok_or(OctreeBuildError::InvalidIndex { offset })?;

            for (octant, partition) in octants.iter().zip(partitions.iter_mut()) {
                if aabb_intersects_triangle(octant, &triangle) {
                    partition.add(offset)?;
                }
            }
        }

        let leaf_depth_reached = depth + 1 >= self.options.max_depth;
        // Several octants each keeping every triangle means the split only duplicates them,
        // e.g., with coincident triangles. Splitting those octants further would not separate
        // anything either.
        let stalled = partitions
            .iter()
            .filter(|partition| partition.count() == indices.count())
            .count()
            >= 2;
        let mut children = Vec::new();

        for (octant, partition) in octants.into_iter().zip(partitions) {
            if partition.is_empty() {
                continue;
            }

            let no_progress = stalled && partition.count() == indices.count();

            if partition.count() < self.options.leaf_threshold || leaf_depth_reached || no_progress
            {
                if partition.count() >= self.options.leaf_threshold {
                    stats.forced_leaves += 1;
                }

                stats.leaves += 1;
                stats.participations += partition.count();
                children.push(OctreeNode::Leaf {
                    aabb: octant,
                    indices: partition,
                });
            } else {
                children.push(self.build_node(geometry, octant, &partition, depth + 1, stats)?);
            }
        }

        if children.is_empty() && !indices.is_empty() {
            return Err(OctreeBuildError::EmptyPartition {
                depth,
                triangles: indices.count(),
            });
        }

        // Collapse a level that would only forward to a single internal child.
        if children.len() == 1 && !children[0].is_leaf() {
            if let Some(child) = children.pop() {
                return Ok(child);
            }
        }

        stats.internal_nodes += 1;
        Ok(OctreeNode::Internal { aabb, children })
    }
}
