//! Spatial partitioning tools.

pub use self::octree::{
    AabbRepr, IndexRange, IndexRangeSet, IndexRangesRepr, Leaves, OctreeBuildError,
    OctreeBuildOptions, OctreeBuilder, OctreeNode, OctreeNodeRepr, OctreeRepr, OctreeReprError,
    OrderingViolation, Pruning, SpatialOctree,
};

mod octree;
