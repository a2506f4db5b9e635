pub use self::index_range_set::{IndexRange, IndexRangeSet, OrderingViolation};
pub use self::octree_build::{OctreeBuildError, OctreeBuildOptions, OctreeBuilder};
pub use self::octree_repr::{
    AabbRepr, IndexRangesRepr, OctreeNodeRepr, OctreeRepr, OctreeReprError,
};
pub use self::octree_traverse::{Leaves, Pruning};
pub use self::octree_tree::{OctreeNode, SpatialOctree};

mod index_range_set;
mod octree_build;
mod octree_repr;
mod octree_traverse;
mod octree_tree;
