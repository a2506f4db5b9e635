extern crate nalgebra as na;

mod fixtures;
mod octree_brute_force;
mod octree_persistence;
mod scene_ray_cast;
mod subtree_build;
