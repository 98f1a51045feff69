//! Broadphase stages: pair enumeration, bounding circles and AABBs.

use super::shape::{ShapeDescriptor, ShapeId};

/// All unordered index pairs `(i, j)` with `i < j`, skipping pairs that share
/// an identity.
///
/// O(n^2) brute force; there is no spatial partitioning.
pub fn candidate_pairs(ids: &[ShapeId]) -> impl Iterator<Item = (usize, usize)> + '_ {
    (0..ids.len()).flat_map(move |i| {
        ((i + 1)..ids.len())
            .filter(move |&j| ids[i] != ids[j])
            .map(move |j| (i, j))
    })
}

/// Stage 1: world-space bounding circles.
#[inline]
pub fn circles_overlap(a: &ShapeDescriptor, b: &ShapeDescriptor) -> bool {
    a.circle.overlaps(&b.circle)
}

/// Stage 2: world-space AABBs.
#[inline]
pub fn aabbs_overlap(a: &ShapeDescriptor, b: &ShapeDescriptor) -> bool {
    a.aabb.overlaps(&b.aabb)
}
