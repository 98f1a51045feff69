//! Narrowphase stages: OBB separation and the exact Minkowski test.

use glam::Vec2;

use crate::error::HullError;
use crate::geometry::cross;

use super::hull::convex_hull;
use super::sat::obb_overlap;
use super::shape::{Shape, ShapeDescriptor};
use super::BoundaryPolicy;

/// Stage 3: SAT over both OBBs' axes.
#[inline]
pub fn obbs_overlap(a: &ShapeDescriptor, b: &ShapeDescriptor) -> bool {
    obb_overlap(&a.obb, &b.obb)
}

/// Every pairwise difference `a_i - b_j` of the two shapes' world vertices.
///
/// The set contains the origin's neighborhood exactly when the shapes share a
/// point. Order is `a`-major, so the result has `|a| * |b|` entries.
pub fn minkowski_difference(a: &Shape, b: &Shape) -> Vec<Vec2> {
    let b_world: Vec<Vec2> = b.world_vertices().collect();
    a.world_vertices()
        .flat_map(|pa| b_world.iter().map(move |&pb| pa - pb))
        .collect()
}

/// Convex hull of the Minkowski difference of `a` and `b`.
pub fn debug_hull(a: &Shape, b: &Shape) -> Result<Vec<Vec2>, HullError> {
    convex_hull(&minkowski_difference(a, b))
}

/// Stage 4: do `a` and `b` intersect?
pub fn minkowski_overlap(
    a: &Shape,
    b: &Shape,
    boundary: BoundaryPolicy,
) -> Result<bool, HullError> {
    let hull = debug_hull(a, b)?;
    Ok(contains_point(&hull, Vec2::ZERO, boundary))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Is `point` inside the convex `polygon`? Works for either winding.
///
/// A point exactly on an edge line counts only under
/// [`BoundaryPolicy::Touching`]. Polygons with fewer than 3 vertices contain
/// nothing.
pub fn contains_point(polygon: &[Vec2], point: Vec2, boundary: BoundaryPolicy) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut side = None;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let c = cross(b - a, point - a);
        let current = if c > 0.0 {
            Side::Left
        } else if c < 0.0 {
            Side::Right
        } else {
            match boundary {
                BoundaryPolicy::Separated => return false,
                BoundaryPolicy::Touching => continue,
            }
        };

        match side {
            None => side = Some(current),
            Some(s) if s != current => return false,
            Some(_) => {}
        }
    }
    side.is_some()
}

/// Strict containment: boundary points are outside.
#[inline]
pub fn point_in_convex_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    contains_point(polygon, point, BoundaryPolicy::Separated)
}
