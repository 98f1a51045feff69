//! Separating Axis Theorem over oriented bounding boxes.

use glam::Vec2;

use super::shape::Obb;

/// Closed interval of a point set projected onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Project `points` onto `axis`. An empty set yields an empty interval.
    pub fn of(axis: Vec2, points: &[Vec2]) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for p in points {
            let d = axis.dot(*p);
            min = min.min(d);
            max = max.max(d);
        }
        Self { min, max }
    }

    /// Intervals overlap unless one starts strictly after the other ends.
    #[inline]
    pub fn overlaps(&self, other: &Projection) -> bool {
        other.min <= self.max && self.min <= other.max
    }
}

/// Return the first axis on which the projections of `a` and `b` are disjoint.
pub fn find_separating_axis(axes: &[Vec2], a: &[Vec2], b: &[Vec2]) -> Option<Vec2> {
    axes.iter()
        .copied()
        .find(|axis| !Projection::of(*axis, a).overlaps(&Projection::of(*axis, b)))
}

/// One-sided OBB test: only `owner`'s two axes are tried.
#[inline]
pub fn obb_overlap_from(owner: &Obb, other: &Obb) -> bool {
    find_separating_axis(&owner.axes, &owner.corners, &other.corners).is_none()
}

/// Full OBB-vs-OBB test: both boxes' axes must fail to separate.
#[inline]
pub fn obb_overlap(a: &Obb, b: &Obb) -> bool {
    obb_overlap_from(a, b) && obb_overlap_from(b, a)
}
