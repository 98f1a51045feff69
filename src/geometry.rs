//! 2D vector helpers on top of `glam::Vec2`.
//!
//! Arithmetic, dot products and lengths come straight from `glam`. This module
//! adds the pieces the collision code needs with stricter contracts: checked
//! normalization and the orientation predicate shared by the hull builder and
//! the point-in-polygon test.

use glam::Vec2;

use crate::error::ShapeError;

/// Turn direction of three points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// The orientation of the same three points walked in reverse.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Orientation::Collinear => Orientation::Collinear,
            Orientation::Clockwise => Orientation::CounterClockwise,
            Orientation::CounterClockwise => Orientation::Clockwise,
        }
    }
}

/// 2D cross product (z component of the 3D cross product).
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// Classify the turn `p -> q -> r` by the sign of `(q - p) x (r - q)`.
///
/// Positive is counter-clockwise, negative clockwise. Only an exact zero is
/// collinear; there is no epsilon band.
#[inline]
pub fn orientation(p: Vec2, q: Vec2, r: Vec2) -> Orientation {
    let val = cross(q - p, r - q);
    if val > 0.0 {
        Orientation::CounterClockwise
    } else if val < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Normalize `v`, failing instead of producing NaN for a zero-length vector.
#[inline]
pub fn try_normalize(v: Vec2) -> Result<Vec2, ShapeError> {
    let length = v.length();
    if length == 0.0 || !length.is_finite() {
        return Err(ShapeError::DegenerateAxis);
    }
    Ok(v / length)
}

/// Unsigned distance from `x` to the infinite line through `p` and `q`.
pub fn distance_from_line(p: Vec2, q: Vec2, x: Vec2) -> Result<f32, ShapeError> {
    let direction = try_normalize(q - p)?;
    Ok(cross(direction, x - p).abs())
}

/// Arithmetic mean of a non-empty point set.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    debug_assert!(!points.is_empty());
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

/// Twice the signed area of a polygon (positive when counter-clockwise).
pub fn signed_area_doubled(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| cross(points[i], points[(i + 1) % n]))
        .sum()
}
