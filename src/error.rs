//! Error types for shape construction and hull building.

use thiserror::Error;

/// Geometry that cannot produce a valid shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ShapeError {
    #[error("a shape needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
    #[error("shape has zero area")]
    ZeroArea,
    #[error("cannot normalize a zero-length axis")]
    DegenerateAxis,
    #[error("shape size must be finite")]
    NonFiniteSize,
}

/// Failure to wrap a point set into a convex polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HullError {
    #[error("convex hull needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },
    /// Every remaining point coincides with the current hull point.
    #[error("no hull candidate distinct from point {index}")]
    NoCandidate { index: usize },
    #[error("hull did not close after {cap} vertices")]
    DidNotClose { cap: usize },
    /// The walk closed but the hull has no area (collinear input).
    #[error("hull is degenerate ({vertices} vertices)")]
    Degenerate { vertices: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CollisionError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Hull(#[from] HullError),
}

pub type Result<T, E = CollisionError> = std::result::Result<T, E>;
