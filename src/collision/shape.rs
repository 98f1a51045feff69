//! Convex shapes and their cached bounding volumes.
//!
//! Every bounding volume is stored in shape-local coordinates and only moved
//! into world space at query time through [`ShapeDescriptor::placed`], so
//! moving a shape never touches its descriptor.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

use crate::error::ShapeError;
use crate::geometry::{centroid, cross, signed_area_doubled, try_normalize};

use super::CollisionStatus;

/// Smallest coordinate magnitude used by [`Shape::random_triangle`].
#[cfg(feature = "random")]
const RANDOM_MIN_COORD: f32 = 5.0;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a shape, used to skip self-pairs.
///
/// Clones share the identity of the shape they were cloned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

impl ShapeId {
    fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Centroid-based bounding circle.
///
/// Not the minimal enclosing circle, but always contains every vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl BoundingCircle {
    fn from_vertices(vertices: &[Vec2]) -> Self {
        let center = centroid(vertices);
        let radius = vertices
            .iter()
            .map(|v| center.distance(*v))
            .fold(0.0, f32::max);
        Self { center, radius }
    }

    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }

    /// Circles overlap when their centers are no farther apart than the sum
    /// of their radii. Touching counts.
    #[inline]
    pub fn overlaps(&self, other: &BoundingCircle) -> bool {
        self.center.distance(other.center) <= self.radius + other.radius
    }
}

/// Axis-aligned bounding box stored as center and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    fn from_vertices(vertices: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for v in vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            center: self.center + offset,
            half_extents: self.half_extents,
        }
    }

    /// Test whether two AABBs overlap on both axes. Touching counts.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (min_a, max_a) = (self.min(), self.max());
        let (min_b, max_b) = (other.min(), other.max());
        min_a.x <= max_b.x && max_a.x >= min_b.x && min_a.y <= max_b.y && max_a.y >= min_b.y
    }
}

/// Oriented bounding box aligned with a shape's longest edge.
///
/// `corners[0] -> corners[1]` runs along the longest edge,
/// `corners[2]` and `corners[3]` sit across from `corners[1]` and `corners[0]`.
/// `axes[0]` is the unit edge direction, `axes[1]` its unit perpendicular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    pub corners: [Vec2; 4],
    pub axes: [Vec2; 2],
}

impl Obb {
    fn from_vertices(vertices: &[Vec2]) -> Result<Self, ShapeError> {
        let n = vertices.len();

        // Strictly longer wins, so equal edges resolve to the lowest index.
        let mut longest = 0;
        let mut longest_sq = f32::MIN;
        for i in 0..n {
            let len_sq = vertices[i].distance_squared(vertices[(i + 1) % n]);
            if len_sq > longest_sq {
                longest = i;
                longest_sq = len_sq;
            }
        }

        let p0 = vertices[longest];
        let p1 = vertices[(longest + 1) % n];
        let direction = try_normalize(p1 - p0)?;
        let normal = direction.perp();

        let mut extent = 0.0f32;
        let mut before = 0.0f32;
        let mut beyond = 0.0f32;
        for v in vertices {
            let offset = cross(direction, *v - p0);
            if offset.abs() > extent.abs() {
                extent = offset;
            }
            before = before.min((*v - p0).dot(direction));
            beyond = beyond.max((*v - p1).dot(direction));
        }

        if extent == 0.0 {
            return Err(ShapeError::ZeroArea);
        }

        // For triangles both widenings are zero and the corners are exactly
        // the edge endpoints.
        let c0 = p0 + direction * before;
        let c1 = p1 + direction * beyond;
        let across = normal * extent;

        Ok(Self {
            corners: [c0, c1, c1 + across, c0 + across],
            axes: [direction, normal],
        })
    }

    #[inline]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            corners: self.corners.map(|c| c + offset),
            axes: self.axes,
        }
    }
}

/// Bounding volumes derived from a shape's vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub circle: BoundingCircle,
    pub aabb: Aabb,
    pub obb: Obb,
}

impl ShapeDescriptor {
    /// Build the descriptor for a validated vertex list.
    pub fn from_vertices(vertices: &[Vec2]) -> Result<Self, ShapeError> {
        validate(vertices)?;
        Ok(Self {
            circle: BoundingCircle::from_vertices(vertices),
            aabb: Aabb::from_vertices(vertices),
            obb: Obb::from_vertices(vertices)?,
        })
    }

    /// The same descriptor moved by a world-space offset.
    #[inline]
    pub fn placed(&self, position: Vec2) -> Self {
        Self {
            circle: self.circle.translated(position),
            aabb: self.aabb.translated(position),
            obb: self.obb.translated(position),
        }
    }
}

fn validate(vertices: &[Vec2]) -> Result<(), ShapeError> {
    if vertices.len() < 3 {
        return Err(ShapeError::TooFewVertices {
            count: vertices.len(),
        });
    }
    if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
        return Err(ShapeError::NonFiniteVertex { index });
    }
    let area = signed_area_doubled(vertices);
    if area == 0.0 || !area.is_finite() {
        return Err(ShapeError::ZeroArea);
    }
    Ok(())
}

/// A convex polygon placed in the world.
///
/// Vertices are shape-local and must be convex and consistently wound;
/// convexity is not checked.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    vertices: Vec<Vec2>,
    position: Vec2,
    descriptor: ShapeDescriptor,
    status: CollisionStatus,
}

impl Shape {
    /// Create a shape from local vertices and a world position.
    pub fn new(vertices: impl Into<Vec<Vec2>>, position: Vec2) -> Result<Self, ShapeError> {
        let vertices = vertices.into();
        let descriptor = ShapeDescriptor::from_vertices(&vertices)?;
        Ok(Self {
            id: ShapeId::next(),
            vertices,
            position,
            descriptor,
            status: CollisionStatus::None,
        })
    }

    pub fn triangle(p0: Vec2, p1: Vec2, p2: Vec2, position: Vec2) -> Result<Self, ShapeError> {
        Self::new(vec![p0, p1, p2], position)
    }

    /// Random triangle `(-x0, 0)`, `(0, y1)`, `(x2, -y2)` with each coordinate
    /// drawn from `[5, size / 2]` on its axis.
    ///
    /// Fails with [`ShapeError::NonFiniteSize`] if `size` is infinite or NaN.
    #[cfg(feature = "random")]
    pub fn random_triangle<R: rand::Rng>(
        size: Vec2,
        position: Vec2,
        rng: &mut R,
    ) -> Result<Self, ShapeError> {
        if !size.is_finite() {
            return Err(ShapeError::NonFiniteSize);
        }
        let max_x = (size.x * 0.5).max(RANDOM_MIN_COORD);
        let max_y = (size.y * 0.5).max(RANDOM_MIN_COORD);

        let x0 = rng.random_range(RANDOM_MIN_COORD..=max_x);
        let y1 = rng.random_range(RANDOM_MIN_COORD..=max_y);
        let x2 = rng.random_range(RANDOM_MIN_COORD..=max_x);
        let y2 = rng.random_range(RANDOM_MIN_COORD..=max_y);

        Self::triangle(
            Vec2::new(-x0, 0.0),
            Vec2::new(0.0, y1),
            Vec2::new(x2, -y2),
            position,
        )
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Replace the local vertices and rebuild the descriptor.
    ///
    /// On error the shape is left unchanged.
    pub fn set_vertices(&mut self, vertices: impl Into<Vec<Vec2>>) -> Result<(), ShapeError> {
        let vertices = vertices.into();
        self.descriptor = ShapeDescriptor::from_vertices(&vertices)?;
        self.vertices = vertices;
        Ok(())
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Shape-local descriptor.
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    /// Descriptor moved to the shape's current world position.
    pub fn placed(&self) -> ShapeDescriptor {
        self.descriptor.placed(self.position)
    }

    pub fn world_vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.vertices.iter().map(move |v| *v + self.position)
    }

    /// Finest status reached in the last collision pass.
    pub fn status(&self) -> CollisionStatus {
        self.status
    }

    pub(crate) fn reset_status(&mut self) {
        self.status = CollisionStatus::None;
    }

    /// Max-merge a pair result into this shape's status.
    pub(crate) fn raise_status(&mut self, status: CollisionStatus) {
        self.status = self.status.max(status);
    }
}
