//! Polycollide
//!
//! Layered 2D collision detection between convex polygons.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **geometry** - Orientation, cross products and small vector helpers
//! 2. **collision::shape** - Shapes and their cached bounding volumes
//! 3. **collision::hull** - Gift-wrapping convex hull, one-shot or stepwise
//! 4. **collision::sat** - Separating axis tests over oriented boxes
//! 5. **collision::broadphase** / **narrowphase** - The four pipeline stages
//! 6. **collision** - Pair tests and whole-set passes
//! 7. **collision::ecs** - hecs integration (feature = "ecs")

pub mod collision;
pub mod error;
pub mod geometry;

pub use collision::hull::{convex_hull, GiftWrap, WrapStep};
pub use collision::narrowphase::{contains_point, point_in_convex_polygon};
pub use collision::shape::{Aabb, BoundingCircle, Obb, Shape, ShapeDescriptor, ShapeId};
pub use collision::{
    run_collision_pass, BoundaryPolicy, CollisionConfig, CollisionPass, CollisionStatus,
    PairOutcome, PassSummary,
};
pub use error::{CollisionError, HullError, Result, ShapeError};
pub use geometry::{orientation, Orientation};

// Re-export glam for convenience
pub use glam;
