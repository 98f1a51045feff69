//! Layered 2D collision detection between convex shapes.
//!
//! # Architecture
//!
//! Each pair of shapes runs through increasingly exact stages, stopping at
//! the first one that proves separation:
//!
//! 1. Bounding circle overlap
//! 2. World-space AABB overlap
//! 3. OBB overlap via SAT from both shapes' axes
//! 4. Exact test: is the origin inside the convex hull of the Minkowski
//!    difference?
//!
//! A pass tests every pair of shapes once and merges the pair results into
//! each shape's [`CollisionStatus`] with a max.

pub mod broadphase;
#[cfg(feature = "ecs")]
pub mod ecs;
pub mod hull;
pub mod narrowphase;
pub mod sat;
pub mod shape;

use tracing::{debug, trace, warn};

use crate::error::HullError;

use self::shape::Shape;

/// How far a pair (or a shape, over all its pairs) got through the stages.
///
/// `Circle` means the pair was tested but nothing finer than the broad phase
/// applies; `Aabb` and `Obb` mean those bounding boxes overlap;
/// `Minkowski` means the shapes intersect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollisionStatus {
    #[default]
    None,
    Circle,
    Aabb,
    Obb,
    Minkowski,
}

impl CollisionStatus {
    pub const ALL: [CollisionStatus; 5] = [
        CollisionStatus::None,
        CollisionStatus::Circle,
        CollisionStatus::Aabb,
        CollisionStatus::Obb,
        CollisionStatus::Minkowski,
    ];

    /// True once the exact test has confirmed an intersection.
    pub fn is_colliding(self) -> bool {
        self == CollisionStatus::Minkowski
    }
}

/// Whether the origin lying exactly on the Minkowski hull boundary counts as
/// a collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Boundary contact is not a collision.
    #[default]
    Separated,
    /// Boundary contact is a collision.
    Touching,
}

/// Configuration for collision passes.
#[derive(Debug, Clone)]
pub struct CollisionConfig {
    /// Treatment of exact boundary contact in the Minkowski stage. Default: `Separated`.
    pub boundary: BoundaryPolicy,
    /// Finest stage to evaluate. Default: `Minkowski`.
    pub max_stage: CollisionStatus,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::Separated,
            max_stage: CollisionStatus::Minkowski,
        }
    }
}

impl CollisionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boundary policy for the exact stage.
    pub fn boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Stop after the given stage.
    pub fn max_stage(mut self, max_stage: CollisionStatus) -> Self {
        self.max_stage = max_stage;
        self
    }
}

/// Result of testing one pair of shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairOutcome {
    /// Finest overlapping level, floored at `Circle`.
    pub status: CollisionStatus,
    /// Last stage that was actually evaluated.
    pub deepest_test: CollisionStatus,
    /// Set when the Minkowski hull could not be built and the pair fell back
    /// to its OBB result.
    pub hull_error: Option<HullError>,
}

impl PairOutcome {
    fn stopped(status: CollisionStatus, deepest_test: CollisionStatus) -> Self {
        Self {
            status,
            deepest_test,
            hull_error: None,
        }
    }

    /// Outcome of a pair that reached the exact stage.
    ///
    /// A hull error keeps the pair at `Obb`. Two validated shapes always
    /// produce a hull with area (the difference set contains a translated
    /// copy of either shape), so this branch only guards against
    /// floating-point collapse.
    fn from_minkowski(result: Result<bool, HullError>) -> Self {
        match result {
            Ok(true) => Self::stopped(CollisionStatus::Minkowski, CollisionStatus::Minkowski),
            Ok(false) => Self::stopped(CollisionStatus::Obb, CollisionStatus::Minkowski),
            Err(err) => Self {
                status: CollisionStatus::Obb,
                deepest_test: CollisionStatus::Minkowski,
                hull_error: Some(err),
            },
        }
    }
}

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub pairs_tested: usize,
    /// Pair outcomes indexed by `CollisionStatus as usize`.
    pub pair_statuses: [usize; 5],
    pub degenerate_hulls: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: &PairOutcome) {
        self.pairs_tested += 1;
        self.pair_statuses[outcome.status as usize] += 1;
        if outcome.hull_error.is_some() {
            self.degenerate_hulls += 1;
        }
    }

    /// Number of pairs that ended at `status`.
    pub fn pairs_with(&self, status: CollisionStatus) -> usize {
        self.pair_statuses[status as usize]
    }

    pub fn collisions(&self) -> usize {
        self.pairs_with(CollisionStatus::Minkowski)
    }
}

/// Runs the staged pipeline over pairs and whole shape sets.
#[derive(Debug, Clone, Default)]
pub struct CollisionPass {
    config: CollisionConfig,
}

impl CollisionPass {
    pub fn new(config: CollisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Run the stages for one pair, stopping at the first separation.
    pub fn test_pair(&self, a: &Shape, b: &Shape) -> PairOutcome {
        use CollisionStatus as S;

        let max = self.config.max_stage;
        if max == S::None {
            return PairOutcome::stopped(S::None, S::None);
        }

        let placed_a = a.placed();
        let placed_b = b.placed();

        if !broadphase::circles_overlap(&placed_a, &placed_b) {
            trace!(a = ?a.id(), b = ?b.id(), "separated by bounding circles");
            return PairOutcome::stopped(S::Circle, S::Circle);
        }
        if max == S::Circle {
            return PairOutcome::stopped(S::Circle, S::Circle);
        }

        if !broadphase::aabbs_overlap(&placed_a, &placed_b) {
            trace!(a = ?a.id(), b = ?b.id(), "separated by AABBs");
            return PairOutcome::stopped(S::Circle, S::Aabb);
        }
        if max == S::Aabb {
            return PairOutcome::stopped(S::Aabb, S::Aabb);
        }

        if !narrowphase::obbs_overlap(&placed_a, &placed_b) {
            trace!(a = ?a.id(), b = ?b.id(), "separated by OBBs");
            return PairOutcome::stopped(S::Aabb, S::Obb);
        }
        if max == S::Obb {
            return PairOutcome::stopped(S::Obb, S::Obb);
        }

        let outcome = PairOutcome::from_minkowski(narrowphase::minkowski_overlap(
            a,
            b,
            self.config.boundary,
        ));
        if let Some(err) = outcome.hull_error {
            warn!(
                a = ?a.id(),
                b = ?b.id(),
                %err,
                "Minkowski hull degenerate, keeping OBB result"
            );
        } else if outcome.status.is_colliding() {
            trace!(a = ?a.id(), b = ?b.id(), "shapes intersect");
        } else {
            trace!(a = ?a.id(), b = ?b.id(), "OBBs overlap, shapes do not");
        }
        outcome
    }

    /// Test every pair in `shapes` and store each shape's finest status.
    ///
    /// Statuses are reset first, so a shape with no partner ends at `None`.
    pub fn run<'a>(&self, shapes: impl IntoIterator<Item = &'a mut Shape>) -> PassSummary {
        let mut shapes: Vec<&mut Shape> = shapes.into_iter().collect();
        for shape in shapes.iter_mut() {
            shape.reset_status();
        }

        let ids: Vec<_> = shapes.iter().map(|s| s.id()).collect();
        let mut summary = PassSummary::default();

        for (i, j) in broadphase::candidate_pairs(&ids) {
            let outcome = self.test_pair(&*shapes[i], &*shapes[j]);
            shapes[i].raise_status(outcome.status);
            shapes[j].raise_status(outcome.status);
            summary.record(&outcome);
        }

        debug!(
            shapes = shapes.len(),
            pairs = summary.pairs_tested,
            collisions = summary.collisions(),
            degenerate_hulls = summary.degenerate_hulls,
            "collision pass complete"
        );
        summary
    }

    /// Test a single shape that is not part of `others` against all of them.
    ///
    /// Only `shape`'s status is written. An entry in `others` with the same
    /// identity is skipped.
    pub fn probe(&self, shape: &mut Shape, others: &[Shape]) -> PassSummary {
        shape.reset_status();
        let id = shape.id();
        let mut summary = PassSummary::default();

        for other in others.iter().filter(|o| o.id() != id) {
            let outcome = self.test_pair(shape, other);
            shape.raise_status(outcome.status);
            summary.record(&outcome);
        }

        trace!(
            shape = ?shape.id(),
            status = ?shape.status(),
            pairs = summary.pairs_tested,
            "probe complete"
        );
        summary
    }
}

/// Run a default-configured pass over `shapes`.
pub fn run_collision_pass(shapes: &mut [Shape]) -> PassSummary {
    CollisionPass::default().run(shapes.iter_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cross;
    use glam::Vec2;

    /// Equilateral triangle with centroid at the origin and circumradius 5.
    fn equilateral(position: Vec2) -> Shape {
        let h = 5.0 * 3f32.sqrt() / 2.0;
        Shape::triangle(
            Vec2::new(0.0, 5.0),
            Vec2::new(h, -2.5),
            Vec2::new(-h, -2.5),
            position,
        )
        .unwrap()
    }

    /// Thin triangle hugging the diagonal from (0, 0) to (10, 10).
    fn sliver(position: Vec2) -> Shape {
        Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(6.0, 5.0),
            position,
        )
        .unwrap()
    }

    fn strictly_inside(hull: &[Vec2], point: Vec2) -> bool {
        let n = hull.len();
        (0..n).all(|i| cross(hull[(i + 1) % n] - hull[i], point - hull[i]) > 0.0)
    }

    #[test]
    fn test_far_apart_circles() {
        let mut shapes = vec![equilateral(Vec2::ZERO), equilateral(Vec2::new(100.0, 0.0))];
        let r = shapes[0].descriptor().circle.radius;
        assert!((r - 5.0).abs() < 1e-4);

        let summary = run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Circle);
        assert_eq!(shapes[1].status(), CollisionStatus::Circle);
        assert_eq!(summary.pairs_tested, 1);
        assert_eq!(summary.pairs_with(CollisionStatus::Circle), 1);
    }

    #[test]
    fn test_circle_rejection_stops_pipeline() {
        let pass = CollisionPass::default();
        let outcome = pass.test_pair(&equilateral(Vec2::ZERO), &equilateral(Vec2::new(100.0, 0.0)));
        assert_eq!(outcome.status, CollisionStatus::Circle);
        assert_eq!(outcome.deepest_test, CollisionStatus::Circle);
        assert!(outcome.hull_error.is_none());
    }

    #[test]
    fn test_aabb_rejection() {
        // Circles of the two slivers overlap, their boxes do not.
        let pass = CollisionPass::default();
        let a = sliver(Vec2::ZERO);
        let b = sliver(Vec2::new(10.5, 0.0));
        assert!(broadphase::circles_overlap(&a.placed(), &b.placed()));
        let outcome = pass.test_pair(&a, &b);
        assert_eq!(outcome.deepest_test, CollisionStatus::Aabb);
        assert_eq!(outcome.status, CollisionStatus::Circle);
    }

    #[test]
    fn test_obb_separation_reports_aabb() {
        let mut shapes = vec![sliver(Vec2::ZERO), sliver(Vec2::new(3.0, -3.0))];
        let placed: Vec<_> = shapes.iter().map(|s| s.placed()).collect();
        assert!(broadphase::circles_overlap(&placed[0], &placed[1]));
        assert!(broadphase::aabbs_overlap(&placed[0], &placed[1]));

        let outcome = CollisionPass::default().test_pair(&shapes[0], &shapes[1]);
        assert_eq!(outcome.deepest_test, CollisionStatus::Obb);

        run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Aabb);
        assert_eq!(shapes[1].status(), CollisionStatus::Aabb);
    }

    #[test]
    fn test_obb_overlap_without_contact() {
        let offset = Vec2::new(100.0, -40.0);
        let big = Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 5.0),
            offset,
        )
        .unwrap();
        // Tucked into the empty upper-left corner of the big OBB.
        let small = Shape::triangle(
            Vec2::new(0.0, 4.0),
            Vec2::new(1.0, 4.0),
            Vec2::new(0.0, 5.0),
            offset,
        )
        .unwrap();

        let mut shapes = vec![big, small];
        let outcome = CollisionPass::default().test_pair(&shapes[0], &shapes[1]);
        assert_eq!(outcome.deepest_test, CollisionStatus::Minkowski);
        assert_eq!(outcome.status, CollisionStatus::Obb);

        let hull = narrowphase::debug_hull(&shapes[0], &shapes[1]).unwrap();
        assert!(!narrowphase::point_in_convex_polygon(Vec2::ZERO, &hull));

        run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Obb);
        assert_eq!(shapes[1].status(), CollisionStatus::Obb);
    }

    #[test]
    fn test_intersecting_triangles() {
        let a = Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(-20.0, 7.0),
        )
        .unwrap();
        // B's first vertex sits at (1, 1) in A's frame.
        let b = Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(-19.0, 8.0),
        )
        .unwrap();

        let hull = narrowphase::debug_hull(&a, &b).unwrap();
        assert!(strictly_inside(&hull, Vec2::ZERO));

        let mut shapes = vec![a, b];
        let summary = run_collision_pass(&mut shapes);
        assert!(shapes.iter().all(|s| s.status().is_colliding()));
        assert_eq!(summary.collisions(), 1);
    }

    #[test]
    fn test_identical_overlapping_shapes_collide() {
        // Coincident shapes give a Minkowski set full of duplicate points.
        let mut shapes = vec![sliver(Vec2::ONE), sliver(Vec2::ONE)];
        run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Minkowski);
        assert_eq!(shapes[1].status(), CollisionStatus::Minkowski);
    }

    #[test]
    fn test_status_is_max_over_pairs() {
        let mut shapes = vec![
            equilateral(Vec2::ZERO),
            equilateral(Vec2::new(2.0, 0.0)),
            equilateral(Vec2::new(200.0, 0.0)),
        ];
        let summary = run_collision_pass(&mut shapes);
        assert_eq!(summary.pairs_tested, 3);
        assert_eq!(shapes[0].status(), CollisionStatus::Minkowski);
        assert_eq!(shapes[1].status(), CollisionStatus::Minkowski);
        assert_eq!(shapes[2].status(), CollisionStatus::Circle);
    }

    #[test]
    fn test_pass_resets_previous_statuses() {
        let mut shapes = vec![equilateral(Vec2::ZERO), equilateral(Vec2::new(1.0, 0.0))];
        run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Minkowski);

        shapes[1].set_position(Vec2::new(500.0, 0.0));
        run_collision_pass(&mut shapes);
        assert_eq!(shapes[0].status(), CollisionStatus::Circle);

        let mut lonely = vec![equilateral(Vec2::ZERO)];
        run_collision_pass(&mut lonely);
        assert_eq!(lonely[0].status(), CollisionStatus::None);
    }

    #[test]
    fn test_self_pairs_skipped() {
        let shape = equilateral(Vec2::ZERO);
        let mut shapes = vec![shape.clone(), shape];
        let summary = run_collision_pass(&mut shapes);
        assert_eq!(summary.pairs_tested, 0);
        assert_eq!(shapes[0].status(), CollisionStatus::None);
    }

    #[test]
    fn test_probe_against_field() {
        let field = vec![
            equilateral(Vec2::ZERO),
            equilateral(Vec2::new(50.0, 0.0)),
            equilateral(Vec2::new(-50.0, 0.0)),
        ];
        let mut cursor = equilateral(Vec2::new(49.0, 1.0));
        let summary = CollisionPass::default().probe(&mut cursor, &field);
        assert_eq!(summary.pairs_tested, 3);
        assert_eq!(cursor.status(), CollisionStatus::Minkowski);
        assert!(field.iter().all(|s| s.status() == CollisionStatus::None));

        // A shape never probes itself.
        let mut member = field[0].clone();
        let summary = CollisionPass::default().probe(&mut member, &field);
        assert_eq!(summary.pairs_tested, 2);
        assert_eq!(member.status(), CollisionStatus::Circle);
    }

    #[test]
    fn test_max_stage_limits_pipeline() {
        let pass = CollisionPass::new(CollisionConfig::new().max_stage(CollisionStatus::Aabb));
        let a = equilateral(Vec2::ZERO);
        let b = equilateral(Vec2::new(1.0, 0.0));
        let outcome = pass.test_pair(&a, &b);
        assert_eq!(outcome.status, CollisionStatus::Aabb);
        assert_eq!(outcome.deepest_test, CollisionStatus::Aabb);

        let none = CollisionPass::new(CollisionConfig::new().max_stage(CollisionStatus::None));
        assert_eq!(none.test_pair(&a, &b).status, CollisionStatus::None);
    }

    #[test]
    fn test_boundary_policy_on_shared_edge() {
        // Two right triangles sharing the hypotenuse touch without overlapping.
        let a = Shape::triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(0.0, 4.0),
            Vec2::ZERO,
        )
        .unwrap();
        let b = Shape::triangle(
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
            Vec2::ZERO,
        )
        .unwrap();

        let separated = CollisionPass::default().test_pair(&a, &b);
        assert_eq!(separated.status, CollisionStatus::Obb);

        let touching = CollisionPass::new(CollisionConfig::new().boundary(BoundaryPolicy::Touching))
            .test_pair(&a, &b);
        assert_eq!(touching.status, CollisionStatus::Minkowski);
    }

    #[test]
    fn test_degenerate_hull_keeps_obb_status() {
        let outcome = PairOutcome::from_minkowski(Err(HullError::Degenerate { vertices: 2 }));
        assert_eq!(outcome.status, CollisionStatus::Obb);
        assert_eq!(outcome.deepest_test, CollisionStatus::Minkowski);
        assert_eq!(outcome.hull_error, Some(HullError::Degenerate { vertices: 2 }));

        let mut summary = PassSummary::default();
        summary.record(&outcome);
        summary.record(&PairOutcome::from_minkowski(Ok(true)));
        summary.record(&PairOutcome::from_minkowski(Ok(false)));
        assert_eq!(summary.pairs_tested, 3);
        assert_eq!(summary.degenerate_hulls, 1);
        assert_eq!(summary.pairs_with(CollisionStatus::Obb), 2);
        assert_eq!(summary.collisions(), 1);
    }

    #[test]
    fn test_probe_leaves_field_untouched_and_reuses_shape() {
        let field = vec![equilateral(Vec2::ZERO), equilateral(Vec2::new(3.0, 0.0))];
        let mut cursor = equilateral(Vec2::new(1.0, 1.0));
        let pass = CollisionPass::default();

        pass.probe(&mut cursor, &field);
        assert_eq!(cursor.status(), CollisionStatus::Minkowski);

        // A second probe resets the previous status first.
        cursor.set_position(Vec2::new(300.0, 0.0));
        let summary = pass.probe(&mut cursor, &field);
        assert_eq!(summary.pairs_with(CollisionStatus::Circle), 2);
        assert_eq!(cursor.status(), CollisionStatus::Circle);
        assert!(field.iter().all(|s| s.status() == CollisionStatus::None));
    }

    #[test]
    fn test_config_default() {
        let config = CollisionConfig::default();
        assert_eq!(config.boundary, BoundaryPolicy::Separated);
        assert_eq!(config.max_stage, CollisionStatus::Minkowski);
        assert!(CollisionStatus::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[cfg(feature = "random")]
    #[test]
    fn test_random_field_pass_is_consistent() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand_pcg::Pcg32::seed_from_u64(42);
        let mut shapes: Vec<Shape> = (0..60)
            .map(|_| {
                let position = Vec2::new(
                    rng.random_range(-200.0..200.0),
                    rng.random_range(-200.0..200.0),
                );
                Shape::random_triangle(Vec2::splat(100.0), position, &mut rng).unwrap()
            })
            .collect();

        let summary = run_collision_pass(&mut shapes);
        assert_eq!(summary.pairs_tested, 60 * 59 / 2);
        assert_eq!(summary.pair_statuses.iter().sum::<usize>(), summary.pairs_tested);
        assert_eq!(summary.degenerate_hulls, 0);

        // Every shape's status is the max over its own pairs.
        let pass = CollisionPass::default();
        for i in 0..shapes.len() {
            let expected = (0..shapes.len())
                .filter(|&j| j != i)
                .map(|j| pass.test_pair(&shapes[i], &shapes[j]).status)
                .max()
                .unwrap();
            assert_eq!(shapes[i].status(), expected);
        }
    }
}
