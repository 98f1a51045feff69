//! Scene setup shared by the collision benchmarks.

use glam::Vec2;
use polycollide::Shape;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Side length of the square each random triangle is drawn in.
pub const TRIANGLE_SIZE: f32 = 40.0;

/// `n` random triangles scattered over a square of side `extent`.
///
/// The same `(n, extent)` always yields the same field.
pub fn random_field(n: usize, extent: f32) -> Vec<Shape> {
    let mut rng = Pcg32::seed_from_u64(0x5eed);
    (0..n)
        .map(|_| {
            let position = Vec2::new(
                rng.random_range(0.0..extent),
                rng.random_range(0.0..extent),
            );
            Shape::random_triangle(Vec2::splat(TRIANGLE_SIZE), position, &mut rng)
                .expect("random triangles are never degenerate")
        })
        .collect()
}

/// Dense field: most pairs reach the narrowphase.
pub fn dense_field(n: usize) -> Vec<Shape> {
    random_field(n, TRIANGLE_SIZE * (n as f32).sqrt())
}

/// Sparse field: most pairs stop at the bounding circles.
pub fn sparse_field(n: usize) -> Vec<Shape> {
    random_field(n, TRIANGLE_SIZE * 10.0 * (n as f32).sqrt())
}

/// `n` random points in a square of side `extent`.
pub fn random_points(n: usize, extent: f32) -> Vec<Vec2> {
    let mut rng = Pcg32::seed_from_u64(0xc0ffee);
    (0..n)
        .map(|_| Vec2::new(rng.random_range(0.0..extent), rng.random_range(0.0..extent)))
        .collect()
}

/// Spawn `shapes` into a fresh hecs world.
pub fn setup_world(shapes: Vec<Shape>) -> hecs::World {
    let mut world = hecs::World::new();
    for shape in shapes {
        world.spawn((shape,));
    }
    world
}

/// A pair of overlapping triangles and a pair that only share OBB space.
pub fn triangle_pairs() -> [(Shape, Shape); 2] {
    let tri = |a: Vec2, b: Vec2, c: Vec2, at: Vec2| {
        Shape::triangle(a, b, c, at).expect("fixed triangles are valid")
    };
    [
        (
            tri(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0), Vec2::ZERO),
            tri(Vec2::ZERO, Vec2::new(5.0, 0.0), Vec2::new(0.0, 5.0), Vec2::ONE),
        ),
        (
            tri(Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0), Vec2::ZERO),
            tri(
                Vec2::new(0.0, 4.0),
                Vec2::new(1.0, 4.0),
                Vec2::new(0.0, 5.0),
                Vec2::ZERO,
            ),
        ),
    ]
}
