//! hecs integration: run a pass over every entity carrying a [`Shape`].

use super::shape::Shape;
use super::{CollisionPass, PassSummary};

/// Test all `Shape` components in `world` against each other and write back
/// their statuses.
pub fn run_collision_pass(world: &mut hecs::World, pass: &CollisionPass) -> PassSummary {
    pass.run(world.query_mut::<&mut Shape>().into_iter().map(|(_, shape)| shape))
}
