use anyhow::Context;
use glam::Vec2;
use polycollide::{CollisionConfig, CollisionPass, CollisionStatus, PassSummary, Shape};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const FIELD_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
const SHAPE_COUNT: usize = 300;
const TRIANGLE_SIZE: Vec2 = Vec2::new(60.0, 60.0);
const TICKS: usize = 120;
const SEED: u64 = 2024;

struct Scene {
    shapes: Vec<Shape>,
    probe: Shape,
    pass: CollisionPass,
}

impl Scene {
    fn new(rng: &mut Pcg32, config: CollisionConfig) -> anyhow::Result<Self> {
        let shapes = (0..SHAPE_COUNT)
            .map(|i| {
                let position = Vec2::new(
                    rng.random_range(0.0..FIELD_SIZE.x),
                    rng.random_range(0.0..FIELD_SIZE.y),
                );
                Shape::random_triangle(TRIANGLE_SIZE, position, rng)
                    .with_context(|| format!("Failed to generate triangle {i}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let probe = Shape::random_triangle(TRIANGLE_SIZE, Vec2::ZERO, rng)
            .context("Failed to generate probe triangle")?;

        Ok(Self {
            shapes,
            probe,
            pass: CollisionPass::new(config),
        })
    }

    /// Probe position at `tick`: a diagonal sweep across the field.
    fn probe_position(tick: usize) -> Vec2 {
        FIELD_SIZE * (tick as f32 / (TICKS - 1) as f32)
    }

    fn tick(&mut self, tick: usize) -> PassSummary {
        self.probe.set_position(Self::probe_position(tick));
        let summary = self.pass.run(self.shapes.iter_mut());
        self.pass.probe(&mut self.probe, &self.shapes);
        summary
    }

    fn status_counts(&self) -> [usize; 5] {
        let mut counts = [0; 5];
        for shape in &self.shapes {
            counts[shape.status() as usize] += 1;
        }
        counts
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut rng = Pcg32::seed_from_u64(SEED);
    let mut scene = Scene::new(&mut rng, CollisionConfig::default())?;
    log::info!(
        "Scattered {} triangles over {}x{}",
        scene.shapes.len(),
        FIELD_SIZE.x,
        FIELD_SIZE.y
    );

    let mut probe_hits = 0;
    for tick in 0..TICKS {
        let summary = scene.tick(tick);
        if scene.probe.status().is_colliding() {
            probe_hits += 1;
        }

        let counts = scene.status_counts();
        log::debug!(
            "tick {tick}: pairs={} none={} circle={} aabb={} obb={} minkowski={} probe={:?}",
            summary.pairs_tested,
            counts[CollisionStatus::None as usize],
            counts[CollisionStatus::Circle as usize],
            counts[CollisionStatus::Aabb as usize],
            counts[CollisionStatus::Obb as usize],
            counts[CollisionStatus::Minkowski as usize],
            scene.probe.status(),
        );
        if summary.degenerate_hulls > 0 {
            log::warn!("tick {tick}: {} degenerate hulls", summary.degenerate_hulls);
        }
    }

    let counts = scene.status_counts();
    log::info!(
        "Final statuses: {:?}",
        CollisionStatus::ALL
            .iter()
            .zip(counts)
            .collect::<Vec<_>>()
    );
    log::info!("Probe collided on {probe_hits} of {TICKS} ticks");
    Ok(())
}
