//! The firefly swarm: pure animation state and per-tick math, plus the draw
//! calls for each particle.

mod firefly;
mod random;

use crate::{
    config::{SurfaceSize, PARTICLE_COUNT},
    graphics::{backend::DrawApi, QuadGeometry},
};

pub use self::{
    firefly::Firefly,
    random::{os_seeded, RandomSource},
};

/// The fixed population of fireflies, in draw order.
#[derive(Debug, Clone)]
pub struct Swarm {
    fireflies: Vec<Firefly>,
    surface: SurfaceSize,
}

impl Swarm {
    /// Create [PARTICLE_COUNT] randomly placed fireflies.
    pub fn new(surface: SurfaceSize, rng: &mut impl RandomSource) -> Self {
        let fireflies = (0..PARTICLE_COUNT)
            .map(|_| Firefly::random(surface, rng))
            .collect();
        Self { fireflies, surface }
    }

    /// Reset every firefly together.
    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        for firefly in &mut self.fireflies {
            firefly.reset(self.surface, rng);
        }
    }

    /// Update each firefly, then draw it, in population order.
    pub fn update_and_draw(
        &mut self,
        elapsed_ms: u64,
        fading: bool,
        rng: &mut impl RandomSource,
        draw: &mut impl DrawApi,
        quad: &QuadGeometry,
    ) {
        for firefly in &mut self.fireflies {
            firefly.update(elapsed_ms, fading, self.surface, rng);
            firefly.draw(draw, quad);
        }
    }

    pub fn fireflies(&self) -> &[Firefly] {
        &self.fireflies
    }

    pub fn len(&self) -> usize {
        self.fireflies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fireflies.is_empty()
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::graphics::fake::{Call, FakeBackend},
        rand::{rngs::StdRng, SeedableRng},
    };

    fn surface() -> SurfaceSize {
        SurfaceSize::new(480, 800).unwrap()
    }

    #[test]
    fn the_swarm_has_a_fixed_population() {
        let swarm = Swarm::new(surface(), &mut StdRng::seed_from_u64(1));

        assert_eq!(swarm.len(), 100);
        assert!(swarm
            .fireflies()
            .iter()
            .all(|f| f.x() < 480.0 && f.y() < 800.0 && f.opacity() == 1.0));
    }

    #[test]
    fn reset_restores_opacity_after_a_fade() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut swarm = Swarm::new(surface(), &mut rng);
        let mut backend = FakeBackend::new();
        let quad = QuadGeometry::new();
        swarm.update_and_draw(1000, true, &mut rng, &mut backend, &quad);
        assert!(swarm.fireflies().iter().all(|f| f.opacity() == 0.0));

        swarm.reset(&mut rng);

        assert!(swarm.fireflies().iter().all(|f| f.opacity() == 1.0));
    }

    #[test]
    fn every_firefly_is_drawn_once_per_frame() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut swarm = Swarm::new(surface(), &mut rng);
        let mut backend = FakeBackend::new();

        swarm.update_and_draw(
            16,
            false,
            &mut rng,
            &mut backend,
            &QuadGeometry::new(),
        );

        assert_eq!(backend.count(&Call::DrawElements(6)), 100);
    }
}
