use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

/// A source of uniform random values in [0, 1).
///
/// Every [RngCore] is a source, so tests can inject a seeded generator where
/// the renderer uses an OS-seeded one.
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// The unseeded generator used by the render thread.
pub fn os_seeded() -> StdRng {
    StdRng::from_os_rng()
}
