use crate::{
    config::{
        SurfaceSize, FADE_PER_MS, MIN_SCALE, PHASE_DURATION_MS,
        SPEED_UNITS_PER_SECOND,
    },
    fireflies::RandomSource,
    graphics::{
        backend::{DrawApi, Rgba, Winding},
        QuadGeometry,
    },
    math::translate_scale,
};

/// One animated point of light.
///
/// A firefly drifts along its heading and pulses between full and half size.
/// Each phase lasts [PHASE_DURATION_MS]; when it runs out the firefly turns
/// to a new random heading and reverses the direction it scales in.
#[derive(Debug, Clone, PartialEq)]
pub struct Firefly {
    x: f32,
    y: f32,
    heading_degrees: f32,
    scaling_down: bool,
    phase_remaining_ms: i64,
    scale: f32,
    opacity: f32,
}

impl Firefly {
    /// A fully opaque firefly with the given motion and phase state.
    pub fn new(
        x: f32,
        y: f32,
        heading_degrees: f32,
        scaling_down: bool,
        phase_remaining_ms: i64,
    ) -> Self {
        let mut firefly = Self {
            x,
            y,
            heading_degrees,
            scaling_down,
            phase_remaining_ms,
            scale: 1.0,
            opacity: 1.0,
        };
        firefly.scale = firefly.phase_scale();
        firefly
    }

    /// A firefly placed at random on the surface.
    pub fn random(surface: SurfaceSize, rng: &mut impl RandomSource) -> Self {
        let mut firefly = Self::new(0.0, 0.0, 0.0, false, 0);
        firefly.reset(surface, rng);
        firefly
    }

    /// Re-randomize position, heading and phase and restore full opacity.
    ///
    /// The x position, heading, scale direction and phase time all derive
    /// from one random value. Only y gets an independent draw.
    pub fn reset(&mut self, surface: SurfaceSize, rng: &mut impl RandomSource) {
        let seed = rng.next_unit();

        self.x = seed * surface.width() as f32;
        self.y = rng.next_unit() * surface.height() as f32;
        self.heading_degrees = seed * 360.0;
        self.scaling_down = seed > 0.5;
        self.phase_remaining_ms = (seed * PHASE_DURATION_MS as f32) as i64;
        self.opacity = 1.0;
        self.scale = self.phase_scale();
    }

    /// Advance the animation by `elapsed_ms`.
    ///
    /// While fading, only the opacity changes: it decays toward zero and
    /// everything else stays frozen.
    pub fn update(
        &mut self,
        elapsed_ms: u64,
        fading: bool,
        surface: SurfaceSize,
        rng: &mut impl RandomSource,
    ) {
        if fading {
            let faded = self.opacity - elapsed_ms as f32 * FADE_PER_MS;
            self.opacity = faded.max(0.0);
            return;
        }

        let distance = elapsed_ms as f32 / 1000.0 * SPEED_UNITS_PER_SECOND;
        let heading = self.heading_degrees.to_radians();
        self.x = wrap(self.x + heading.cos() * distance, surface.width());
        self.y = wrap(self.y + heading.sin() * distance, surface.height());

        self.scale = self.phase_scale();

        let elapsed = i64::try_from(elapsed_ms).unwrap_or(i64::MAX);
        self.phase_remaining_ms = self.phase_remaining_ms.saturating_sub(elapsed);
        if self.phase_remaining_ms < 0 {
            self.heading_degrees = rng.next_unit() * 360.0;
            self.scaling_down = !self.scaling_down;
            self.phase_remaining_ms = PHASE_DURATION_MS;
        }
    }

    /// Draw the shared quad at this firefly's position, scale and opacity.
    ///
    /// The color is restored to opaque white afterwards so the opacity never
    /// leaks into the next draw.
    pub fn draw(&self, draw: &mut impl DrawApi, quad: &QuadGeometry) {
        draw.set_model_view(&translate_scale(self.x, self.y, self.scale));
        draw.set_front_face(Winding::CounterClockwise);
        draw.enable_quad_arrays(quad);

        draw.set_color(Rgba::white(self.opacity));
        draw.draw_elements(&quad.indices());

        draw.set_color(Rgba::OPAQUE_WHITE);
        draw.disable_quad_arrays();
    }

    /// The scale for the current point in the phase. Shrinking runs from
    /// full size down to [MIN_SCALE], growing runs back up.
    fn phase_scale(&self) -> f32 {
        let fraction =
            self.phase_remaining_ms as f32 / PHASE_DURATION_MS as f32;
        if self.scaling_down {
            1.0 - fraction * MIN_SCALE
        } else {
            MIN_SCALE + fraction * MIN_SCALE
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn heading_degrees(&self) -> f32 {
        self.heading_degrees
    }

    pub fn is_scaling_down(&self) -> bool {
        self.scaling_down
    }

    pub fn phase_remaining_ms(&self) -> i64 {
        self.phase_remaining_ms
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Floored modulo into [0, bound).
fn wrap(value: f32, bound: u32) -> f32 {
    let bound = bound as f32;
    let mut wrapped = value % bound;
    if wrapped < 0.0 {
        wrapped += bound;
    }
    // adding the bound to a tiny negative value can round up to the bound
    if wrapped >= bound {
        wrapped = 0.0;
    }
    wrapped
}
