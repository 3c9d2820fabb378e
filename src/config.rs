//! Start inputs for the renderer and the fixed animation constants.

use {std::time::Duration, thiserror::Error};

/// Number of fireflies in the swarm.
pub const PARTICLE_COUNT: usize = 100;

/// How fast a firefly travels along its heading.
pub const SPEED_UNITS_PER_SECOND: f32 = 50.0;

/// How long a firefly keeps its heading and scale direction.
pub const PHASE_DURATION_MS: i64 = 1250;

/// The smallest scale a firefly shrinks to.
pub const MIN_SCALE: f32 = 0.5;

/// Opacity lost per elapsed millisecond while fading out.
pub const FADE_PER_MS: f32 = 0.003;

/// Each frame sleeps off whatever part of this budget it didn't use.
pub const FRAME_BUDGET: Duration = Duration::from_millis(30);

/// Edge length of the firefly quad in surface units.
pub const QUAD_SIZE: f32 = 32.0;

/// The sprite used when no other asset name is configured.
pub const DEFAULT_SPRITE_ASSET: &str = "star.png";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The surface must have a non-zero size, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },

    #[error("The sprite asset name must not be empty")]
    EmptySpriteAsset,
}

/// The pixel dimensions of the drawable. Fixed for the life of the render
/// thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptySurface { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Everything the render thread needs besides the backend, the drawable and
/// the asset store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    surface: SurfaceSize,
    sprite_asset: String,
}

impl RendererConfig {
    /// A config for the given surface which uses the default sprite asset.
    pub fn new(surface: SurfaceSize) -> Self {
        Self {
            surface,
            sprite_asset: DEFAULT_SPRITE_ASSET.to_owned(),
        }
    }

    /// Use a different sprite asset.
    pub fn with_sprite_asset(
        mut self,
        name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptySpriteAsset);
        }
        self.sprite_asset = name;
        Ok(self)
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// The name of the sprite asset, never empty.
    pub fn sprite_asset(&self) -> &str {
        &self.sprite_asset
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_sized_surfaces_are_rejected() {
        assert_eq!(
            SurfaceSize::new(0, 800),
            Err(ConfigError::EmptySurface {
                width: 0,
                height: 800
            })
        );
        assert!(SurfaceSize::new(480, 0).is_err());
    }

    #[test]
    fn config_defaults_to_the_star_sprite() -> Result<(), ConfigError> {
        let config = RendererConfig::new(SurfaceSize::new(480, 800)?);

        assert_eq!(config.sprite_asset(), "star.png");
        assert_eq!(config.surface().width(), 480);
        assert_eq!(config.surface().height(), 800);
        Ok(())
    }

    #[test]
    fn empty_sprite_names_are_rejected() -> Result<(), ConfigError> {
        let config = RendererConfig::new(SurfaceSize::new(1, 1)?);

        assert_eq!(
            config.clone().with_sprite_asset(""),
            Err(ConfigError::EmptySpriteAsset)
        );
        assert_eq!(
            config.with_sprite_asset("moth.png")?.sprite_asset(),
            "moth.png"
        );
        Ok(())
    }
}
