//! The seams between the renderer and a platform graphics stack.
//!
//! [ContextApi] is shaped like EGL: it hands out opaque handles for a display,
//! a pixel-format config, a rendering context and a window surface, and binds
//! them to the calling thread. [DrawApi] is shaped like fixed-function GLES:
//! every call mutates the state of whatever context is current.
//!
//! The renderer only ever talks to these traits, so the frame loop and the
//! particle model run the same against a native backend, the
//! [crate::graphics::software] backend, or a fake in tests.

mod error_code;

use {
    crate::{graphics::QuadGeometry, math::Mat4},
    std::fmt::Debug,
};

pub use self::error_code::ErrorCode;

/// The channel sizes requested when choosing a config.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelFormat {
    pub red_bits: u8,
    pub green_bits: u8,
    pub blue_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl PixelFormat {
    /// 8-bit RGB with no alpha, depth or stencil. The overlay is composited
    /// additively so it never needs destination alpha.
    pub const OVERLAY: Self = Self {
        red_bits: 8,
        green_bits: 8,
        blue_bits: 8,
        alpha_bits: 0,
        depth_bits: 0,
        stencil_bits: 0,
    };
}

/// A straight (not premultiplied) RGBA color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const OPAQUE_WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const OPAQUE_BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White with the given opacity.
    pub const fn white(alpha: f32) -> Self {
        Self::new(1.0, 1.0, 1.0, alpha)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// `result = src * src_factor + dst * dst_factor`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Source weighted by its alpha, added onto the destination.
    pub const ADDITIVE: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::One,
    };
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// A texture name generated by [DrawApi::generate_texture].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Display connection, config negotiation, context and surface lifetime, and
/// presentation.
///
/// Failures are reported the way EGL reports them: a sentinel (`None` or
/// `false`) from the call, with details available from [Self::last_error].
pub trait ContextApi {
    type Display: Copy + Eq + Debug;
    type Config: Copy + Debug;
    type Context: Copy + Eq + Debug;
    type Surface: Copy + Eq + Debug;

    /// The platform's presentable target, e.g. a native window.
    type Drawable;

    /// Get a connection to the default display.
    fn default_display(&mut self) -> Option<Self::Display>;

    /// Initialize the display connection, returning the (major, minor)
    /// version of the implementation.
    fn initialize(&mut self, display: Self::Display) -> Option<(i32, i32)>;

    /// Choose the first config matching the requested format.
    ///
    /// `Ok(None)` means the request was valid but nothing matched.
    fn choose_config(
        &mut self,
        display: Self::Display,
        format: &PixelFormat,
    ) -> Result<Option<Self::Config>, ErrorCode>;

    fn create_context(
        &mut self,
        display: Self::Display,
        config: Self::Config,
    ) -> Option<Self::Context>;

    fn create_window_surface(
        &mut self,
        display: Self::Display,
        config: Self::Config,
        drawable: &Self::Drawable,
    ) -> Option<Self::Surface>;

    /// Bind a surface and context to the calling thread. `None` releases
    /// whatever is currently bound.
    fn make_current(
        &mut self,
        display: Self::Display,
        binding: Option<(Self::Surface, Self::Context)>,
    ) -> bool;

    /// The context bound to the calling thread, if any.
    fn current_context(&self) -> Option<Self::Context>;

    /// The draw surface bound to the calling thread, if any.
    fn current_draw_surface(&self) -> Option<Self::Surface>;

    /// Publish the surface's back buffer.
    fn swap_buffers(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> bool;

    fn destroy_context(
        &mut self,
        display: Self::Display,
        context: Self::Context,
    ) -> bool;

    fn destroy_surface(
        &mut self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> bool;

    /// The error from the most recent failed call, resetting it to
    /// [ErrorCode::SUCCESS].
    fn last_error(&mut self) -> ErrorCode;
}

/// Immediate-mode draw state and commands against the current context.
pub trait DrawApi {
    fn set_clear_color(&mut self, color: Rgba);

    /// Clear the color buffer to the clear color.
    fn clear(&mut self);

    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_projection(&mut self, projection: &Mat4);

    fn set_model_view(&mut self, model_view: &Mat4);

    fn set_texturing(&mut self, enabled: bool);

    /// Enable blending with the given function, or disable it with `None`.
    fn set_blend(&mut self, blend: Option<BlendFunc>);

    fn generate_texture(&mut self) -> TextureId;

    fn bind_texture(&mut self, texture: TextureId);

    /// Set the minification and magnification filters of the bound texture.
    fn set_texture_filters(&mut self, min: TextureFilter, mag: TextureFilter);

    /// Upload tightly packed RGBA8 pixels into the bound texture.
    fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]);

    fn set_front_face(&mut self, winding: Winding);

    /// Point the vertex and texture-coordinate arrays at the quad's buffers
    /// and enable them.
    fn enable_quad_arrays(&mut self, quad: &QuadGeometry);

    fn disable_quad_arrays(&mut self);

    /// The color every vertex is modulated by.
    fn set_color(&mut self, color: Rgba);

    /// Draw indexed triangles from the enabled arrays.
    fn draw_elements(&mut self, indices: &[u16]);
}

/// A complete backend: context management plus drawing into the current
/// context.
pub trait Backend: ContextApi + DrawApi {}

impl<T: ContextApi + DrawApi> Backend for T {}
