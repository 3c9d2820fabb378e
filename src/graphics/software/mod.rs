//! A CPU implementation of the backend seams.
//!
//! The software backend has one display and one RGBA8 config. Window surfaces
//! render into a private back buffer which `swap_buffers` copies into the
//! [SoftwareWindow]'s front buffer. It is deliberately small: enough state to
//! run the firefly renderer headless, in tests and in the demo.

mod raster;
mod window;

use {
    self::raster::{DrawState, Texture},
    crate::{
        graphics::{
            backend::{
                BlendFunc, ContextApi, DrawApi, ErrorCode, PixelFormat, Rgba,
                TextureFilter, TextureId, Winding,
            },
            QuadGeometry,
        },
        math::Mat4,
    },
    image::RgbaImage,
    std::collections::HashMap,
};

pub use self::window::SoftwareWindow;

/// The only config the software backend offers.
const CONFIG_FORMAT: PixelFormat = PixelFormat {
    red_bits: 8,
    green_bits: 8,
    blue_bits: 8,
    alpha_bits: 8,
    depth_bits: 0,
    stencil_bits: 0,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SoftwareDisplay(u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SoftwareConfig(u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SoftwareContext(u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SoftwareSurface(u32);

const DISPLAY: SoftwareDisplay = SoftwareDisplay(1);
const CONFIG: SoftwareConfig = SoftwareConfig(1);

/// Client-side vertex arrays, decoded from the quad's byte buffers.
struct QuadArrays {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
}

/// Draw state owned by one rendering context.
struct ContextState {
    textures: HashMap<TextureId, Texture>,
    next_texture: u32,
    bound_texture: Option<TextureId>,
    clear_color: Rgba,
    viewport: Option<(u32, u32)>,
    projection: Mat4,
    model_view: Mat4,
    texturing: bool,
    blend: Option<BlendFunc>,
    color: Rgba,
    arrays: Option<QuadArrays>,
}

impl ContextState {
    fn new() -> Self {
        Self {
            textures: HashMap::new(),
            next_texture: 0,
            bound_texture: None,
            clear_color: Rgba::new(0.0, 0.0, 0.0, 0.0),
            viewport: None,
            projection: Mat4::identity(),
            model_view: Mat4::identity(),
            texturing: false,
            blend: None,
            color: Rgba::OPAQUE_WHITE,
            arrays: None,
        }
    }

    fn bound_texture_mut(&mut self) -> Option<&mut Texture> {
        let id = self.bound_texture?;
        self.textures.get_mut(&id)
    }
}

struct SurfaceState {
    window: SoftwareWindow,
    back: RgbaImage,
}

/// A [ContextApi] + [DrawApi] implementation which renders on the CPU.
pub struct SoftwareBackend {
    initialized: bool,
    next_handle: u32,
    contexts: HashMap<SoftwareContext, ContextState>,
    surfaces: HashMap<SoftwareSurface, SurfaceState>,
    current: Option<(SoftwareSurface, SoftwareContext)>,
    last_error: ErrorCode,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self {
            initialized: false,
            next_handle: 0,
            contexts: HashMap::new(),
            surfaces: HashMap::new(),
            current: None,
            last_error: ErrorCode::SUCCESS,
        }
    }

    /// The number of contexts which have not been destroyed.
    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    /// The number of surfaces which have not been destroyed.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    fn fail<T>(&mut self, code: ErrorCode) -> Option<T> {
        self.last_error = code;
        None
    }

    fn check_display(&mut self, display: SoftwareDisplay) -> bool {
        if display != DISPLAY {
            self.last_error = ErrorCode::BAD_DISPLAY;
            return false;
        }
        if !self.initialized {
            self.last_error = ErrorCode::NOT_INITIALIZED;
            return false;
        }
        true
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn current_context_mut(&mut self, call: &str) -> Option<&mut ContextState> {
        let context = self.current.map(|(_, context)| context);
        let state = context.and_then(|context| self.contexts.get_mut(&context));
        if state.is_none() {
            log::trace!("Ignoring {} without a current context", call);
        }
        state
    }
}

impl ContextApi for SoftwareBackend {
    type Display = SoftwareDisplay;
    type Config = SoftwareConfig;
    type Context = SoftwareContext;
    type Surface = SoftwareSurface;
    type Drawable = SoftwareWindow;

    fn default_display(&mut self) -> Option<SoftwareDisplay> {
        Some(DISPLAY)
    }

    fn initialize(&mut self, display: SoftwareDisplay) -> Option<(i32, i32)> {
        if display != DISPLAY {
            return self.fail(ErrorCode::BAD_DISPLAY);
        }
        self.initialized = true;
        Some((1, 4))
    }

    fn choose_config(
        &mut self,
        display: SoftwareDisplay,
        format: &PixelFormat,
    ) -> Result<Option<SoftwareConfig>, ErrorCode> {
        if !self.check_display(display) {
            return Err(self.last_error);
        }
        // requested sizes are minimums
        let matches = format.red_bits <= CONFIG_FORMAT.red_bits
            && format.green_bits <= CONFIG_FORMAT.green_bits
            && format.blue_bits <= CONFIG_FORMAT.blue_bits
            && format.alpha_bits <= CONFIG_FORMAT.alpha_bits
            && format.depth_bits <= CONFIG_FORMAT.depth_bits
            && format.stencil_bits <= CONFIG_FORMAT.stencil_bits;
        Ok(matches.then_some(CONFIG))
    }

    fn create_context(
        &mut self,
        display: SoftwareDisplay,
        config: SoftwareConfig,
    ) -> Option<SoftwareContext> {
        if !self.check_display(display) {
            return None;
        }
        if config != CONFIG {
            return self.fail(ErrorCode::BAD_CONFIG);
        }
        let context = SoftwareContext(self.handle());
        self.contexts.insert(context, ContextState::new());
        Some(context)
    }

    fn create_window_surface(
        &mut self,
        display: SoftwareDisplay,
        config: SoftwareConfig,
        drawable: &SoftwareWindow,
    ) -> Option<SoftwareSurface> {
        if !self.check_display(display) {
            return None;
        }
        if config != CONFIG {
            return self.fail(ErrorCode::BAD_CONFIG);
        }
        let (width, height) = drawable.size();
        if width == 0 || height == 0 {
            return self.fail(ErrorCode::BAD_NATIVE_WINDOW);
        }
        let surface = SoftwareSurface(self.handle());
        self.surfaces.insert(
            surface,
            SurfaceState {
                window: drawable.clone(),
                back: RgbaImage::from_pixel(
                    width,
                    height,
                    image::Rgba([0, 0, 0, 255]),
                ),
            },
        );
        Some(surface)
    }

    fn make_current(
        &mut self,
        display: SoftwareDisplay,
        binding: Option<(SoftwareSurface, SoftwareContext)>,
    ) -> bool {
        if !self.check_display(display) {
            return false;
        }
        let (surface, context) = match binding {
            Some(binding) => binding,
            None => {
                self.current = None;
                return true;
            }
        };
        if !self.contexts.contains_key(&context) {
            self.last_error = ErrorCode::BAD_CONTEXT;
            return false;
        }
        let size = match self.surfaces.get(&surface) {
            Some(state) => state.back.dimensions(),
            None => {
                self.last_error = ErrorCode::BAD_SURFACE;
                return false;
            }
        };
        if let Some(state) = self.contexts.get_mut(&context) {
            // the viewport defaults to the first surface a context is bound to
            state.viewport.get_or_insert(size);
        }
        self.current = Some((surface, context));
        true
    }

    fn current_context(&self) -> Option<SoftwareContext> {
        self.current.map(|(_, context)| context)
    }

    fn current_draw_surface(&self) -> Option<SoftwareSurface> {
        self.current.map(|(surface, _)| surface)
    }

    fn swap_buffers(
        &mut self,
        display: SoftwareDisplay,
        surface: SoftwareSurface,
    ) -> bool {
        if !self.check_display(display) {
            return false;
        }
        match self.surfaces.get(&surface) {
            Some(state) => {
                state.window.present(&state.back);
                true
            }
            None => {
                self.last_error = ErrorCode::BAD_SURFACE;
                false
            }
        }
    }

    fn destroy_context(
        &mut self,
        display: SoftwareDisplay,
        context: SoftwareContext,
    ) -> bool {
        if !self.check_display(display) {
            return false;
        }
        if self.contexts.remove(&context).is_none() {
            self.last_error = ErrorCode::BAD_CONTEXT;
            return false;
        }
        if self.current_context() == Some(context) {
            self.current = None;
        }
        true
    }

    fn destroy_surface(
        &mut self,
        display: SoftwareDisplay,
        surface: SoftwareSurface,
    ) -> bool {
        if !self.check_display(display) {
            return false;
        }
        if self.surfaces.remove(&surface).is_none() {
            self.last_error = ErrorCode::BAD_SURFACE;
            return false;
        }
        if self.current_draw_surface() == Some(surface) {
            self.current = None;
        }
        true
    }

    fn last_error(&mut self) -> ErrorCode {
        std::mem::replace(&mut self.last_error, ErrorCode::SUCCESS)
    }
}

impl DrawApi for SoftwareBackend {
    fn set_clear_color(&mut self, color: Rgba) {
        if let Some(state) = self.current_context_mut("set_clear_color") {
            state.clear_color = color;
        }
    }

    fn clear(&mut self) {
        let (surface, context) = match self.current {
            Some(current) => current,
            None => return,
        };
        let (Some(state), Some(target)) =
            (self.contexts.get(&context), self.surfaces.get_mut(&surface))
        else {
            return;
        };
        let color = state.clear_color;
        let pixel = image::Rgba([
            raster::to_u8(color.r),
            raster::to_u8(color.g),
            raster::to_u8(color.b),
            255,
        ]);
        target.back.pixels_mut().for_each(|p| *p = pixel);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        if let Some(state) = self.current_context_mut("set_viewport") {
            state.viewport = Some((width, height));
        }
    }

    fn set_projection(&mut self, projection: &Mat4) {
        if let Some(state) = self.current_context_mut("set_projection") {
            state.projection = *projection;
        }
    }

    fn set_model_view(&mut self, model_view: &Mat4) {
        if let Some(state) = self.current_context_mut("set_model_view") {
            state.model_view = *model_view;
        }
    }

    fn set_texturing(&mut self, enabled: bool) {
        if let Some(state) = self.current_context_mut("set_texturing") {
            state.texturing = enabled;
        }
    }

    fn set_blend(&mut self, blend: Option<BlendFunc>) {
        if let Some(state) = self.current_context_mut("set_blend") {
            state.blend = blend;
        }
    }

    fn generate_texture(&mut self) -> TextureId {
        match self.current_context_mut("generate_texture") {
            Some(state) => {
                state.next_texture += 1;
                let texture = TextureId(state.next_texture);
                state.textures.insert(texture, Texture::new());
                texture
            }
            // GL reserves name 0 for "no texture"
            None => TextureId(0),
        }
    }

    fn bind_texture(&mut self, texture: TextureId) {
        if let Some(state) = self.current_context_mut("bind_texture") {
            state.bound_texture = Some(texture);
        }
    }

    fn set_texture_filters(&mut self, min: TextureFilter, mag: TextureFilter) {
        let texture = self
            .current_context_mut("set_texture_filters")
            .and_then(ContextState::bound_texture_mut);
        if let Some(texture) = texture {
            texture.min_filter = min;
            texture.mag_filter = mag;
        }
    }

    fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]) {
        let texture = self
            .current_context_mut("upload_texture")
            .and_then(ContextState::bound_texture_mut);
        let Some(texture) = texture else {
            return;
        };
        if width == 0 || height == 0 {
            log::warn!("Ignoring an empty {}x{} texture upload", width, height);
            return;
        }
        match RgbaImage::from_raw(width, height, rgba.to_vec()) {
            Some(image) => texture.image = Some(image),
            None => log::warn!(
                "Ignoring a {}x{} texture upload with {} bytes",
                width,
                height,
                rgba.len()
            ),
        }
    }

    fn set_front_face(&mut self, _winding: Winding) {
        // face culling is never enabled, so winding doesn't change coverage
    }

    fn enable_quad_arrays(&mut self, quad: &QuadGeometry) {
        if let Some(state) = self.current_context_mut("enable_quad_arrays") {
            state.arrays = Some(QuadArrays {
                positions: quad.positions(),
                tex_coords: quad.tex_coords(),
            });
        }
    }

    fn disable_quad_arrays(&mut self) {
        if let Some(state) = self.current_context_mut("disable_quad_arrays") {
            state.arrays = None;
        }
    }

    fn set_color(&mut self, color: Rgba) {
        if let Some(state) = self.current_context_mut("set_color") {
            state.color = color;
        }
    }

    fn draw_elements(&mut self, indices: &[u16]) {
        let (surface, context) = match self.current {
            Some(current) => current,
            None => {
                log::trace!("Ignoring draw_elements without a current context");
                return;
            }
        };
        let (Some(state), Some(target)) =
            (self.contexts.get(&context), self.surfaces.get_mut(&surface))
        else {
            return;
        };
        let Some(arrays) = &state.arrays else {
            log::trace!("Ignoring draw_elements without enabled arrays");
            return;
        };

        let texture = state
            .bound_texture
            .filter(|_| state.texturing)
            .and_then(|id| state.textures.get(&id));
        let draw_state = DrawState {
            transform: state.projection * state.model_view,
            viewport: state
                .viewport
                .unwrap_or_else(|| target.back.dimensions()),
            color: state.color,
            texture,
            blend: state.blend,
        };
        raster::draw_triangles(
            &mut target.back,
            &arrays.positions,
            &arrays.tex_coords,
            indices,
            &draw_state,
        );
    }
}
