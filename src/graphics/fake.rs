//! A recording backend for unit tests.
//!
//! Clones share state, so a test can keep one clone while another is moved
//! into a context or a renderer.

use {
    crate::{
        graphics::{
            backend::{
                BlendFunc, ContextApi, DrawApi, ErrorCode, PixelFormat, Rgba,
                TextureFilter, TextureId, Winding,
            },
            QuadGeometry,
        },
        math::Mat4,
        render_thread::RenderControl,
    },
    std::{
        collections::HashSet,
        sync::{Arc, Mutex, MutexGuard},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DefaultDisplay,
    Initialize,
    ChooseConfig(PixelFormat),
    CreateContext,
    CreateWindowSurface,
    MakeCurrent(bool),
    SwapBuffers,
    DestroyContext,
    DestroySurface,

    SetClearColor(Rgba),
    Clear,
    SetViewport(u32, u32),
    SetProjection(Mat4),
    SetModelView(Mat4),
    SetTexturing(bool),
    SetBlend(Option<BlendFunc>),
    GenerateTexture(TextureId),
    BindTexture(TextureId),
    SetTextureFilters(TextureFilter, TextureFilter),
    UploadTexture { width: u32, height: u32, bytes: usize },
    SetFrontFace(Winding),
    EnableQuadArrays,
    DisableQuadArrays,
    SetColor(Rgba),
    DrawElements(usize),
}

impl Call {
    fn is_context_call(&self) -> bool {
        matches!(
            self,
            Call::DefaultDisplay
                | Call::Initialize
                | Call::ChooseConfig(_)
                | Call::CreateContext
                | Call::CreateWindowSurface
                | Call::MakeCurrent(_)
                | Call::SwapBuffers
                | Call::DestroyContext
                | Call::DestroySurface
        )
    }
}

/// The step a fake backend should fail at.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Failure {
    NoDisplay,
    Initialize,
    ChooseConfig,
    NoConfig,
    CreateContext,
    CreateSurface,
    MakeCurrent,
    Swap,
}

/// The fake's drawable carries nothing.
#[derive(Debug, Copy, Clone)]
pub struct FakeDrawable;

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    failure: Option<Failure>,
    last_error: Option<ErrorCode>,
    next_handle: u32,
    next_texture: u32,
    live_contexts: HashSet<u32>,
    live_surfaces: HashSet<u32>,
    current: Option<(u32, u32)>,
    swaps: usize,
    fail_swap_at: Option<usize>,
    lose_context_at: Option<usize>,
    stop_at: Option<(usize, RenderControl)>,
    fade_at: Option<(usize, RenderControl)>,
}

impl State {
    fn record(&mut self, call: Call) {
        self.calls.push(call);
    }

    fn fails(&mut self, failure: Failure, code: ErrorCode) -> bool {
        if self.failure == Some(failure) {
            self.last_error = Some(code);
            true
        } else {
            false
        }
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self, failure: Failure) -> Self {
        self.set_failure(failure);
        self
    }

    pub fn set_failure(&self, failure: Failure) {
        self.state().failure = Some(failure);
    }

    /// Fail the nth swap (1-based).
    pub fn fail_swap_at(self, swap: usize) -> Self {
        self.state().fail_swap_at = Some(swap);
        self
    }

    /// Detach the context during the nth swap and refuse to re-bind it.
    pub fn lose_context_at(self, swap: usize) -> Self {
        self.state().lose_context_at = Some(swap);
        self
    }

    /// Request a stop from inside the nth swap.
    pub fn stop_at(self, swap: usize, control: RenderControl) -> Self {
        self.state().stop_at = Some((swap, control));
        self
    }

    /// Request a fade-out from inside the nth swap.
    pub fn fade_at(self, swap: usize, control: RenderControl) -> Self {
        self.state().fade_at = Some((swap, control));
        self
    }

    /// Simulate the platform silently unbinding the context.
    pub fn detach_current(&self) {
        self.state().current = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn context_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_context_call)
            .collect()
    }

    pub fn draw_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| !call.is_context_call())
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state().calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn swaps(&self) -> usize {
        self.state().swaps
    }

    pub fn live_contexts(&self) -> usize {
        self.state().live_contexts.len()
    }

    pub fn live_surfaces(&self) -> usize {
        self.state().live_surfaces.len()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

impl ContextApi for FakeBackend {
    type Display = u32;
    type Config = u32;
    type Context = u32;
    type Surface = u32;
    type Drawable = FakeDrawable;

    fn default_display(&mut self) -> Option<u32> {
        let mut state = self.state();
        state.record(Call::DefaultDisplay);
        if state.fails(Failure::NoDisplay, ErrorCode::BAD_DISPLAY) {
            return None;
        }
        Some(state.handle())
    }

    fn initialize(&mut self, _display: u32) -> Option<(i32, i32)> {
        let mut state = self.state();
        state.record(Call::Initialize);
        if state.fails(Failure::Initialize, ErrorCode::NOT_INITIALIZED) {
            return None;
        }
        Some((1, 4))
    }

    fn choose_config(
        &mut self,
        _display: u32,
        format: &PixelFormat,
    ) -> Result<Option<u32>, ErrorCode> {
        let mut state = self.state();
        state.record(Call::ChooseConfig(*format));
        if state.fails(Failure::ChooseConfig, ErrorCode::BAD_ATTRIBUTE) {
            return Err(ErrorCode::BAD_ATTRIBUTE);
        }
        if state.failure == Some(Failure::NoConfig) {
            return Ok(None);
        }
        Ok(Some(state.handle()))
    }

    fn create_context(&mut self, _display: u32, _config: u32) -> Option<u32> {
        let mut state = self.state();
        state.record(Call::CreateContext);
        if state.fails(Failure::CreateContext, ErrorCode::BAD_CONFIG) {
            return None;
        }
        let context = state.handle();
        state.live_contexts.insert(context);
        Some(context)
    }

    fn create_window_surface(
        &mut self,
        _display: u32,
        _config: u32,
        _drawable: &FakeDrawable,
    ) -> Option<u32> {
        let mut state = self.state();
        state.record(Call::CreateWindowSurface);
        if state.fails(Failure::CreateSurface, ErrorCode::BAD_NATIVE_WINDOW) {
            return None;
        }
        let surface = state.handle();
        state.live_surfaces.insert(surface);
        Some(surface)
    }

    fn make_current(
        &mut self,
        _display: u32,
        binding: Option<(u32, u32)>,
    ) -> bool {
        let mut state = self.state();
        state.record(Call::MakeCurrent(binding.is_some()));
        if binding.is_some()
            && state.fails(Failure::MakeCurrent, ErrorCode::CONTEXT_LOST)
        {
            return false;
        }
        state.current = binding;
        true
    }

    fn current_context(&self) -> Option<u32> {
        self.state().current.map(|(_, context)| context)
    }

    fn current_draw_surface(&self) -> Option<u32> {
        self.state().current.map(|(surface, _)| surface)
    }

    fn swap_buffers(&mut self, _display: u32, _surface: u32) -> bool {
        let mut state = self.state();
        state.record(Call::SwapBuffers);
        state.swaps += 1;
        let swap = state.swaps;

        if let Some((at, control)) = &state.stop_at {
            if *at == swap {
                control.request_stop();
            }
        }
        if let Some((at, control)) = &state.fade_at {
            if *at == swap {
                control.request_fade_out();
            }
        }
        if state.lose_context_at == Some(swap) {
            state.current = None;
            state.failure = Some(Failure::MakeCurrent);
        }
        if state.fail_swap_at == Some(swap) {
            state.failure = Some(Failure::Swap);
        }
        !state.fails(Failure::Swap, ErrorCode::BAD_SURFACE)
    }

    fn destroy_context(&mut self, _display: u32, context: u32) -> bool {
        let mut state = self.state();
        state.record(Call::DestroyContext);
        state.live_contexts.remove(&context)
    }

    fn destroy_surface(&mut self, _display: u32, surface: u32) -> bool {
        let mut state = self.state();
        state.record(Call::DestroySurface);
        state.live_surfaces.remove(&surface)
    }

    fn last_error(&mut self) -> ErrorCode {
        self.state().last_error.take().unwrap_or(ErrorCode::SUCCESS)
    }
}

impl DrawApi for FakeBackend {
    fn set_clear_color(&mut self, color: Rgba) {
        self.state().record(Call::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.state().record(Call::Clear);
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.state().record(Call::SetViewport(width, height));
    }

    fn set_projection(&mut self, projection: &Mat4) {
        self.state().record(Call::SetProjection(*projection));
    }

    fn set_model_view(&mut self, model_view: &Mat4) {
        self.state().record(Call::SetModelView(*model_view));
    }

    fn set_texturing(&mut self, enabled: bool) {
        self.state().record(Call::SetTexturing(enabled));
    }

    fn set_blend(&mut self, blend: Option<BlendFunc>) {
        self.state().record(Call::SetBlend(blend));
    }

    fn generate_texture(&mut self) -> TextureId {
        let mut state = self.state();
        state.next_texture += 1;
        let texture = TextureId(state.next_texture);
        state.record(Call::GenerateTexture(texture));
        texture
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.state().record(Call::BindTexture(texture));
    }

    fn set_texture_filters(&mut self, min: TextureFilter, mag: TextureFilter) {
        self.state().record(Call::SetTextureFilters(min, mag));
    }

    fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.state().record(Call::UploadTexture {
            width,
            height,
            bytes: rgba.len(),
        });
    }

    fn set_front_face(&mut self, winding: Winding) {
        self.state().record(Call::SetFrontFace(winding));
    }

    fn enable_quad_arrays(&mut self, _quad: &QuadGeometry) {
        self.state().record(Call::EnableQuadArrays);
    }

    fn disable_quad_arrays(&mut self) {
        self.state().record(Call::DisableQuadArrays);
    }

    fn set_color(&mut self, color: Rgba) {
        self.state().record(Call::SetColor(color));
    }

    fn draw_elements(&mut self, indices: &[u16]) {
        self.state().record(Call::DrawElements(indices.len()));
    }
}
