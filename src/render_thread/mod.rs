//! The render thread: owns the graphics context and the swarm, runs the frame
//! loop, and tears everything down when it's told to stop.

mod control;
mod handle;

use {
    crate::{
        assets::AssetStore,
        config::{RendererConfig, FRAME_BUDGET},
        fireflies::{os_seeded, RandomSource, Swarm},
        graphics::{
            backend::{Backend, BlendFunc, Rgba, TextureId},
            load_sprite_texture, ContextError, GraphicsContext, QuadGeometry,
        },
        math::projections::ortho,
        timing::FrameBudget,
    },
    std::io,
};

pub use self::{
    control::{LifecycleState, RenderControl},
    handle::RenderHandle,
};

/// Why a render thread finished.
///
/// Nothing is reported to the code that started the thread while it runs.
/// This is only observable by joining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// A stop was requested.
    Stopped,

    /// The graphics context could not be acquired. No frame was drawn.
    InitFailed(ContextError),

    /// A frame could not be presented.
    PresentFailed(ContextError),

    /// The context was detached and could not be re-bound.
    ContextLost(ContextError),
}

/// Resources which exist only once the context is up.
struct Scene<R> {
    quad: QuadGeometry,
    texture: TextureId,
    swarm: Swarm,
    rng: R,
}

/// A one-shot render task for a single drawable.
///
/// Build one, keep its [RenderControl] (or the [RenderHandle] returned by
/// [Self::spawn]) to send stop and fade-out requests, and let the worker do
/// everything else. All graphics resources are created and released on the
/// worker thread.
pub struct FireflyRenderer<B: Backend, A, R = rand::rngs::StdRng> {
    config: RendererConfig,
    drawable: B::Drawable,
    context: GraphicsContext<B>,
    assets: A,
    rng: R,
    control: RenderControl,
}

impl<B, A> FireflyRenderer<B, A>
where
    B: Backend,
    A: AssetStore,
{
    /// Create a renderer with an OS-seeded random source.
    pub fn new(
        config: RendererConfig,
        backend: B,
        drawable: B::Drawable,
        assets: A,
    ) -> Self {
        Self::with_rng(config, backend, drawable, assets, os_seeded())
    }
}

impl<B, A, R> FireflyRenderer<B, A, R>
where
    B: Backend,
    A: AssetStore,
    R: RandomSource,
{
    /// Create a renderer with a specific random source, e.g. a seeded one
    /// for reproducible runs.
    pub fn with_rng(
        config: RendererConfig,
        backend: B,
        drawable: B::Drawable,
        assets: A,
        rng: R,
    ) -> Self {
        Self {
            config,
            drawable,
            context: GraphicsContext::new(backend),
            assets,
            rng,
            control: RenderControl::new(),
        }
    }

    /// The control surface for this renderer.
    pub fn control(&self) -> RenderControl {
        self.control.clone()
    }

    /// Run the whole lifecycle on the calling thread: initialize, loop until
    /// stopped (or until a fatal error), then tear down exactly once.
    pub fn run(self) -> Exit {
        let Self {
            config,
            drawable,
            mut context,
            assets,
            rng,
            control,
        } = self;

        control.register_worker();
        let terminated = scopeguard::guard(control.clone(), |control| {
            control.set_state(LifecycleState::Terminated);
        });

        control.set_state(LifecycleState::Initializing);
        let initialized =
            initialize(&config, &drawable, &mut context, &assets, rng);
        let exit = match initialized {
            Ok(mut scene) => {
                control.set_state(LifecycleState::Running);
                frame_loop(&mut context, &mut scene, &control)
            }
            Err(error) => Exit::InitFailed(error),
        };

        control.set_state(LifecycleState::Draining);
        context.shutdown();
        drop(terminated);

        log::info!("Render thread finished: {:?}", exit);
        exit
    }
}

impl<B, A, R> FireflyRenderer<B, A, R>
where
    B: Backend,
    A: AssetStore,
    R: RandomSource,
    Self: Send + 'static,
{
    /// Run the renderer on a dedicated thread.
    ///
    /// Only fails if the thread itself can't be started. Render failures end
    /// the thread and are reported by [RenderHandle::join].
    pub fn spawn(self) -> io::Result<RenderHandle> {
        let control = self.control();
        let join_handle = std::thread::Builder::new()
            .name("firefly-render".to_owned())
            .spawn(move || self.run())?;
        Ok(RenderHandle::new(control, join_handle))
    }
}

/// Acquire the context, prepare the quad and sprite texture, set up the
/// screen-space projection and create the swarm.
fn initialize<B, A, R>(
    config: &RendererConfig,
    drawable: &B::Drawable,
    context: &mut GraphicsContext<B>,
    assets: &A,
    mut rng: R,
) -> Result<Scene<R>, ContextError>
where
    B: Backend,
    A: AssetStore,
    R: RandomSource,
{
    context.initialize(drawable)?;

    let surface = config.surface();
    let (width, height) = (surface.width(), surface.height());
    let draw = context.backend_mut();
    draw.set_clear_color(Rgba::OPAQUE_BLACK);

    let quad = QuadGeometry::new();
    let texture = load_sprite_texture(draw, assets, config.sprite_asset());

    draw.set_viewport(width, height);
    // y grows downward, matching the surface's pixel rows
    draw.set_projection(&ortho(
        0.0,
        width as f32,
        height as f32,
        0.0,
        -1.0,
        1.0,
    ));

    let mut swarm = Swarm::new(surface, &mut rng);
    swarm.reset(&mut rng);

    Ok(Scene {
        quad,
        texture,
        swarm,
        rng,
    })
}

/// Draw frames until a stop is requested or a frame fails.
fn frame_loop<B, R>(
    context: &mut GraphicsContext<B>,
    scene: &mut Scene<R>,
    control: &RenderControl,
) -> Exit
where
    B: Backend,
    R: RandomSource,
{
    let mut budget = FrameBudget::new(FRAME_BUDGET);

    while !control.is_stop_requested() {
        let elapsed = budget.start_frame();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        if let Err(error) = context.ensure_current() {
            return Exit::ContextLost(error);
        }

        let draw = context.backend_mut();
        draw.clear();
        draw.set_texturing(true);
        draw.bind_texture(scene.texture);
        draw.set_blend(Some(BlendFunc::ADDITIVE));

        let fading = control.is_fade_out_requested();
        scene.swarm.update_and_draw(
            elapsed_ms,
            fading,
            &mut scene.rng,
            draw,
            &scene.quad,
        );

        if let Err(error) = context.present() {
            return Exit::PresentFailed(error);
        }

        control.sleep(budget.remaining());
    }

    Exit::Stopped
}
