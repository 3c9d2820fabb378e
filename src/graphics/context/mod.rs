//! Ownership of the display, config, rendering context and window surface for
//! a single render thread.

mod error;

use {
    crate::graphics::backend::{ContextApi, PixelFormat},
    indoc::indoc,
};

pub use self::error::ContextError;

/// The graphics context state for one drawable.
///
/// Either nothing is acquired, or (after a successful [Self::initialize])
/// every handle is valid and the context is current on the thread that
/// initialized it. A failed initialize leaves whatever it did acquire in
/// place for [Self::shutdown] to release.
///
/// The context is not meant to move between threads after initialization.
/// Contexts are bound to the thread which made them current.
pub struct GraphicsContext<B: ContextApi> {
    backend: B,
    display: Option<B::Display>,
    config: Option<B::Config>,
    context: Option<B::Context>,
    surface: Option<B::Surface>,
}

impl<B: ContextApi> GraphicsContext<B> {
    /// Wrap a backend. Nothing is acquired until [Self::initialize].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            display: None,
            config: None,
            context: None,
            surface: None,
        }
    }

    /// Acquire a display, choose an [PixelFormat::OVERLAY] config, create a
    /// rendering context and a surface for the drawable, then make them
    /// current on the calling thread.
    ///
    /// Every failure is logged with the backend's error code. The caller is
    /// expected to call [Self::shutdown] after a failure.
    pub fn initialize(
        &mut self,
        drawable: &B::Drawable,
    ) -> Result<(), ContextError> {
        let result = self.try_initialize(drawable);
        if let Err(error) = &result {
            log::error!("Graphics context initialization failed: {}", error);
        }
        result
    }

    fn try_initialize(
        &mut self,
        drawable: &B::Drawable,
    ) -> Result<(), ContextError> {
        let display = self
            .backend
            .default_display()
            .ok_or_else(|| ContextError::NoDisplay(self.backend.last_error()))?;
        self.display = Some(display);

        let (major, minor) =
            self.backend.initialize(display).ok_or_else(|| {
                ContextError::InitializeFailed(self.backend.last_error())
            })?;

        let config = self
            .backend
            .choose_config(display, &PixelFormat::OVERLAY)
            .map_err(ContextError::ChooseConfigFailed)?
            .ok_or(ContextError::NoMatchingConfig)?;
        self.config = Some(config);

        let context =
            self.backend.create_context(display, config).ok_or_else(|| {
                ContextError::CreateContextFailed(self.backend.last_error())
            })?;
        self.context = Some(context);

        let surface = self
            .backend
            .create_window_surface(display, config, drawable)
            .ok_or_else(|| {
                ContextError::CreateSurfaceFailed(self.backend.last_error())
            })?;
        self.surface = Some(surface);

        if !self.backend.make_current(display, Some((surface, context))) {
            return Err(ContextError::MakeCurrentFailed(
                self.backend.last_error(),
            ));
        }

        log::info!(
            indoc!(
                "
                Graphics context ready
                  display version: {}.{}
                  config: {:?}
                "
            ),
            major,
            minor,
            config
        );

        Ok(())
    }

    /// True when every handle has been acquired.
    pub fn is_initialized(&self) -> bool {
        self.display.is_some()
            && self.config.is_some()
            && self.context.is_some()
            && self.surface.is_some()
    }

    /// Make sure this context and surface are still current on the calling
    /// thread, re-binding them if the platform detached them.
    ///
    /// A failed re-bind is fatal for the render loop.
    pub fn ensure_current(&mut self) -> Result<(), ContextError> {
        let (display, surface, context) = self.bound_handles()?;

        let is_current = self.backend.current_context() == Some(context)
            && self.backend.current_draw_surface() == Some(surface);
        if is_current {
            return Ok(());
        }

        log::debug!("Graphics context was detached, re-binding");
        if !self.backend.make_current(display, Some((surface, context))) {
            let error = ContextError::ContextLost(self.backend.last_error());
            log::error!("{}", error);
            return Err(error);
        }
        Ok(())
    }

    /// Publish the frame drawn since the last present.
    pub fn present(&mut self) -> Result<(), ContextError> {
        let (display, surface, _) = self.bound_handles()?;
        if !self.backend.swap_buffers(display, surface) {
            let error = ContextError::SwapFailed(self.backend.last_error());
            log::error!("Could not swap buffers: {}", error);
            return Err(error);
        }
        Ok(())
    }

    /// Release the thread binding, then destroy the context and the surface.
    ///
    /// Safe to call after a partial (or no) initialization, and safe to call
    /// more than once.
    pub fn shutdown(&mut self) {
        let display = match self.display.take() {
            Some(display) => display,
            None => {
                // nothing was acquired
                return;
            }
        };

        if !self.backend.make_current(display, None) {
            log::warn!(
                "Unable to release the current context: {}",
                self.backend.last_error()
            );
        }
        if let Some(context) = self.context.take() {
            if !self.backend.destroy_context(display, context) {
                log::warn!(
                    "Unable to destroy the context: {}",
                    self.backend.last_error()
                );
            }
        }
        if let Some(surface) = self.surface.take() {
            if !self.backend.destroy_surface(display, surface) {
                log::warn!(
                    "Unable to destroy the surface: {}",
                    self.backend.last_error()
                );
            }
        }
        self.config = None;
        log::debug!("Graphics context shut down");
    }

    /// The backend, for issuing draw calls against the current context.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn bound_handles(
        &self,
    ) -> Result<(B::Display, B::Surface, B::Context), ContextError> {
        match (self.display, self.surface, self.context) {
            (Some(display), Some(surface), Some(context)) => {
                Ok((display, surface, context))
            }
            _ => Err(ContextError::NotInitialized),
        }
    }
}

impl<B: ContextApi> Drop for GraphicsContext<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
