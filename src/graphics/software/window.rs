use {
    image::RgbaImage,
    std::sync::{Arc, Mutex, MutexGuard, PoisonError},
};

struct WindowState {
    front: RgbaImage,
    frames_presented: u64,
}

/// A presentable target for the software backend.
///
/// Clones share the same front buffer, so the application keeps one clone to
/// read presented frames while the render thread owns another inside its
/// window surface.
#[derive(Clone)]
pub struct SoftwareWindow {
    state: Arc<Mutex<WindowState>>,
}

impl SoftwareWindow {
    /// Create a window whose front buffer starts out opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(WindowState {
                front: RgbaImage::from_pixel(
                    width,
                    height,
                    image::Rgba([0, 0, 0, 255]),
                ),
                frames_presented: 0,
            })),
        }
    }

    /// The window's (width, height) in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.state().front.dimensions()
    }

    /// A copy of the most recently presented frame.
    pub fn snapshot(&self) -> RgbaImage {
        self.state().front.clone()
    }

    /// How many frames have been presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.state().frames_presented
    }

    pub(super) fn present(&self, back: &RgbaImage) {
        let mut state = self.state();
        state.front.clone_from(back);
        state.frames_presented += 1;
    }

    fn state(&self) -> MutexGuard<'_, WindowState> {
        // presenting only copies pixels, a poisoned lock still holds a frame
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SoftwareWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (width, height) = self.size();
        f.debug_struct("SoftwareWindow")
            .field("width", &width)
            .field("height", &height)
            .field("frames_presented", &self.frames_presented())
            .finish()
    }
}
