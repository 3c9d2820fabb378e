use std::{
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc, OnceLock,
    },
    thread::Thread,
    time::Duration,
};

/// Where a render thread is in its one-shot lifecycle.
///
/// States only ever move forward:
/// `Created -> Initializing -> Running -> Draining -> Terminated`.
/// A failed initialization goes straight from `Initializing` to `Draining`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u8)]
pub enum LifecycleState {
    Created = 0,
    Initializing = 1,
    Running = 2,
    Draining = 3,
    Terminated = 4,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Created,
            1 => Self::Initializing,
            2 => Self::Running,
            3 => Self::Draining,
            _ => Self::Terminated,
        }
    }
}

struct Shared {
    stop_requested: AtomicBool,
    fade_out_requested: AtomicBool,
    state: AtomicU8,
    worker: OnceLock<Thread>,
}

/// The thread-safe control surface of a render thread.
///
/// Both requests are one-shot: once set they are never cleared. The worker
/// reads each flag once per frame, so a request takes effect within one
/// frame. Nothing here blocks or takes a lock.
#[derive(Clone)]
pub struct RenderControl {
    shared: Arc<Shared>,
}

impl Default for RenderControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderControl {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                stop_requested: AtomicBool::new(false),
                fade_out_requested: AtomicBool::new(false),
                state: AtomicU8::new(LifecycleState::Created as u8),
                worker: OnceLock::new(),
            }),
        }
    }

    /// Ask the render loop to finish. Wakes the worker if it is sleeping
    /// between frames.
    pub fn request_stop(&self) {
        self.shared.stop_requested.store(true, Ordering::Release);
        if let Some(worker) = self.shared.worker.get() {
            worker.unpark();
        }
    }

    /// Ask every firefly to fade to transparent.
    pub fn request_fade_out(&self) {
        self.shared.fade_out_requested.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.shared.stop_requested.load(Ordering::Acquire)
    }

    pub fn is_fade_out_requested(&self) -> bool {
        self.shared.fade_out_requested.load(Ordering::Acquire)
    }

    /// The worker's current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub(super) fn set_state(&self, state: LifecycleState) {
        let previous = self.shared.state.fetch_max(state as u8, Ordering::AcqRel);
        if previous < state as u8 {
            log::debug!(
                "Render thread {:?} -> {:?}",
                LifecycleState::from_u8(previous),
                state
            );
        }
    }

    /// Register the calling thread as the worker so stop requests can wake
    /// it.
    pub(super) fn register_worker(&self) {
        let _ = self.shared.worker.set(std::thread::current());
    }

    /// Sleep for up to `duration`. A stop request cuts the sleep short.
    ///
    /// Waking early (for any reason) is a normal wake, not an error.
    pub(super) fn sleep(&self, duration: Duration) {
        if duration.is_zero() || self.is_stop_requested() {
            return;
        }
        std::thread::park_timeout(duration);
    }
}

impl std::fmt::Debug for RenderControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderControl")
            .field("stop_requested", &self.is_stop_requested())
            .field("fade_out_requested", &self.is_fade_out_requested())
            .field("state", &self.state())
            .finish()
    }
}
