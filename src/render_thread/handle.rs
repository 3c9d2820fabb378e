use {
    super::{Exit, RenderControl},
    std::thread::{self, JoinHandle},
};

/// The owning side of a spawned render thread.
pub struct RenderHandle {
    control: RenderControl,
    join_handle: JoinHandle<Exit>,
}

impl RenderHandle {
    pub(super) fn new(
        control: RenderControl,
        join_handle: JoinHandle<Exit>,
    ) -> Self {
        Self {
            control,
            join_handle,
        }
    }

    /// A control surface which can be shared with other threads.
    pub fn control(&self) -> RenderControl {
        self.control.clone()
    }

    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    pub fn request_fade_out(&self) {
        self.control.request_fade_out();
    }

    /// True once the worker has returned, for any reason.
    pub fn is_finished(&self) -> bool {
        self.join_handle.is_finished()
    }

    /// Wait for the worker to finish.
    ///
    /// This does not request a stop. Call [Self::request_stop] first unless
    /// the worker is expected to exit on its own.
    pub fn join(self) -> thread::Result<Exit> {
        self.join_handle.join()
    }
}

impl std::fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderHandle")
            .field("control", &self.control)
            .field("finished", &self.is_finished())
            .finish()
    }
}
