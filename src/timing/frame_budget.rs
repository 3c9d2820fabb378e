use {
    super::FrameBudget,
    std::time::{Duration, Instant},
};

impl FrameBudget {
    /// Create a new frame budget.
    ///
    /// The baseline for the first frame's elapsed time is the moment the
    /// budget is created, so construct it right before the loop starts.
    pub fn new(target_duration: Duration) -> Self {
        let now = Instant::now();
        Self {
            target_duration,
            previous_start: now,
            frame_start: now,
        }
    }

    /// Call at the beginning of each frame.
    ///
    /// Returns the wall-clock time since the previous frame started (or since
    /// the budget was created, for the first frame).
    pub fn start_frame(&mut self) -> Duration {
        self.previous_start = self.frame_start;
        self.frame_start = Instant::now();
        self.frame_start - self.previous_start
    }

    /// The time left in this frame's budget, zero if the frame ran long.
    pub fn remaining(&self) -> Duration {
        self.target_duration.saturating_sub(self.frame_start.elapsed())
    }

    /// The per-frame budget.
    pub fn target_duration(&self) -> Duration {
        self.target_duration
    }
}
