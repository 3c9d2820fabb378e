mod frame_budget;

use std::time::{Duration, Instant};

/// The render loop doesn't need to run as fast as it possibly can. Each frame
/// gets a fixed time budget and the loop sleeps for whatever part of the
/// budget the frame didn't use. The budget also tracks the wall-clock time
/// between frame starts, which drives the animation.
pub struct FrameBudget {
    target_duration: Duration,
    previous_start: Instant,
    frame_start: Instant,
}
