use crate::constants::MAX_FRAME_SECONDS;

const EPSILON: f64 = 1e-9;

/// Fixed-timestep accumulator. Wall-clock frame deltas go in, a whole number
/// of simulation steps comes out; the remainder carries into the next frame.
#[derive(Clone, Debug)]
pub struct FrameClock {
    accumulator: f64,
    step: f64,
    max_frame: f64,
}

impl FrameClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            accumulator: 0.0,
            step: 1.0 / tick_rate.max(1) as f64,
            max_frame: MAX_FRAME_SECONDS,
        }
    }

    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Stalled frames are clamped so a long pause cannot turn into an
    /// unbounded catch-up burst.
    pub fn accumulate(&mut self, frame_seconds: f64) -> u32 {
        let delta = if frame_seconds.is_finite() {
            frame_seconds.clamp(0.0, self.max_frame)
        } else {
            0.0
        };
        self.accumulator += delta;

        let mut steps = 0;
        while self.accumulator + EPSILON >= self.step {
            self.accumulator = (self.accumulator - self.step).max(0.0);
            steps += 1;
        }
        steps
    }
}
