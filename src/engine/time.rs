use std::time::Instant;

/// Longest frame step handed to the simulation. A stalled frame (window drag,
/// breakpoint) would otherwise teleport the character.
pub const MAX_FRAME_DT: f32 = 0.1;

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
    pub elapsed: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32().min(MAX_FRAME_DT);
        self.elapsed += self.dt;
        self.last = now;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
