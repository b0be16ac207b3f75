use crate::api::config::NavConfig;

/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of fixed navigation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Most ticks a single frame may produce.
    max_steps: u32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.fixed_dt, config.max_steps_per_frame)
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let steps = (self.accumulator / self.dt) as u32;
        // A long stall drops the backlog instead of running it all at once.
        if steps >= self.max_steps {
            if steps > self.max_steps {
                log::debug!("frame delta {frame_dt:.3}s exceeds {} steps, dropping backlog", self.max_steps);
            }
            self.accumulator = 0.0;
            return self.max_steps;
        }
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
