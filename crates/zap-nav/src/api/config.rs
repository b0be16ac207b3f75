use serde::{Deserialize, Serialize};
use crate::api::error::NavError;

/// Top-level configuration, typically loaded from a JSON file by the host.
/// Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Upper bound on fixed steps run for a single frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Follower movement and re-planning behavior.
    pub follower: FollowerConfig,
    /// A* search limits.
    pub planner: PlannerConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            follower: FollowerConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl NavConfig {
    /// Reject values that would stall or corrupt the simulation.
    pub fn validate(&self) -> Result<(), NavError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(NavError::InvalidConfig(format!("fixed_dt must be positive, got {}", self.fixed_dt)));
        }
        let follower = &self.follower;
        if !follower.speed.is_finite() || follower.speed < 0.0 {
            return Err(NavError::InvalidConfig(format!("follower.speed must be non-negative, got {}", follower.speed)));
        }
        if !follower.arrival_tolerance.is_finite() || follower.arrival_tolerance <= 0.0 {
            return Err(NavError::InvalidConfig(format!(
                "follower.arrival_tolerance must be positive, got {}",
                follower.arrival_tolerance
            )));
        }
        if self.planner.max_cost.is_some_and(f32::is_nan) {
            return Err(NavError::InvalidConfig("planner.max_cost is NaN".into()));
        }
        Ok(())
    }

    /// Parse and validate a config from a JSON string.
    #[cfg(feature = "persistence")]
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Per-follower tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// A waypoint counts as reached when both |dx| and |dy| are below this.
    pub arrival_tolerance: f32,
    /// Drop intermediate waypoints when an occlusion query reports a clear line.
    pub string_pulling: bool,
    /// Restart the current path from its first waypoint instead of stopping.
    pub loop_path: bool,
    /// Goals tried per tick when re-planning keeps coming back empty.
    pub max_replan_attempts: u32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            arrival_tolerance: 0.1,
            string_pulling: true,
            loop_path: false,
            max_replan_attempts: 4,
        }
    }
}

impl FollowerConfig {
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.arrival_tolerance = tolerance;
        self
    }

    pub fn with_string_pulling(mut self, enabled: bool) -> Self {
        self.string_pulling = enabled;
        self
    }

    pub fn looping(mut self) -> Self {
        self.loop_path = true;
        self
    }
}

/// Bounds for a single A* search. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Give up after expanding this many nodes.
    pub max_expansions: Option<usize>,
    /// Give up on routes whose accumulated cost exceeds this.
    pub max_cost: Option<f32>,
}
