pub mod api;
pub mod core;
pub mod components;
pub mod interp;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{NavConfig, FollowerConfig, PlannerConfig};
pub use api::error::NavError;
pub use api::traits::{Movable, OcclusionQuery, OpenSky};
pub use api::types::{WaypointId, AgentId, NavEvent};
pub use components::body::Body;
pub use core::scene::Scene;
pub use core::store::{WaypointStore, Edge};
pub use core::time::FixedTimestep;
pub use core::waypoint::{Waypoint, WaypointMeta};
#[cfg(feature = "persistence")]
pub use core::persistence::{WaypointFile, EdgeRecord};

pub use interp::{heading, lerp_param, look_rotation, splerp, step_toward, SplineSample, TimedSpline};
pub use systems::follower::{Follower, FollowState, NavContext, PlanOutcome};
pub use systems::goals::{GoalPolicy, RandomGoal, PatrolGoals};
pub use systems::linear_path::LinearPathController;
pub use systems::navigator::Navigator;
pub use systems::planner::{Planner, Path};
pub use systems::rng::Rng;
pub use systems::spline_path::SplinePathController;
