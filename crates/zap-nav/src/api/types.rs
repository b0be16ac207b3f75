use serde::{Deserialize, Serialize};

/// Unique identifier for a waypoint in a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(pub u32);

impl std::fmt::Display for WaypointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for an agent driven by a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentId(pub u32);

/// Something a follower reports back to its owner.
/// Collected per tick and drained by the caller, never acted on internally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// The follower reached an intermediate or final waypoint.
    WaypointReached { waypoint: WaypointId },
    /// The follower reached the goal it was planning toward.
    GoalReached { goal: WaypointId },
    /// A new path was planned.
    PathPlanned { goal: WaypointId, waypoints: usize, cost: f32 },
    /// The planner found no route to `goal`.
    Unreachable { goal: WaypointId },
    /// String-pulling dropped a waypoint from the active path.
    WaypointSkipped { waypoint: WaypointId },
    /// The follower wrapped back to the first waypoint of a looping path.
    Looped,
    /// The follower stopped and went idle.
    Stopped,
}
