use super::types::WaypointId;

/// Errors reported by the waypoint store, the spline builder and file loading.
///
/// An unreachable goal is not an error: the planner returns an empty path and
/// followers treat that as a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// A waypoint id was referenced that the store does not hold.
    UnknownWaypoint(WaypointId),
    /// An explicit id collided with a waypoint already in the store.
    DuplicateId(WaypointId),
    /// A timed spline was built from a waypoint without a time code.
    MissingTimeCode(WaypointId),
    /// A time code was NaN or infinite.
    NonFiniteTimeCode(WaypointId),
    /// Spline time codes must be non-decreasing.
    UnorderedTimeCodes { previous: f32, found: f32 },
    /// A looping spline needs a period longer than the span of its time codes.
    InvalidPeriod { period: f32, span: f32 },
    /// A controller was given no waypoints to follow.
    EmptyPath,
    /// Every `u32` id is taken; no id can be assigned automatically.
    IdsExhausted,
    /// A config value is out of range.
    InvalidConfig(String),
    /// A waypoint file or config document could not be parsed.
    Format(String),
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavError::UnknownWaypoint(id) => write!(f, "unknown waypoint {id}"),
            NavError::DuplicateId(id) => write!(f, "waypoint {id} already exists"),
            NavError::MissingTimeCode(id) => write!(f, "waypoint {id} has no time code"),
            NavError::NonFiniteTimeCode(id) => write!(f, "waypoint {id} has a non-finite time code"),
            NavError::UnorderedTimeCodes { previous, found } => {
                write!(f, "time code {found} comes after {previous}")
            }
            NavError::InvalidPeriod { period, span } => {
                write!(f, "loop period {period} must exceed the spline span {span}")
            }
            NavError::EmptyPath => write!(f, "path has no waypoints"),
            NavError::IdsExhausted => write!(f, "no free waypoint id left"),
            NavError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            NavError::Format(msg) => write!(f, "malformed document: {msg}"),
        }
    }
}

impl std::error::Error for NavError {}

#[cfg(feature = "persistence")]
impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::Format(err.to_string())
    }
}
