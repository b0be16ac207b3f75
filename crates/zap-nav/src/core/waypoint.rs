use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::api::types::WaypointId;

/// Optional data attached to a waypoint when it is added to a store.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaypointMeta {
    /// Explicit id. When `None` the store assigns the next free one.
    pub id: Option<WaypointId>,
    /// Direction a camera passing this point should look toward.
    pub look_at: Option<Vec3>,
    /// Up vector paired with `look_at`.
    pub up: Option<Vec3>,
    /// Time (seconds) at which a timed spline passes through this point.
    pub time_code: Option<f32>,
}

impl WaypointMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: WaypointId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = Some(look_at);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = Some(up);
        self
    }

    pub fn with_time(mut self, time_code: f32) -> Self {
        self.time_code = Some(time_code);
        self
    }
}

/// A point in 3D space that paths are built from.
/// Immutable once stored; paths and followers hold copies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_code: Option<f32>,
}

impl Waypoint {
    /// A bare waypoint with no orientation or timing.
    pub fn new(id: WaypointId, position: Vec3) -> Self {
        Self {
            id,
            position,
            look_at: None,
            up: None,
            time_code: None,
        }
    }

    /// A waypoint for a timed spline.
    pub fn timed(id: WaypointId, position: Vec3, time_code: f32) -> Self {
        Self {
            time_code: Some(time_code),
            ..Self::new(id, position)
        }
    }

    pub fn with_look_at(mut self, look_at: Vec3) -> Self {
        self.look_at = Some(look_at);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = Some(up);
        self
    }

    /// Straight-line distance to another waypoint.
    #[inline]
    pub fn distance(&self, other: &Waypoint) -> f32 {
        self.position.distance(other.position)
    }
}
