use glam::{Quat, Vec3};
use crate::api::traits::Movable;
use crate::api::types::AgentId;

/// Minimal movable object: a transform plus a velocity hint.
/// Hosts with their own scene graph implement `Movable` on their nodes instead.
#[derive(Debug, Clone)]
pub struct Body {
    /// Unique identifier.
    pub id: AgentId,
    /// String tag for finding bodies by name.
    pub tag: String,
    /// Position in world space.
    pub position: Vec3,
    /// Orientation in world space.
    pub orientation: Quat,
    /// Last velocity written by a controller.
    pub velocity: Vec3,
}

impl Body {
    /// Create a new body with the given ID at the origin.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            tag: String::new(),
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}

impl Movable for Body {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
}
