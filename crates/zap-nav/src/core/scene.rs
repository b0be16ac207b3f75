use crate::api::types::AgentId;
use crate::components::body::Body;

/// Flat storage for the bodies a `Navigator` moves.
/// Designed for small-to-medium agent counts (hundreds, not millions).
#[derive(Debug, Default)]
pub struct Scene {
    bodies: Vec<Body>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(64),
        }
    }

    /// Add a body to the scene.
    pub fn spawn(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// Remove a body by ID. Returns the removed body if found.
    pub fn despawn(&mut self, id: AgentId) -> Option<Body> {
        let idx = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.swap_remove(idx))
    }

    pub fn get(&self, id: AgentId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// Find the first body with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_get_despawn() {
        let mut scene = Scene::new();
        scene.spawn(Body::new(AgentId(1)).with_position(Vec3::X).with_tag("scout"));
        scene.spawn(Body::new(AgentId(2)));

        assert_eq!(scene.get(AgentId(1)).unwrap().position, Vec3::X);
        assert_eq!(scene.find_by_tag("scout").unwrap().id, AgentId(1));

        assert!(scene.despawn(AgentId(1)).is_some());
        assert!(scene.despawn(AgentId(1)).is_none());
        assert_eq!(scene.len(), 1);
    }
}
