// systems/linear_path.rs
//
// Walks a mover through a fixed, ordered list of waypoints at constant speed.
// No graph, no planning: the simplest patrol.
//
// Usage:
//   let mut patrol = LinearPathController::new(waypoints, 3.0)?.looping();
//   patrol.update(dt, &mut body);

use glam::{Quat, Vec3};
use crate::api::error::NavError;
use crate::api::traits::Movable;
use crate::api::types::NavEvent;
use crate::core::waypoint::Waypoint;
use crate::interp::{step_toward, within_tolerance};

/// Default arrival tolerance on the ground plane.
const ARRIVAL_TOLERANCE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct LinearPathController {
    waypoints: Vec<Waypoint>,
    speed: f32,
    tolerance: f32,
    looping: bool,
    index: usize,
    finished: bool,
    events: Vec<NavEvent>,
}

impl LinearPathController {
    pub fn new(waypoints: Vec<Waypoint>, speed: f32) -> Result<Self, NavError> {
        if waypoints.is_empty() {
            return Err(NavError::EmptyPath);
        }
        Ok(Self {
            waypoints,
            speed,
            tolerance: ARRIVAL_TOLERANCE,
            looping: false,
            index: 0,
            finished: false,
            events: Vec::new(),
        })
    }

    /// Start over from the first waypoint after the last one.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = NavEvent> + '_ {
        self.events.drain(..)
    }

    /// Move toward the current waypoint, advancing at most one waypoint per call.
    pub fn update(&mut self, dt: f32, mover: &mut dyn Movable) {
        if self.finished {
            return;
        }

        let target = self.waypoints[self.index];
        if within_tolerance(mover.position(), target.position, self.tolerance) {
            self.events.push(NavEvent::WaypointReached { waypoint: target.id });
            self.index += 1;
            if self.index == self.waypoints.len() {
                if self.looping {
                    self.index = 0;
                    self.events.push(NavEvent::Looped);
                } else {
                    self.finished = true;
                    self.events.push(NavEvent::Stopped);
                    mover.set_velocity(Vec3::ZERO);
                    return;
                }
            }
        }

        let target = self.waypoints[self.index];
        let step = step_toward(mover.position(), target.position, self.speed, dt);
        mover.set_position(step.position);
        mover.set_velocity(step.velocity);
        if let Some(heading) = step.heading {
            mover.set_orientation(Quat::from_rotation_z(heading));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AgentId, WaypointId};
    use crate::components::body::Body;

    fn corners() -> Vec<Waypoint> {
        [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]
            .into_iter()
            .enumerate()
            .map(|(i, p)| Waypoint::new(WaypointId(i as u32), p))
            .collect()
    }

    #[test]
    fn visits_every_waypoint_and_stops() {
        let mut body = Body::new(AgentId(1));
        let mut patrol = LinearPathController::new(corners(), 1.0).unwrap();

        for _ in 0..40 {
            patrol.update(0.1, &mut body);
        }

        assert!(patrol.is_finished());
        assert!(body.position.distance(Vec3::new(1.0, 1.0, 0.0)) < 0.15);
        assert_eq!(body.velocity, Vec3::ZERO);
        let reached = patrol
            .drain_events()
            .filter(|e| matches!(e, NavEvent::WaypointReached { .. }))
            .count();
        assert_eq!(reached, 3);
    }

    #[test]
    fn looping_restarts() {
        let mut body = Body::new(AgentId(1));
        let mut patrol = LinearPathController::new(corners(), 1.0).unwrap().looping();

        for _ in 0..40 {
            patrol.update(0.1, &mut body);
        }

        assert!(!patrol.is_finished());
        assert!(patrol.drain_events().any(|e| e == NavEvent::Looped));
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(LinearPathController::new(Vec::new(), 1.0).unwrap_err(), NavError::EmptyPath);
    }
}
