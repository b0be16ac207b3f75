//! Contracts for the collaborators a follower drives or consults.
//!
//! The host owns the actual scene objects and collision world; the
//! controllers only see them through these traits.

use glam::{Quat, Vec3};

/// An object a controller can move: a character, a camera, a scene node.
pub trait Movable {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Teleport to a world position.
    fn set_position(&mut self, position: Vec3);

    /// Set world orientation.
    fn set_orientation(&mut self, orientation: Quat);

    /// Velocity hint for hosts that integrate motion themselves.
    /// Controllers set it to zero when they stop.
    fn set_velocity(&mut self, _velocity: Vec3) {}
}

/// Line-of-sight test used by string-pulling.
pub trait OcclusionQuery {
    /// Whether the straight segment from `from` to `to` is blocked.
    fn is_obstructed(&self, from: Vec3, to: Vec3) -> bool;
}

/// An occlusion query for open worlds: nothing ever blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl OcclusionQuery for OpenSky {
    fn is_obstructed(&self, _from: Vec3, _to: Vec3) -> bool {
        false
    }
}

impl<F> OcclusionQuery for F
where
    F: Fn(Vec3, Vec3) -> bool,
{
    fn is_obstructed(&self, from: Vec3, to: Vec3) -> bool {
        self(from, to)
    }
}
