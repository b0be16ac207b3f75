// interp/linear.rs
//
// Straight-line motion between two waypoints: heading plus a constant-speed
// step that never overshoots the target.

use glam::Vec3;

/// Axis a mover faces at zero heading.
pub const FORWARD: Vec3 = Vec3::Y;
/// World up; headings rotate about this axis.
pub const UP: Vec3 = Vec3::Z;

/// Heading in radians about `UP` that turns `FORWARD` toward `direction`.
///
/// Computed as the arccos of the dot product with `FORWARD` on the ground
/// plane, negated when `direction` points to the right (+X). `None` when
/// `direction` has no ground-plane component.
pub fn heading(direction: Vec3) -> Option<f32> {
    let flat = Vec3::new(direction.x, direction.y, 0.0).try_normalize()?;
    let angle = flat.dot(FORWARD).clamp(-1.0, 1.0).acos();
    Some(if flat.x > 0.0 { -angle } else { angle })
}

/// Result of one constant-speed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStep {
    /// Position after the step.
    pub position: Vec3,
    /// Velocity that produced the step (zero once on target).
    pub velocity: Vec3,
    /// Heading toward the target, if it has a ground-plane component.
    pub heading: Option<f32>,
    /// Distance still left to the target.
    pub remaining: f32,
}

/// Move from `current` toward `target` at `speed` for `dt` seconds.
pub fn step_toward(current: Vec3, target: Vec3, speed: f32, dt: f32) -> LinearStep {
    let delta = target - current;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return LinearStep {
            position: target,
            velocity: Vec3::ZERO,
            heading: None,
            remaining: 0.0,
        };
    }

    let direction = delta / distance;
    let travel = (speed * dt).clamp(0.0, distance);
    LinearStep {
        position: if travel >= distance { target } else { current + direction * travel },
        velocity: direction * speed,
        heading: heading(direction),
        remaining: distance - travel,
    }
}

/// Fuzzy arrival test on the ground plane: |dx| and |dy| both under `tolerance`.
#[inline]
pub fn within_tolerance(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a.x - b.x).abs() < tolerance && (a.y - b.y).abs() < tolerance
}
