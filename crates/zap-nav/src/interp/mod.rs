// interp/mod.rs
//
// Pure interpolation math for waypoint paths.
// No dependencies on stores, followers or scenes, just glam.

pub mod linear;
pub mod spline;

use glam::{Mat3, Quat, Vec3};

pub use linear::{heading, step_toward, within_tolerance, LinearStep, FORWARD, UP};
pub use spline::{splerp, SplineSample, TimedSpline};

// ── Interpolation helpers ────────────────────────────────────────────────

/// Where `t` sits between `t0` and `t1`, as a blend factor.
///
/// Not clamped: values outside [t0, t1] extrapolate, which the spline pyramid
/// relies on. A zero-length span yields exactly 0.0.
#[inline]
pub fn lerp_param(t0: f32, t1: f32, t: f32) -> f32 {
    let span = t1 - t0;
    if span == 0.0 {
        0.0
    } else {
        (t - t0) / span
    }
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec3 values.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Rotation that maps `FORWARD` onto `forward` and `UP` as close to `up` as
/// the two allow. `None` when `forward` is zero or parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let up = right.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, forward, up)))
}
