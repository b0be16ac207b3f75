// interp/spline.rs
//
// Timed spline through waypoints with time codes.
//
// Each sample blends four consecutive waypoints with a pyramid of linear
// interpolations (Barry–Goldman form of Catmull-Rom): the curve passes through
// every waypoint at its time code and is C1 between segments.

use glam::{Quat, Vec3};
use crate::api::error::NavError;
use crate::core::waypoint::Waypoint;
use super::linear::UP;
use super::{lerp_param, lerp_vec3, look_rotation};

/// Blend four points with time codes `times` at query time `t`.
///
/// The result equals `points[1]` at `times[1]` and `points[2]` at `times[2]`.
/// Repeated time codes are allowed: the affected blend factor becomes 0.0.
pub fn splerp(points: [Vec3; 4], times: [f32; 4], t: f32) -> Vec3 {
    let [p0, p1, p2, p3] = points;
    let [t0, t1, t2, t3] = times;

    let a1 = lerp_vec3(p0, p1, lerp_param(t0, t1, t));
    let a2 = lerp_vec3(p1, p2, lerp_param(t1, t2, t));
    let a3 = lerp_vec3(p2, p3, lerp_param(t2, t3, t));

    let b1 = lerp_vec3(a1, a2, lerp_param(t0, t2, t));
    let b2 = lerp_vec3(a2, a3, lerp_param(t1, t3, t));

    lerp_vec3(b1, b2, lerp_param(t1, t2, t))
}

/// One evaluated point on a timed spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    pub position: Vec3,
    /// Present when the surrounding waypoints carry look-at hints.
    pub orientation: Option<Quat>,
    /// Index of the waypoint that starts the active segment.
    pub segment: usize,
    /// Query time after wrapping (loop) or clamping (one-shot).
    pub time: f32,
}

/// Waypoints ordered by time code, sampled with `splerp`.
///
/// One-shot splines clamp queries to the first and last time codes. Looping
/// splines treat time modulo `period` and connect the last waypoint back to
/// the first.
#[derive(Debug, Clone)]
pub struct TimedSpline {
    keys: Vec<Waypoint>,
    period: Option<f32>,
}

impl TimedSpline {
    /// A one-shot spline. Every waypoint needs a time code, in non-decreasing order.
    pub fn new(keys: Vec<Waypoint>) -> Result<Self, NavError> {
        Self::validate(&keys)?;
        Ok(Self { keys, period: None })
    }

    /// A spline that wraps back to its first waypoint after `period` seconds.
    pub fn looping(keys: Vec<Waypoint>, period: f32) -> Result<Self, NavError> {
        Self::validate(&keys)?;
        let spline = Self { keys, period: None };
        let span = spline.end_time() - spline.start_time();
        if !period.is_finite() || !(period > span) {
            return Err(NavError::InvalidPeriod { period, span });
        }
        Ok(Self {
            period: Some(period),
            ..spline
        })
    }

    fn validate(keys: &[Waypoint]) -> Result<(), NavError> {
        if keys.is_empty() {
            return Err(NavError::EmptyPath);
        }
        let mut previous: Option<f32> = None;
        for key in keys {
            let time = key.time_code.ok_or(NavError::MissingTimeCode(key.id))?;
            if !time.is_finite() {
                return Err(NavError::NonFiniteTimeCode(key.id));
            }
            if let Some(prev) = previous {
                if time < prev {
                    return Err(NavError::UnorderedTimeCodes { previous: prev, found: time });
                }
            }
            previous = Some(time);
        }
        Ok(())
    }

    fn time_of(&self, index: usize) -> f32 {
        // Presence checked in `validate`.
        self.keys[index].time_code.unwrap_or_default()
    }

    pub fn keys(&self) -> &[Waypoint] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn period(&self) -> Option<f32> {
        self.period
    }

    pub fn is_looping(&self) -> bool {
        self.period.is_some()
    }

    pub fn start_time(&self) -> f32 {
        self.time_of(0)
    }

    pub fn end_time(&self) -> f32 {
        self.time_of(self.keys.len() - 1)
    }

    /// Map an arbitrary query time into the spline's domain.
    pub fn normalize_time(&self, t: f32) -> f32 {
        let start = self.start_time();
        match self.period {
            Some(period) => start + (t - start).rem_euclid(period),
            None => t.clamp(start, self.end_time()),
        }
    }

    /// Index of the waypoint starting the segment that contains normalized time `t`.
    pub fn segment_at(&self, t: f32) -> usize {
        // Last key whose time code is <= t; index 0 when t precedes everything.
        self.keys
            .partition_point(|k| k.time_code.unwrap_or_default() <= t)
            .saturating_sub(1)
    }

    // Waypoint at a possibly out-of-range index, with its time code shifted
    // by whole periods so all four knots are ordered relative to the query.
    fn knot(&self, index: isize) -> (&Waypoint, f32) {
        let n = self.keys.len() as isize;
        match self.period {
            Some(period) => {
                let wraps = index.div_euclid(n);
                let slot = index.rem_euclid(n) as usize;
                (&self.keys[slot], self.time_of(slot) + period * wraps as f32)
            }
            None => {
                let slot = index.clamp(0, n - 1) as usize;
                (&self.keys[slot], self.time_of(slot))
            }
        }
    }

    /// Evaluate position (and orientation when hinted) at time `t`.
    pub fn sample(&self, t: f32) -> SplineSample {
        let time = self.normalize_time(t);
        let segment = self.segment_at(time);
        let i = segment as isize;
        let knots = [self.knot(i - 1), self.knot(i), self.knot(i + 1), self.knot(i + 2)];
        let times = knots.map(|(_, time)| time);

        let position = splerp(knots.map(|(w, _)| w.position), times, time);

        let orientation = match knots.map(|(w, _)| w.look_at) {
            [Some(l0), Some(l1), Some(l2), Some(l3)] => {
                let forward = splerp([l0, l1, l2, l3], times, time);
                let up = splerp(knots.map(|(w, _)| w.up.unwrap_or(UP)), times, time);
                look_rotation(forward, up)
            }
            _ => None,
        };

        SplineSample {
            position,
            orientation,
            segment,
            time,
        }
    }
}
