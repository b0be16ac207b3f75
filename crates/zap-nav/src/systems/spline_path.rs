// systems/spline_path.rs
//
// Plays a TimedSpline back on a mover: camera fly-throughs and scripted paths.
//
// Usage:
//   let spline = TimedSpline::looping(keys, 12.0)?;
//   let mut camera = SplinePathController::new(spline);
//   camera.update(dt, &mut camera_body);

use glam::Vec3;
use crate::api::traits::Movable;
use crate::interp::{SplineSample, TimedSpline};

#[derive(Debug, Clone)]
pub struct SplinePathController {
    spline: TimedSpline,
    /// Unwrapped playback time; the spline normalizes it on sampling.
    elapsed: f32,
    rate: f32,
    playing: bool,
    last: Option<SplineSample>,
}

impl SplinePathController {
    pub fn new(spline: TimedSpline) -> Self {
        let elapsed = spline.start_time();
        Self {
            spline,
            elapsed,
            rate: 1.0,
            playing: true,
            last: None,
        }
    }

    /// Playback speed multiplier (1.0 = real time).
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn spline(&self) -> &TimedSpline {
        &self.spline
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// The most recent sample written to the mover.
    pub fn last_sample(&self) -> Option<&SplineSample> {
        self.last.as_ref()
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Jump to a playback time.
    pub fn seek(&mut self, time: f32) {
        self.elapsed = time;
        self.last = None;
    }

    /// A one-shot spline is finished once playback reaches its last time code
    /// and that point has been written to the mover.
    pub fn is_finished(&self) -> bool {
        !self.spline.is_looping() && self.elapsed >= self.spline.end_time() && self.last.is_some()
    }

    pub fn update(&mut self, dt: f32, mover: &mut dyn Movable) {
        if !self.playing {
            return;
        }
        if self.is_finished() {
            mover.set_velocity(Vec3::ZERO);
            return;
        }

        self.elapsed += dt * self.rate;
        if let Some(period) = self.spline.period() {
            // Keep the clock bounded on long loops.
            let start = self.spline.start_time();
            if self.elapsed - start >= period {
                self.elapsed = start + (self.elapsed - start).rem_euclid(period);
            }
        }

        let from = mover.position();
        let sample = self.spline.sample(self.elapsed);
        mover.set_position(sample.position);
        if let Some(orientation) = sample.orientation {
            mover.set_orientation(orientation);
        }
        if dt > 0.0 {
            mover.set_velocity((sample.position - from) / dt);
        }
        if self.is_finished() {
            log::debug!("spline playback finished at t={:.2}", self.elapsed);
        }
        self.last = Some(sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AgentId, WaypointId};
    use crate::components::body::Body;
    use crate::core::waypoint::Waypoint;

    fn keys() -> Vec<Waypoint> {
        [Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 0.0), Vec3::new(0.0, 4.0, 0.0)]
            .into_iter()
            .enumerate()
            .map(|(i, p)| Waypoint::timed(WaypointId(i as u32), p, i as f32))
            .collect()
    }

    #[test]
    fn one_shot_finishes_at_last_key() {
        let mut body = Body::new(AgentId(1));
        let mut camera = SplinePathController::new(TimedSpline::new(keys()).unwrap());

        for _ in 0..40 {
            camera.update(0.1, &mut body);
        }

        assert!(camera.is_finished());
        assert!(body.position.distance(Vec3::new(0.0, 4.0, 0.0)) < 1e-4);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn single_key_is_written_before_finishing() {
        let key = Waypoint::timed(WaypointId(0), Vec3::new(3.0, 0.0, 0.0), 0.0);
        let mut body = Body::new(AgentId(1));
        let mut camera = SplinePathController::new(TimedSpline::new(vec![key]).unwrap());
        assert!(!camera.is_finished());

        camera.update(0.1, &mut body);
        assert!(camera.is_finished());
        assert!(body.position.distance(Vec3::new(3.0, 0.0, 0.0)) < 1e-5);

        camera.update(0.1, &mut body);
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn seek_past_end_lands_on_last_key() {
        let mut body = Body::new(AgentId(1));
        let mut camera = SplinePathController::new(TimedSpline::new(keys()).unwrap());
        camera.update(0.1, &mut body);

        camera.seek(10.0);
        assert!(!camera.is_finished());
        camera.update(0.1, &mut body);
        assert!(camera.is_finished());
        assert!(body.position.distance(Vec3::new(0.0, 4.0, 0.0)) < 1e-4);
    }

    #[test]
    fn loop_keeps_playing() {
        let mut body = Body::new(AgentId(1));
        let mut camera = SplinePathController::new(TimedSpline::looping(keys(), 4.0).unwrap());

        for _ in 0..100 {
            camera.update(0.1, &mut body);
        }

        assert!(!camera.is_finished());
        assert!(camera.elapsed() < 4.0);
        assert!(body.position.is_finite());
    }

    #[test]
    fn pause_and_rate() {
        let mut body = Body::new(AgentId(1));
        let mut camera = SplinePathController::new(TimedSpline::new(keys()).unwrap()).with_rate(2.0);

        camera.update(0.5, &mut body);
        assert!((camera.elapsed() - 1.0).abs() < 1e-6);
        assert!(body.position.distance(Vec3::new(4.0, 0.0, 0.0)) < 1e-4);

        camera.pause();
        camera.update(0.5, &mut body);
        assert!((camera.elapsed() - 1.0).abs() < 1e-6);
    }
}
