// systems/follower.rs
//
// Path follower: walks a mover along a planned waypoint path.
//
// Usage:
//   let ctx = NavContext::new(&store, &planner).with_occlusion(&world);
//   let mut follower = Follower::new(start, FollowerConfig::default())
//       .with_policy(RandomGoal::new(seed));
//   follower.set_goal(&ctx, goal)?;
//   follower.update(dt, &ctx, &mut body)?;   // once per fixed tick
//   for event in follower.drain_events() { ... }
//
// Per tick, while Following: string-pull at most one waypoint, test arrival
// on the current target (at most one advance), then step toward the target.

use glam::{Quat, Vec3};
use crate::api::config::FollowerConfig;
use crate::api::error::NavError;
use crate::api::traits::{Movable, OcclusionQuery};
use crate::api::types::{NavEvent, WaypointId};
use crate::core::store::WaypointStore;
use crate::core::waypoint::Waypoint;
use crate::interp::{step_toward, within_tolerance};
use super::goals::GoalPolicy;
use super::planner::Planner;

/// Follower lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowState {
    /// No path; the mover is left alone.
    #[default]
    Idle,
    /// Moving toward `path[index]`.
    Following,
    /// Past the last waypoint and waiting for a new goal.
    Arrived,
}

/// Result of asking a follower to plan toward a goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanOutcome {
    Planned { waypoints: usize, cost: f32 },
    Unreachable,
}

/// Read-only world a follower consults each tick.
#[derive(Clone, Copy)]
pub struct NavContext<'a> {
    pub store: &'a WaypointStore,
    pub planner: &'a Planner,
    /// Line-of-sight collaborator for string-pulling. `None` disables pulling.
    pub occlusion: Option<&'a dyn OcclusionQuery>,
}

impl<'a> NavContext<'a> {
    pub fn new(store: &'a WaypointStore, planner: &'a Planner) -> Self {
        Self {
            store,
            planner,
            occlusion: None,
        }
    }

    pub fn with_occlusion(mut self, occlusion: &'a dyn OcclusionQuery) -> Self {
        self.occlusion = Some(occlusion);
        self
    }
}

pub struct Follower {
    config: FollowerConfig,
    state: FollowState,
    path: Vec<Waypoint>,
    index: usize,
    /// Distance covered since the last waypoint was reached.
    progress: f32,
    /// Last waypoint reached, or the starting waypoint.
    current: WaypointId,
    goal: Option<WaypointId>,
    heading: f32,
    policy: Option<Box<dyn GoalPolicy>>,
    events: Vec<NavEvent>,
}

impl Follower {
    /// An idle follower standing at waypoint `start`.
    pub fn new(start: WaypointId, config: FollowerConfig) -> Self {
        Self {
            config,
            state: FollowState::Idle,
            path: Vec::new(),
            index: 0,
            progress: 0.0,
            current: start,
            goal: None,
            heading: 0.0,
            policy: None,
            events: Vec::new(),
        }
    }

    /// Consult `policy` for a new goal on arrival or when a goal is unreachable.
    pub fn with_policy(mut self, policy: impl GoalPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    /// Index of the waypoint currently being approached.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn current(&self) -> WaypointId {
        self.current
    }

    pub fn goal(&self) -> Option<WaypointId> {
        self.goal
    }

    /// Heading (radians about +Z) of the last movement.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// The waypoint being approached, if following.
    pub fn target(&self) -> Option<&Waypoint> {
        match self.state {
            FollowState::Following => self.path.get(self.index),
            _ => None,
        }
    }

    /// Drain events produced since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = NavEvent> + '_ {
        self.events.drain(..)
    }

    // The waypoint being approached, else the last one reached.
    fn anchor(&self) -> WaypointId {
        match self.target() {
            Some(target) => target.id,
            None => self.current,
        }
    }

    /// Plan toward `goal` and start following.
    ///
    /// An unreachable goal leaves the follower `Arrived` when it has a goal
    /// policy (the next update re-plans), otherwise `Idle`.
    pub fn set_goal(&mut self, ctx: &NavContext<'_>, goal: WaypointId) -> Result<PlanOutcome, NavError> {
        let outcome = self.plan(ctx, goal)?;
        if outcome == PlanOutcome::Unreachable {
            self.path.clear();
            self.index = 0;
            if self.policy.is_some() {
                self.state = FollowState::Arrived;
            } else {
                self.state = FollowState::Idle;
                self.events.push(NavEvent::Stopped);
            }
        }
        Ok(outcome)
    }

    /// Follow an explicit waypoint sequence without planning.
    pub fn follow(&mut self, path: Vec<Waypoint>) -> Result<(), NavError> {
        let last = path.last().ok_or(NavError::EmptyPath)?;
        self.goal = Some(last.id);
        self.path = path;
        self.index = 0;
        self.progress = 0.0;
        self.state = FollowState::Following;
        Ok(())
    }

    /// Drop the path and go idle.
    pub fn stop(&mut self, mover: &mut dyn Movable) {
        if self.state != FollowState::Idle {
            log::info!("follower at {} stopped", self.current);
            self.events.push(NavEvent::Stopped);
        }
        self.state = FollowState::Idle;
        self.path.clear();
        self.index = 0;
        self.progress = 0.0;
        self.goal = None;
        mover.set_velocity(Vec3::ZERO);
    }

    fn plan(&mut self, ctx: &NavContext<'_>, goal: WaypointId) -> Result<PlanOutcome, NavError> {
        let anchor = self.anchor();
        let path = ctx.planner.find_path(ctx.store, anchor, goal)?;
        self.goal = Some(goal);

        if path.is_empty() {
            log::warn!("no route from {anchor} to {goal}");
            self.events.push(NavEvent::Unreachable { goal });
            return Ok(PlanOutcome::Unreachable);
        }

        let (waypoints, cost) = (path.len(), path.cost());
        log::info!("planned {anchor} -> {goal}: {waypoints} waypoints, cost {cost:.2}");
        self.events.push(NavEvent::PathPlanned { goal, waypoints, cost });
        self.path = path.into_waypoints();
        self.index = 0;
        self.progress = 0.0;
        self.state = FollowState::Following;
        Ok(PlanOutcome::Planned { waypoints, cost })
    }

    /// Advance by `dt` seconds, moving `mover` along the path.
    pub fn update(&mut self, dt: f32, ctx: &NavContext<'_>, mover: &mut dyn Movable) -> Result<(), NavError> {
        match self.state {
            FollowState::Idle => {
                mover.set_velocity(Vec3::ZERO);
                return Ok(());
            }
            FollowState::Arrived => self.resolve_arrival(ctx, mover)?,
            FollowState::Following => {}
        }
        if self.state != FollowState::Following {
            return Ok(());
        }

        self.pull_string(ctx, mover.position());

        let Some(target) = self.path.get(self.index).copied() else {
            // A path emptied from outside; treat as arrival.
            self.state = FollowState::Arrived;
            return self.resolve_arrival(ctx, mover);
        };

        if within_tolerance(mover.position(), target.position, self.config.arrival_tolerance) {
            self.reach(target.id);
            if self.index >= self.path.len() {
                self.state = FollowState::Arrived;
                if self.goal == Some(self.current) {
                    log::info!("goal {} reached", self.current);
                    self.events.push(NavEvent::GoalReached { goal: self.current });
                }
                self.resolve_arrival(ctx, mover)?;
                if self.state != FollowState::Following {
                    return Ok(());
                }
            }
        }

        self.advance(dt, mover);
        Ok(())
    }

    fn reach(&mut self, id: WaypointId) {
        self.current = id;
        self.index += 1;
        self.progress = 0.0;
        self.events.push(NavEvent::WaypointReached { waypoint: id });
    }

    // Drop path[index + 1] when the mover can see path[index + 2] directly.
    fn pull_string(&mut self, ctx: &NavContext<'_>, position: Vec3) {
        if !self.config.string_pulling {
            return;
        }
        let Some(occlusion) = ctx.occlusion else {
            return;
        };
        if self.path.len() < self.index + 3 {
            return;
        }
        let beyond = self.path[self.index + 2];
        if occlusion.is_obstructed(position, beyond.position) {
            return;
        }
        let skipped = self.path.remove(self.index + 1);
        log::debug!("line of sight to {}, skipping {}", beyond.id, skipped.id);
        self.events.push(NavEvent::WaypointSkipped { waypoint: skipped.id });
    }

    fn advance(&mut self, dt: f32, mover: &mut dyn Movable) {
        let Some(target) = self.path.get(self.index) else {
            return;
        };
        let from = mover.position();
        let step = step_toward(from, target.position, self.config.speed, dt);
        mover.set_position(step.position);
        mover.set_velocity(step.velocity);
        if let Some(heading) = step.heading {
            self.heading = heading;
            mover.set_orientation(Quat::from_rotation_z(heading));
        }
        self.progress += from.distance(step.position);
    }

    // Past the last waypoint: loop, re-plan through the policy, or stop.
    fn resolve_arrival(&mut self, ctx: &NavContext<'_>, mover: &mut dyn Movable) -> Result<(), NavError> {
        if self.config.loop_path && !self.path.is_empty() {
            self.index = 0;
            self.progress = 0.0;
            self.state = FollowState::Following;
            self.events.push(NavEvent::Looped);
            return Ok(());
        }

        let Some(mut policy) = self.policy.take() else {
            self.stop(mover);
            return Ok(());
        };

        let mut result = Ok(());
        for _ in 0..self.config.max_replan_attempts.max(1) {
            let Some(goal) = policy.next_goal(ctx.store, self.current) else {
                break;
            };
            match self.plan(ctx, goal) {
                Ok(PlanOutcome::Planned { .. }) => break,
                Ok(PlanOutcome::Unreachable) => continue,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        self.policy = Some(policy);

        if self.state != FollowState::Following {
            // Nothing reachable this tick; hold position and retry next tick.
            match &result {
                Ok(()) => log::warn!("follower at {} found no reachable goal, retrying", self.current),
                Err(err) => log::warn!("follower at {} failed to re-plan: {err}", self.current),
            }
            self.state = FollowState::Arrived;
            self.path.clear();
            self.index = 0;
            mover.set_velocity(Vec3::ZERO);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use crate::api::traits::OpenSky;
    use crate::api::types::AgentId;
    use crate::components::body::Body;
    use crate::core::waypoint::WaypointMeta;
    use crate::systems::goals::PatrolGoals;

    /// A(0,0) - B(1,0) - C(2,0) in a line, plus an isolated D(0,5).
    fn line() -> WaypointStore {
        let mut store = WaypointStore::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 5.0, 0.0)] {
            store.add_waypoint(p, WaypointMeta::new()).unwrap();
        }
        store.connect(WaypointId(0), WaypointId(1), None).unwrap();
        store.connect(WaypointId(1), WaypointId(2), None).unwrap();
        store
    }

    fn no_pulling() -> FollowerConfig {
        FollowerConfig::default().with_string_pulling(false)
    }

    fn run(follower: &mut Follower, ctx: &NavContext<'_>, body: &mut Body, ticks: usize) {
        for _ in 0..ticks {
            follower.update(0.1, ctx, body).unwrap();
        }
    }

    #[test]
    fn arrival_advances_once_per_tick() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling());

        let outcome = follower.set_goal(&ctx, WaypointId(2)).unwrap();
        assert_eq!(outcome, PlanOutcome::Planned { waypoints: 3, cost: 2.0 });
        assert_eq!(follower.index(), 0);

        follower.update(0.01, &ctx, &mut body).unwrap();
        assert_eq!(follower.index(), 1);
        assert_eq!(follower.current(), WaypointId(0));
        assert!((body.position.x - 0.02).abs() < 1e-6);

        follower.update(0.01, &ctx, &mut body).unwrap();
        assert_eq!(follower.index(), 1);
    }

    #[test]
    fn walks_to_goal_then_idles() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling());
        follower.set_goal(&ctx, WaypointId(2)).unwrap();

        run(&mut follower, &ctx, &mut body, 30);

        assert_eq!(follower.state(), FollowState::Idle);
        assert_eq!(follower.current(), WaypointId(2));
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(body.position.distance(Vec3::new(2.0, 0.0, 0.0)) < 0.1);

        let events: Vec<_> = follower.drain_events().collect();
        assert!(events.contains(&NavEvent::GoalReached { goal: WaypointId(2) }));
        assert_eq!(events.last(), Some(&NavEvent::Stopped));
    }

    #[test]
    fn faces_direction_of_travel() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling());
        follower.set_goal(&ctx, WaypointId(2)).unwrap();

        run(&mut follower, &ctx, &mut body, 2);
        assert!((follower.heading() + FRAC_PI_2).abs() < 1e-5);
        assert!((body.orientation * Vec3::Y).distance(Vec3::X) < 1e-5);
        assert!(body.velocity.distance(Vec3::new(2.0, 0.0, 0.0)) < 1e-5);
    }

    #[test]
    fn string_pulling_skips_visible_waypoint() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner).with_occlusion(&OpenSky);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), FollowerConfig::default());
        follower.set_goal(&ctx, WaypointId(2)).unwrap();
        assert_eq!(follower.path().len(), 3);

        follower.update(0.01, &ctx, &mut body).unwrap();
        assert_eq!(follower.path().len(), 2);
        assert_eq!(follower.target().unwrap().id, WaypointId(2));
        let events: Vec<_> = follower.drain_events().collect();
        assert!(events.contains(&NavEvent::WaypointSkipped { waypoint: WaypointId(1) }));
    }

    #[test]
    fn blocked_line_of_sight_keeps_path() {
        let store = line();
        let planner = Planner::default();
        let wall = |_: Vec3, _: Vec3| true;
        let ctx = NavContext::new(&store, &planner).with_occlusion(&wall);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), FollowerConfig::default());
        follower.set_goal(&ctx, WaypointId(2)).unwrap();

        follower.update(0.01, &ctx, &mut body).unwrap();
        assert_eq!(follower.path().len(), 3);
        assert_eq!(follower.target().unwrap().id, WaypointId(1));
    }

    #[test]
    fn unreachable_goal_replans_through_policy() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling())
            .with_policy(PatrolGoals::new(vec![WaypointId(2)]));

        assert_eq!(follower.set_goal(&ctx, WaypointId(3)).unwrap(), PlanOutcome::Unreachable);
        assert_eq!(follower.state(), FollowState::Arrived);

        follower.update(0.1, &ctx, &mut body).unwrap();
        assert_eq!(follower.state(), FollowState::Following);
        assert_eq!(follower.goal(), Some(WaypointId(2)));

        let events: Vec<_> = follower.drain_events().collect();
        assert_eq!(events[0], NavEvent::Unreachable { goal: WaypointId(3) });
        assert!(matches!(events[1], NavEvent::PathPlanned { goal: WaypointId(2), .. }));
    }

    #[test]
    fn unreachable_without_policy_goes_idle() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut follower = Follower::new(WaypointId(0), no_pulling());

        assert_eq!(follower.set_goal(&ctx, WaypointId(3)).unwrap(), PlanOutcome::Unreachable);
        assert_eq!(follower.state(), FollowState::Idle);
        assert!(follower.path().is_empty());
    }

    #[test]
    fn exhausted_replans_wait_without_moving() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1)).with_position(Vec3::ONE);
        body.velocity = Vec3::X;
        let mut follower = Follower::new(WaypointId(0), no_pulling())
            .with_policy(PatrolGoals::new(vec![WaypointId(3)]));
        follower.set_goal(&ctx, WaypointId(3)).unwrap();

        run(&mut follower, &ctx, &mut body, 3);
        assert_eq!(follower.state(), FollowState::Arrived);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.position, Vec3::ONE);
    }

    #[test]
    fn failed_replan_holds_and_retries() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling())
            .with_policy(PatrolGoals::new(vec![WaypointId(99)]));
        follower.set_goal(&ctx, WaypointId(1)).unwrap();

        let mut failures = 0;
        for _ in 0..20 {
            if let Err(err) = follower.update(0.1, &ctx, &mut body) {
                assert_eq!(err, NavError::UnknownWaypoint(WaypointId(99)));
                failures += 1;
            }
        }

        assert!(failures > 1);
        assert_eq!(follower.state(), FollowState::Arrived);
        assert!(follower.path().is_empty());
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn looping_path_wraps_to_start() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling().looping());
        follower.set_goal(&ctx, WaypointId(2)).unwrap();

        run(&mut follower, &ctx, &mut body, 30);
        assert_eq!(follower.state(), FollowState::Following);
        let events: Vec<_> = follower.drain_events().collect();
        assert!(events.contains(&NavEvent::Looped));
    }

    #[test]
    fn unknown_goal_is_an_error() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut follower = Follower::new(WaypointId(0), no_pulling());
        assert_eq!(
            follower.set_goal(&ctx, WaypointId(42)).unwrap_err(),
            NavError::UnknownWaypoint(WaypointId(42))
        );
        assert_eq!(follower.state(), FollowState::Idle);
    }

    #[test]
    fn explicit_path_is_followed() {
        let store = line();
        let planner = Planner::default();
        let ctx = NavContext::new(&store, &planner);
        let mut body = Body::new(AgentId(1));
        let mut follower = Follower::new(WaypointId(0), no_pulling());
        let keys: Vec<Waypoint> = store.iter().take(2).copied().collect();

        follower.follow(keys).unwrap();
        run(&mut follower, &ctx, &mut body, 20);
        assert_eq!(follower.current(), WaypointId(1));
        assert_eq!(follower.state(), FollowState::Idle);
        assert_eq!(follower.follow(Vec::new()).unwrap_err(), NavError::EmptyPath);
    }
}
