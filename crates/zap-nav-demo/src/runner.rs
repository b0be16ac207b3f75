use glam::Vec3;
use zap_nav::{
    AgentId, Body, FixedTimestep, Follower, NavConfig, NavError, NavEvent, Navigator, OcclusionQuery,
    RandomGoal, Scene, SplinePathController, TimedSpline, Waypoint, WaypointId, WaypointStore,
};

/// Tag given to the body driven by the camera spline.
pub const CAMERA_TAG: &str = "camera";

/// Height the camera flies above the waypoint graph.
const CAMERA_HEIGHT: f32 = 6.0;

/// Seconds the camera spends between consecutive keys.
const CAMERA_KEY_SPACING: f32 = 2.0;

/// Per-run tallies reported at exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub ticks: u64,
    pub waypoints_reached: u64,
    pub goals_reached: u64,
    pub paths_planned: u64,
    pub unreachable: u64,
    pub skipped: u64,
    /// Agent updates that failed; the agent holds and retries.
    pub errors: u64,
}

/// Headless loop that wires the store, agents and camera to a fixed timestep.
pub struct NavRunner {
    store: WaypointStore,
    scene: Scene,
    navigator: Navigator,
    camera: Option<SplinePathController>,
    occlusion: Box<dyn OcclusionQuery>,
    timestep: FixedTimestep,
    config: NavConfig,
    stats: RunStats,
}

impl NavRunner {
    pub fn new(store: WaypointStore, config: NavConfig, occlusion: Box<dyn OcclusionQuery>) -> Self {
        Self {
            navigator: Navigator::new(config.planner),
            timestep: FixedTimestep::from_config(&config),
            scene: Scene::new(),
            camera: None,
            store,
            occlusion,
            config,
            stats: RunStats::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Spawn `count` agents on evenly spread waypoints, each wandering with
    /// its own seeded goal policy.
    pub fn spawn_agents(&mut self, count: u32, seed: u64) -> Result<(), NavError> {
        let ids: Vec<WaypointId> = self.store.ids().collect();
        if ids.is_empty() {
            return Err(NavError::EmptyPath);
        }

        for n in 0..count {
            let agent = AgentId(n + 1);
            let slot = (n as usize * ids.len() / count as usize) % ids.len();
            let (start, goal) = (ids[slot], ids[(slot + ids.len() / 2) % ids.len()]);
            let position = self.store.get(start)?.position;

            self.scene.spawn(Body::new(agent).with_tag(format!("agent-{}", agent.0)).with_position(position));
            let policy = RandomGoal::new(seed.wrapping_add(u64::from(n)));
            self.navigator.add(agent, Follower::new(start, self.config.follower).with_policy(policy));

            self.navigator.set_goal(agent, &self.store, goal)?;
            log::info!("agent {} spawned at {start}, heading for {goal}", agent.0);
        }
        Ok(())
    }

    /// Fly a looping camera over every waypoint, looking at the graph's center.
    pub fn attach_camera(&mut self) -> Result<(), NavError> {
        let count = self.store.len();
        if count == 0 {
            return Err(NavError::EmptyPath);
        }
        let center = self.store.iter().map(|w| w.position).sum::<Vec3>() / count as f32;
        let lift = Vec3::new(0.0, 0.0, CAMERA_HEIGHT);

        let keys: Vec<Waypoint> = self
            .store
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let position = w.position + lift;
                Waypoint::timed(w.id, position, i as f32 * CAMERA_KEY_SPACING).with_look_at(center - position)
            })
            .collect();
        let period = count as f32 * CAMERA_KEY_SPACING;
        let spline = TimedSpline::looping(keys, period)?;

        let id = AgentId(0);
        self.scene.spawn(Body::new(id).with_tag(CAMERA_TAG));
        self.camera = Some(SplinePathController::new(spline));
        log::info!("camera spline over {count} keys, period {period:.1}s");
        Ok(())
    }

    /// Run one frame: as many fixed navigation ticks as the frame delta allows.
    pub fn tick(&mut self, frame_dt: f32) {
        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();

        for _ in 0..steps {
            let errors = self.navigator.tick(dt, &self.store, &mut self.scene, Some(self.occlusion.as_ref()));
            self.stats.errors += errors.len() as u64;

            if let Some(camera) = self.camera.as_mut() {
                if let Some(body) = self.scene.get_mut(AgentId(0)) {
                    camera.update(dt, body);
                }
            }
            self.stats.ticks += 1;
        }

        for (agent, event) in self.navigator.drain_events() {
            log::debug!("agent {}: {event:?}", agent.0);
            match event {
                NavEvent::WaypointReached { .. } => self.stats.waypoints_reached += 1,
                NavEvent::GoalReached { .. } => self.stats.goals_reached += 1,
                NavEvent::PathPlanned { .. } => self.stats.paths_planned += 1,
                NavEvent::Unreachable { .. } => self.stats.unreachable += 1,
                NavEvent::WaypointSkipped { .. } => self.stats.skipped += 1,
                NavEvent::Looped | NavEvent::Stopped => {}
            }
        }
    }
}
