// systems/navigator.rs
//
// Navigator: owns the followers of every agent and ticks them together
// against one shared waypoint store.
//
// Usage:
//   let mut nav = Navigator::new(config.planner);
//   nav.add(agent_id, Follower::new(start, config.follower));
//   nav.set_goal(agent_id, &store, goal)?;
//   for (agent, err) in nav.tick(dt, &store, &mut scene, Some(&world)) { ... }
//   for (agent, event) in nav.drain_events() { ... }

use std::collections::HashMap;
use crate::api::config::PlannerConfig;
use crate::api::error::NavError;
use crate::api::traits::OcclusionQuery;
use crate::api::types::{AgentId, NavEvent, WaypointId};
use crate::core::scene::Scene;
use crate::core::store::WaypointStore;
use super::follower::{Follower, NavContext, PlanOutcome};
use super::planner::Planner;

#[derive(Default)]
pub struct Navigator {
    planner: Planner,
    followers: HashMap<AgentId, Follower>,
    events: Vec<(AgentId, NavEvent)>,
}

impl Navigator {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            planner: Planner::new(config),
            followers: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Attach a follower to an agent, replacing any previous one.
    pub fn add(&mut self, agent: AgentId, follower: Follower) -> Option<Follower> {
        self.followers.insert(agent, follower)
    }

    pub fn remove(&mut self, agent: AgentId) -> Option<Follower> {
        self.followers.remove(&agent)
    }

    pub fn get(&self, agent: AgentId) -> Option<&Follower> {
        self.followers.get(&agent)
    }

    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut Follower> {
        self.followers.get_mut(&agent)
    }

    /// Plan a route for one agent. `None` when the agent has no follower.
    pub fn set_goal(
        &mut self,
        agent: AgentId,
        store: &WaypointStore,
        goal: WaypointId,
    ) -> Result<Option<PlanOutcome>, NavError> {
        let ctx = NavContext::new(store, &self.planner);
        let Some(follower) = self.followers.get_mut(&agent) else {
            return Ok(None);
        };
        let outcome = follower.set_goal(&ctx, goal)?;
        self.events.extend(follower.drain_events().map(|e| (agent, e)));
        Ok(Some(outcome))
    }

    /// Advance every follower by `dt`. Agents whose body left the scene are skipped.
    ///
    /// A failing follower does not stop the others; its error is returned
    /// tagged with its agent, and it retries on the next tick.
    pub fn tick(
        &mut self,
        dt: f32,
        store: &WaypointStore,
        scene: &mut Scene,
        occlusion: Option<&dyn OcclusionQuery>,
    ) -> Vec<(AgentId, NavError)> {
        let ctx = NavContext {
            store,
            planner: &self.planner,
            occlusion,
        };

        let mut agents: Vec<AgentId> = self.followers.keys().copied().collect();
        agents.sort_by_key(|a| a.0);

        let mut errors = Vec::new();
        for agent in agents {
            let (Some(follower), Some(body)) = (self.followers.get_mut(&agent), scene.get_mut(agent)) else {
                continue;
            };
            if let Err(err) = follower.update(dt, &ctx, body) {
                log::warn!("agent {} failed to update: {err}", agent.0);
                errors.push((agent, err));
            }
            self.events.extend(follower.drain_events().map(|e| (agent, e)));
        }
        errors
    }

    /// Drain events from every follower, tagged with their agent.
    pub fn drain_events(&mut self) -> impl Iterator<Item = (AgentId, NavEvent)> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }

    pub fn clear(&mut self) {
        self.followers.clear();
        self.events.clear();
    }
}
