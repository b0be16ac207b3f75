// systems/planner.rs
//
// A* search over a WaypointStore.
//
// Usage:
//   let planner = Planner::new(config.planner);
//   let path = planner.find_path(&store, start, goal)?;
//   if path.is_empty() { /* unreachable: pick another goal */ }

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use crate::api::config::PlannerConfig;
use crate::api::error::NavError;
use crate::api::types::WaypointId;
use crate::core::store::WaypointStore;
use crate::core::waypoint::Waypoint;

/// Ordered waypoints from start to goal. Empty means no route was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    waypoints: Vec<Waypoint>,
    cost: f32,
}

impl Path {
    pub fn new(waypoints: Vec<Waypoint>, cost: f32) -> Self {
        Self { waypoints, cost }
    }

    /// The "unreachable" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Total edge cost from start to goal.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn ids(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.waypoints.iter().map(|w| w.id)
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }
}

/// Entry in the open set.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    id: WaypointId,
    g: f32,
    h: f32,
    /// Insertion counter, last tie-break.
    seq: u64,
}

impl OpenNode {
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

// BinaryHeap is a max-heap, so "greater" means "pop first":
// lower f, then lower h, then earlier insertion.
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f()
            .total_cmp(&self.f())
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// A* path planner with a straight-line heuristic.
///
/// Holds no per-search state, so one planner can serve every follower.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Lowest-cost route from `start` to `goal`.
    ///
    /// Returns an empty path when the goal is unreachable or a search limit
    /// is hit. Fails only when either id is not in the store.
    pub fn find_path(&self, store: &WaypointStore, start: WaypointId, goal: WaypointId) -> Result<Path, NavError> {
        let start_wp = *store.get(start)?;
        let goal_wp = *store.get(goal)?;
        if start == goal {
            return Ok(Path::new(vec![start_wp], 0.0));
        }

        let heuristic = |id: WaypointId| -> Result<f32, NavError> {
            Ok(store.get(id)?.position.distance(goal_wp.position))
        };

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<WaypointId, f32> = HashMap::from([(start, 0.0)]);
        let mut came_from: HashMap<WaypointId, WaypointId> = HashMap::new();
        let mut closed: HashSet<WaypointId> = HashSet::new();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        open.push(OpenNode { id: start, g: 0.0, h: start_wp.distance(&goal_wp), seq });

        while let Some(node) = open.pop() {
            if node.id == goal {
                let path = Self::reconstruct(store, &came_from, goal, node.g)?;
                log::debug!(
                    "path {start} -> {goal}: {} waypoints, cost {:.2}, {expansions} expansions",
                    path.len(),
                    path.cost()
                );
                return Ok(path);
            }
            // Stale heap entry: a cheaper copy was already expanded.
            if !closed.insert(node.id) {
                continue;
            }
            if let Some(limit) = self.config.max_expansions {
                if expansions >= limit {
                    log::debug!("path {start} -> {goal}: gave up after {expansions} expansions");
                    return Ok(Path::empty());
                }
            }
            expansions += 1;

            for edge in store.neighbors(node.id)? {
                if closed.contains(&edge.to) {
                    continue;
                }
                let g = node.g + edge.cost;
                if let Some(max_cost) = self.config.max_cost {
                    if g > max_cost {
                        continue;
                    }
                }
                let better = g_score.get(&edge.to).map_or(true, |&known| g < known);
                if better {
                    g_score.insert(edge.to, g);
                    came_from.insert(edge.to, node.id);
                    seq += 1;
                    open.push(OpenNode { id: edge.to, g, h: heuristic(edge.to)?, seq });
                }
            }
        }

        log::debug!("path {start} -> {goal}: unreachable after {expansions} expansions");
        Ok(Path::empty())
    }

    fn reconstruct(
        store: &WaypointStore,
        came_from: &HashMap<WaypointId, WaypointId>,
        goal: WaypointId,
        cost: f32,
    ) -> Result<Path, NavError> {
        let mut waypoints = vec![*store.get(goal)?];
        let mut current = goal;
        while let Some(&prev) = came_from.get(&current) {
            waypoints.push(*store.get(prev)?);
            current = prev;
        }
        waypoints.reverse();
        Ok(Path::new(waypoints, cost))
    }
}
