use std::collections::{HashMap, HashSet, VecDeque};
use glam::Vec3;
use crate::api::error::NavError;
use crate::api::types::WaypointId;
use super::waypoint::{Waypoint, WaypointMeta};

/// Outgoing connection from one waypoint to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: WaypointId,
    /// Traversal cost. Defaults to Euclidean distance, which keeps the
    /// planner's straight-line heuristic admissible.
    pub cost: f32,
}

/// Waypoint storage using a flat Vec plus an id → slot map.
///
/// Adjacency lives in a parallel Vec, one edge list per waypoint. The store
/// has no internal locking: share it as `&WaypointStore` between any number of
/// followers and serialize mutation externally.
#[derive(Debug, Clone, Default)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
    edges: Vec<Vec<Edge>>,
    index: HashMap<WaypointId, usize>,
    next_id: u32,
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a specific waypoint capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            waypoints: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Add a waypoint at `position`. Uses `meta.id` when given, otherwise
    /// assigns the next free id.
    pub fn add_waypoint(&mut self, position: Vec3, meta: WaypointMeta) -> Result<WaypointId, NavError> {
        let id = match meta.id {
            Some(id) => id,
            None => self.allocate_id()?,
        };
        self.insert_waypoint(Waypoint {
            id,
            position,
            look_at: meta.look_at,
            up: meta.up,
            time_code: meta.time_code,
        })?;
        Ok(id)
    }

    /// Insert a fully built waypoint. Fails if its id is taken.
    pub fn insert_waypoint(&mut self, waypoint: Waypoint) -> Result<(), NavError> {
        if self.index.contains_key(&waypoint.id) {
            return Err(NavError::DuplicateId(waypoint.id));
        }
        self.index.insert(waypoint.id, self.waypoints.len());
        self.waypoints.push(waypoint);
        self.edges.push(Vec::new());
        if waypoint.id.0 >= self.next_id {
            self.next_id = waypoint.id.0.saturating_add(1);
        }
        Ok(())
    }

    // Next id above every id seen so far; once that runs past u32::MAX, the
    // lowest id not in use.
    fn allocate_id(&self) -> Result<WaypointId, NavError> {
        let mut candidate = self.next_id;
        while self.index.contains_key(&WaypointId(candidate)) {
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => return self.lowest_free_id(),
            }
        }
        Ok(WaypointId(candidate))
    }

    fn lowest_free_id(&self) -> Result<WaypointId, NavError> {
        (0..=u32::MAX)
            .map(WaypointId)
            .find(|id| !self.index.contains_key(id))
            .ok_or(NavError::IdsExhausted)
    }

    /// Connect two waypoints in both directions.
    /// `cost` defaults to the distance between them.
    pub fn connect(&mut self, a: WaypointId, b: WaypointId, cost: Option<f32>) -> Result<(), NavError> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        let cost = cost.unwrap_or_else(|| self.waypoints[ia].distance(&self.waypoints[ib]));
        self.link(ia, b, cost);
        self.link(ib, a, cost);
        Ok(())
    }

    /// Connect `from` to `to` only.
    pub fn connect_directed(&mut self, from: WaypointId, to: WaypointId, cost: Option<f32>) -> Result<(), NavError> {
        let (ifrom, ito) = (self.slot(from)?, self.slot(to)?);
        let cost = cost.unwrap_or_else(|| self.waypoints[ifrom].distance(&self.waypoints[ito]));
        self.link(ifrom, to, cost);
        Ok(())
    }

    // Re-connecting an existing pair updates the cost instead of adding a
    // second edge. Self-loops are dropped.
    fn link(&mut self, from: usize, to: WaypointId, cost: f32) {
        if self.waypoints[from].id == to {
            return;
        }
        let list = &mut self.edges[from];
        match list.iter_mut().find(|e| e.to == to) {
            Some(edge) => edge.cost = cost,
            None => list.push(Edge { to, cost }),
        }
    }

    /// Remove the connection between `a` and `b` in both directions.
    /// Returns whether any edge was removed.
    pub fn disconnect(&mut self, a: WaypointId, b: WaypointId) -> bool {
        let mut removed = false;
        if let Some(&ia) = self.index.get(&a) {
            let before = self.edges[ia].len();
            self.edges[ia].retain(|e| e.to != b);
            removed |= self.edges[ia].len() != before;
        }
        if let Some(&ib) = self.index.get(&b) {
            let before = self.edges[ib].len();
            self.edges[ib].retain(|e| e.to != a);
            removed |= self.edges[ib].len() != before;
        }
        removed
    }

    /// Remove every edge leaving or entering `id`. Returns how many were removed.
    pub fn remove_all_edges(&mut self, id: WaypointId) -> Result<usize, NavError> {
        let slot = self.slot(id)?;
        let mut removed = std::mem::take(&mut self.edges[slot]).len();
        for list in self.edges.iter_mut() {
            let before = list.len();
            list.retain(|e| e.to != id);
            removed += before - list.len();
        }
        Ok(removed)
    }

    /// Remove a waypoint and all of its edges. Returns the removed waypoint.
    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<Waypoint, NavError> {
        self.remove_all_edges(id)?;
        let slot = self.slot(id)?;
        self.index.remove(&id);
        let removed = self.waypoints.swap_remove(slot);
        self.edges.swap_remove(slot);
        // The former last element now lives in `slot`.
        if let Some(moved) = self.waypoints.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Ok(removed)
    }

    fn slot(&self, id: WaypointId) -> Result<usize, NavError> {
        self.index.get(&id).copied().ok_or(NavError::UnknownWaypoint(id))
    }

    /// Get a waypoint by id.
    pub fn get(&self, id: WaypointId) -> Result<&Waypoint, NavError> {
        Ok(&self.waypoints[self.slot(id)?])
    }

    /// Get a waypoint by id, or `None` if absent.
    pub fn find(&self, id: WaypointId) -> Option<&Waypoint> {
        self.index.get(&id).map(|&slot| &self.waypoints[slot])
    }

    pub fn contains(&self, id: WaypointId) -> bool {
        self.index.contains_key(&id)
    }

    /// Outgoing edges of a waypoint.
    pub fn neighbors(&self, id: WaypointId) -> Result<&[Edge], NavError> {
        Ok(&self.edges[self.slot(id)?])
    }

    /// Iterate over all waypoints in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    /// Iterate over all waypoint ids in storage order.
    pub fn ids(&self) -> impl Iterator<Item = WaypointId> + '_ {
        self.waypoints.iter().map(|w| w.id)
    }

    /// Iterate over every directed edge as `(from, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (WaypointId, &Edge)> {
        self.waypoints
            .iter()
            .zip(self.edges.iter())
            .flat_map(|(w, list)| list.iter().map(move |e| (w.id, e)))
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// The waypoint nearest to `position`, if the store is not empty.
    pub fn closest_waypoint(&self, position: Vec3) -> Option<WaypointId> {
        self.waypoints
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance_squared(position)
                    .total_cmp(&b.position.distance_squared(position))
            })
            .map(|w| w.id)
    }

    /// Whether `to` can be reached from `from` by following edges.
    pub fn has_path(&self, from: WaypointId, to: WaypointId) -> Result<bool, NavError> {
        self.slot(from)?;
        self.slot(to)?;
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(id) = queue.pop_front() {
            if id == to {
                return Ok(true);
            }
            for edge in self.neighbors(id)? {
                if seen.insert(edge.to) {
                    queue.push_back(edge.to);
                }
            }
        }
        Ok(false)
    }

    /// Number of waypoints in the store.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Remove every waypoint and edge. Id allocation restarts at zero.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.edges.clear();
        self.index.clear();
        self.next_id = 0;
    }
}
