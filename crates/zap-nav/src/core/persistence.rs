//! JSON waypoint file: every waypoint plus every directed edge.

use serde::{Deserialize, Serialize};
use crate::api::error::NavError;
use crate::api::types::WaypointId;
use super::store::WaypointStore;
use super::waypoint::Waypoint;

/// On-disk shape of a waypoint store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointFile {
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// One directed edge. Undirected links appear twice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: WaypointId,
    pub to: WaypointId,
    /// Missing costs are recomputed from positions on load.
    #[serde(default)]
    pub cost: Option<f32>,
}

impl WaypointFile {
    /// Snapshot a store.
    pub fn from_store(store: &WaypointStore) -> Self {
        Self {
            waypoints: store.iter().copied().collect(),
            edges: store
                .edges()
                .map(|(from, e)| EdgeRecord { from, to: e.to, cost: Some(e.cost) })
                .collect(),
        }
    }

    /// Rebuild a store. Duplicate ids and dangling edges are errors.
    pub fn into_store(self) -> Result<WaypointStore, NavError> {
        let mut store = WaypointStore::with_capacity(self.waypoints.len());
        for waypoint in self.waypoints {
            store.insert_waypoint(waypoint)?;
        }
        for edge in self.edges {
            store.connect_directed(edge.from, edge.to, edge.cost)?;
        }
        Ok(store)
    }
}

impl WaypointStore {
    /// Parse a store from a JSON waypoint file.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        let file: WaypointFile = serde_json::from_str(json)?;
        let store = file.into_store()?;
        log::debug!("loaded {} waypoints, {} edges", store.len(), store.edge_count());
        Ok(store)
    }

    /// Serialize the store as a pretty-printed JSON waypoint file.
    pub fn to_json(&self) -> Result<String, NavError> {
        Ok(serde_json::to_string_pretty(&WaypointFile::from_store(self))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use crate::core::waypoint::WaypointMeta;

    #[test]
    fn save_then_load_keeps_graph() {
        let mut store = WaypointStore::new();
        let a = store.add_waypoint(Vec3::ZERO, WaypointMeta::new()).unwrap();
        let b = store
            .add_waypoint(Vec3::new(1.0, 2.0, 0.0), WaypointMeta::new().with_time(1.5))
            .unwrap();
        store.connect(a, b, Some(4.0)).unwrap();

        let json = store.to_json().unwrap();
        let loaded = WaypointStore::from_json(&json).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.edge_count(), 2);
        assert_eq!(loaded.get(b).unwrap().time_code, Some(1.5));
        assert_eq!(loaded.neighbors(a).unwrap()[0].cost, 4.0);
    }

    #[test]
    fn missing_cost_uses_distance() {
        let json = r#"{
            "waypoints": [
                { "id": 1, "position": [0.0, 0.0, 0.0] },
                { "id": 2, "position": [0.0, 3.0, 4.0] }
            ],
            "edges": [ { "from": 1, "to": 2 } ]
        }"#;
        let store = WaypointStore::from_json(json).unwrap();
        assert_eq!(store.neighbors(WaypointId(1)).unwrap()[0].cost, 5.0);
        assert!(store.neighbors(WaypointId(2)).unwrap().is_empty());
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let json = r#"{
            "waypoints": [ { "id": 1, "position": [0.0, 0.0, 0.0] } ],
            "edges": [ { "from": 1, "to": 7 } ]
        }"#;
        let err = WaypointStore::from_json(json).unwrap_err();
        assert_eq!(err, NavError::UnknownWaypoint(WaypointId(7)));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{
            "waypoints": [
                { "id": 3, "position": [0.0, 0.0, 0.0] },
                { "id": 3, "position": [1.0, 0.0, 0.0] }
            ]
        }"#;
        let err = WaypointStore::from_json(json).unwrap_err();
        assert_eq!(err, NavError::DuplicateId(WaypointId(3)));
    }
}
