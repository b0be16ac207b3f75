#[cfg(feature = "persistence")]
pub mod persistence;
pub mod scene;
pub mod store;
pub mod time;
pub mod waypoint;
