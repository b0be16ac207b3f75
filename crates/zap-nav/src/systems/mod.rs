pub mod follower;
pub mod goals;
pub mod linear_path;
pub mod navigator;
pub mod planner;
pub mod rng;
pub mod spline_path;
