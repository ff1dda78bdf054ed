#![warn(missing_docs)]
//! Grid-based path planning for a point robot among rectangular obstacles.
//!
//! The pipeline is [`plan_path`] (A* over an implicit grid, returning cell
//! centres) followed by [`simplify`] (minimum-spacing thinning), whose output
//! is loaded into a [`WaypointQueue`] for the control loop to consume.

pub mod astar;
pub mod error;
pub mod map;
pub mod simplify;
pub mod waypoints;

pub use astar::{PathResult, astar_search, astar_search_detailed, plan_path, plan_path_detailed};
pub use error::NavigationError;
pub use map::{Grid, GridPoint, Obstacle, WorldPoint};
pub use simplify::simplify;
pub use waypoints::WaypointQueue;
