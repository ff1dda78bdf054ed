//! Map-related functionality for navigation.
//!
//! This module provides the point and obstacle types and the implicit
//! occupancy grid the planner searches.

pub mod grid;
pub mod point_types;

pub use grid::Grid;
pub use point_types::{GridPoint, Obstacle, WorldPoint};
