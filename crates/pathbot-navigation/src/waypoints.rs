//! Queue of waypoints consumed front-to-back by the control loop.

use std::collections::VecDeque;

use crate::map::WorldPoint;

/// Sparse waypoints still to be visited, head first.
///
/// A new route replaces the old one wholesale; there is no merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointQueue {
    points: VecDeque<WorldPoint>,
}

impl WaypointQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current route and adopts `path`.
    pub fn replace(&mut self, path: impl IntoIterator<Item = WorldPoint>) {
        self.points = path.into_iter().collect();
    }

    /// The waypoint currently being steered toward.
    pub fn head(&self) -> Option<WorldPoint> {
        self.points.front().copied()
    }

    /// The last waypoint of the route.
    pub fn goal(&self) -> Option<WorldPoint> {
        self.points.back().copied()
    }

    /// Pops the head if `position` is strictly within `tolerance` of it,
    /// returning the reached waypoint.
    pub fn advance_if_reached(&mut self, position: WorldPoint, tolerance: f64) -> Option<WorldPoint> {
        let head = self.head()?;
        if position.distance(&head) < tolerance {
            self.points.pop_front()
        } else {
            None
        }
    }

    /// Number of waypoints left.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True once every waypoint has been reached.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Drops every remaining waypoint.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Iterates over the remaining waypoints, head first.
    pub fn iter(&self) -> impl Iterator<Item = &WorldPoint> {
        self.points.iter()
    }
}
