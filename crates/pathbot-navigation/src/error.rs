//! This module defines the error types used by the `pathbot-navigation` crate.

#![warn(missing_docs)]

/// Error type for navigation operations.
///
/// None of these are fatal: the planner reports them alongside an empty path
/// and the caller decides whether to keep its previous route or re-prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Error for invalid grid cell size.
    /// This variant is returned when a cell size is provided that is not positive.
    InvalidCellSize(&'static str),
    /// Error for invalid workspace dimensions.
    /// This variant is returned when the workspace is smaller than one cell.
    InvalidDimensions(&'static str),
    /// Error for start or goal coordinates that are not finite.
    InvalidCoordinates(&'static str),
    /// The search ran out of cells without reaching the goal, or the goal
    /// lies outside the grid.
    NoPathFound(&'static str),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
            NavigationError::InvalidDimensions(msg) => {
                write!(f, "Invalid workspace dimensions: {}", msg)
            }
            NavigationError::InvalidCoordinates(msg) => write!(f, "Invalid coordinates: {}", msg),
            NavigationError::NoPathFound(msg) => write!(f, "No path found: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}
