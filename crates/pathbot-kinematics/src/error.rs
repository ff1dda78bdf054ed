#![warn(missing_docs)]

//! Error types for the kinematics library.
//!
//! This module defines error types that can occur while constructing the
//! drive model, the heading controller, or while advancing the robot.

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Error for invalid wheelbase.
    /// This variant is returned when a wheelbase is provided that is not positive.
    InvalidWheelbase(&'static str),
    /// Error for invalid body radius.
    /// This variant is returned when a robot radius is provided that is not positive.
    InvalidRadius(&'static str),
    /// Error for an invalid speed limit.
    /// This variant is returned when the maximum linear speed is negative.
    InvalidMaxSpeed(&'static str),
    /// Error for a negative controller gain.
    NegativeGain(&'static str),
    /// Error for negative time delta.
    /// This variant is returned when a negative time delta is used for pose updates.
    NegativeTimeDelta(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidWheelbase(msg) => write!(f, "Invalid wheelbase: {}", msg),
            KinematicsError::InvalidRadius(msg) => write!(f, "Invalid robot radius: {}", msg),
            KinematicsError::InvalidMaxSpeed(msg) => write!(f, "Invalid maximum speed: {}", msg),
            KinematicsError::NegativeGain(msg) => write!(f, "Negative controller gain: {}", msg),
            KinematicsError::NegativeTimeDelta(msg) => write!(f, "Negative time delta: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
