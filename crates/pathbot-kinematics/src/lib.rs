#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 2D differential-drive robot kinematics."]
#![doc = ""]
#![doc = "This crate provides the robot pose, forward and inverse kinematics for a"]
#![doc = "two-wheeled chassis, a PID regulator, and the per-tick motion model that"]
#![doc = "steers a robot toward its active waypoint inside a bounded workspace."]

use core::f64::consts::{PI, TAU};
use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub mod pid;
pub mod robot;

pub use error::KinematicsError;
pub use pid::{Pid, PidGains};
pub use robot::{Robot, RobotParams};

/// A 2‑D pose `(x, y, θ)` in workspace units and radians (θ measured from the
/// x‑axis of the workspace frame).
///
/// The heading is not wrapped; it accumulates freely and consumers normalize
/// angle differences with [`normalize_angle`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Workspace x position.
    pub x: f64,
    /// Workspace y position.
    pub y: f64,
    /// Heading (rad), any range.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: Workspace x position.
    /// * `y`: Workspace y position.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// Euclidean distance from this pose's position to `(x, y)`.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        libm::hypot(x - self.x, y - self.y)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// A point in continuous workspace coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct WorldPoint {
    /// The x-coordinate.
    pub x: f64,
    /// The y-coordinate.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &WorldPoint) -> f64 {
        libm::hypot(other.x - self.x, other.y - self.y)
    }
}

impl From<Pose> for WorldPoint {
    fn from(pose: Pose) -> Self {
        WorldPoint::new(pose.x, pose.y)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Normalize an angle to be within `[-PI, PI)`.
///
/// Computed as `((angle + PI) mod 2PI) - PI` with a floored modulo, so an
/// angle of exactly `PI` maps to `-PI`.
///
/// # Arguments
///
/// * `angle`: The angle in radians to normalize.
///
/// # Returns
///
/// The normalized angle in radians.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut wrapped = (angle + PI) % TAU;
    if wrapped < 0.0 {
        wrapped += TAU;
    }
    wrapped - PI
}

/// Left and right wheel ground speeds, in workspace units per second.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel speed.
    pub left: f64,
    /// Right wheel speed.
    pub right: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `left`: Left wheel speed.
    /// * `right`: Right wheel speed.
    pub const fn new(left: f64, right: f64) -> Self {
        WheelSpeeds { left, right }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vL: {:.2}, vR: {:.2})", self.left, self.right)
    }
}

/// Linear and angular chassis velocities.
/// These represent the overall motion of the robot's chassis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (units/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center.
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2}, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

/// Differential‑drive kinematics helper.
///
/// Wheel speeds are ground speeds, so the only physical parameter is the
/// wheelbase (distance between the two drive wheels).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    wheelbase: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `wheelbase`: The distance between the two drive wheels.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidWheelbase)` if `wheelbase` is not positive.
    pub const fn new(wheelbase: f64) -> Result<Self, KinematicsError> {
        // Also rejects NaN.
        if !(wheelbase > 0.0) {
            return Err(KinematicsError::InvalidWheelbase("must be positive"));
        }
        Ok(DifferentialDrive { wheelbase })
    }

    /// Returns the wheelbase.
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    /// Calculates the chassis speeds from the wheel speeds (forward kinematics).
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v = (wheel_speeds.right + wheel_speeds.left) / 2.0;
        let omega = (wheel_speeds.right - wheel_speeds.left) / self.wheelbase;

        ChassisSpeeds::new(v, omega)
    }

    /// Calculates the wheel speeds that realise the given chassis speeds
    /// (inverse kinematics).
    pub fn inverse_kinematics(&self, chassis_speeds: ChassisSpeeds) -> WheelSpeeds {
        let half_track = chassis_speeds.omega * self.wheelbase / 2.0;

        WheelSpeeds::new(chassis_speeds.v - half_track, chassis_speeds.v + half_track)
    }

    /// Integrates the chassis speeds over `dt`.
    ///
    /// The heading is advanced first and the translation then follows the
    /// updated heading. The heading is left unwrapped.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let theta = current_pose.theta + chassis_speeds.omega * dt;

        Ok(Pose {
            x: current_pose.x + chassis_speeds.v * cos(theta) * dt,
            y: current_pose.y + chassis_speeds.v * sin(theta) * dt,
            theta,
        })
    }

    /// Convenience function to update pose directly from wheel speeds and dt.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose_from_wheel_speeds(
        &self,
        current_pose: Pose,
        wheel_speeds: WheelSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        let chassis_speeds = self.forward_kinematics(wheel_speeds);
        self.update_pose(current_pose, chassis_speeds, dt)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DifferentialDrive (L: {:.2})", self.wheelbase)
    }
}
