//! Per-tick motion model for a circular differential-drive robot.
//!
//! Each call to [`Robot::advance`] turns the active waypoint into a heading
//! error, regulates it with the robot's persistent angular PID controller,
//! commands a linear speed proportional to the remaining distance (capped at
//! `max_speed`), splits the command into wheel speeds, integrates the pose and
//! finally pins the body inside the workspace.

use libm::{atan2, fabs};

use crate::{
    ChassisSpeeds, DifferentialDrive, KinematicsError, Pid, PidGains, Pose, WheelSpeeds,
    WorldPoint, normalize_angle,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical and control parameters of a [`Robot`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotParams {
    /// Body radius; the centre is kept at least this far from every wall.
    pub radius: f64,
    /// Distance between the two drive wheels.
    pub wheelbase: f64,
    /// Upper bound on the commanded linear speed (units/s).
    pub max_speed: f64,
    /// Heading errors with magnitude at or below this value (rad) produce no
    /// turn command. `0.0` disables the band and corrects continuously.
    pub heading_deadband: f64,
    /// Gains of the angular controller.
    pub pid: PidGains,
}

impl Default for RobotParams {
    fn default() -> Self {
        RobotParams {
            radius: 20.0,
            wheelbase: 60.0,
            max_speed: 200.0,
            heading_deadband: 0.0,
            pid: PidGains::new(1.0, 0.0, 0.05),
        }
    }
}

/// A simulated robot: pose, wheel speeds, the active waypoint and the angular
/// controller that persists across ticks.
#[derive(Debug, Clone)]
pub struct Robot {
    pose: Pose,
    radius: f64,
    max_speed: f64,
    heading_deadband: f64,
    drive: DifferentialDrive,
    wheel_speeds: WheelSpeeds,
    target: Option<WorldPoint>,
    angular_pid: Pid,
}

impl Robot {
    /// Creates a robot at `pose` with no active target and stationary wheels.
    ///
    /// # Errors
    ///
    /// * `KinematicsError::InvalidRadius` if the radius is not positive.
    /// * `KinematicsError::InvalidWheelbase` if the wheelbase is not positive.
    /// * `KinematicsError::InvalidMaxSpeed` if `max_speed` is negative.
    /// * `KinematicsError::NegativeGain` if a PID gain is negative.
    pub fn new(pose: Pose, params: RobotParams) -> Result<Self, KinematicsError> {
        if !(params.radius > 0.0) {
            return Err(KinematicsError::InvalidRadius("must be positive"));
        }
        if !(params.max_speed >= 0.0) {
            return Err(KinematicsError::InvalidMaxSpeed("must be non-negative"));
        }
        let drive = DifferentialDrive::new(params.wheelbase)?;
        let angular_pid = Pid::new(params.pid)?;

        Ok(Robot {
            pose,
            radius: params.radius,
            max_speed: params.max_speed,
            heading_deadband: params.heading_deadband,
            drive,
            wheel_speeds: WheelSpeeds::default(),
            target: None,
            angular_pid,
        })
    }

    /// Current pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current position as a point.
    pub fn position(&self) -> WorldPoint {
        WorldPoint::from(self.pose)
    }

    /// `(radius, wheelbase)`, for drawing.
    pub fn wheel_geometry(&self) -> (f64, f64) {
        (self.radius, self.drive.wheelbase())
    }

    /// Wheel speeds commanded on the most recent tick.
    pub fn wheel_speeds(&self) -> WheelSpeeds {
        self.wheel_speeds
    }

    /// The waypoint the robot is currently steering toward.
    pub fn target(&self) -> Option<WorldPoint> {
        self.target
    }

    /// Sets the active waypoint. The angular controller keeps its state.
    pub fn set_target(&mut self, target: WorldPoint) {
        self.target = Some(target);
    }

    /// Clears the active waypoint; subsequent ticks leave the robot untouched.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Clears the angular controller's integral and derivative memory.
    pub fn reset_controller(&mut self) {
        self.angular_pid.reset();
    }

    /// Advances the simulation by `dt` seconds inside a `bounds_width` by
    /// `bounds_height` workspace.
    ///
    /// Does nothing when no target is set.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn advance(
        &mut self,
        dt: f64,
        bounds_width: f64,
        bounds_height: f64,
    ) -> Result<(), KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }
        let Some(target) = self.target else {
            return Ok(());
        };

        let dx = target.x - self.pose.x;
        let dy = target.y - self.pose.y;
        let distance = self.pose.distance_to(target.x, target.y);
        let angle_error = normalize_angle(atan2(dy, dx) - self.pose.theta);

        let omega = if self.heading_deadband > 0.0 && fabs(angle_error) <= self.heading_deadband {
            0.0
        } else {
            self.angular_pid.compute(angle_error, dt)
        };
        let linear_speed = distance.min(self.max_speed);

        self.wheel_speeds = self
            .drive
            .inverse_kinematics(ChassisSpeeds::new(linear_speed, omega));
        let pose = self
            .drive
            .update_pose_from_wheel_speeds(self.pose, self.wheel_speeds, dt)?;

        // Pinned, not reflected: velocity into a wall is kept.
        self.pose = Pose {
            x: pose.x.min(bounds_width - self.radius).max(self.radius),
            y: pose.y.min(bounds_height - self.radius).max(self.radius),
            theta: pose.theta,
        };
        Ok(())
    }
}
