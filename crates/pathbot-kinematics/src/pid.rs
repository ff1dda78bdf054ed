//! Proportional-integral-derivative regulator over a scalar error signal.

use crate::KinematicsError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The three gains of a [`Pid`] controller.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
}

impl PidGains {
    /// Construct a gain set.
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        PidGains { kp, ki, kd }
    }
}

/// A PID controller whose integral and derivative memory persists between
/// calls to [`Pid::compute`] until [`Pid::reset`] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct Pid {
    gains: PidGains,
    /// Running sum of `error * dt`.
    integral: f64,
    prev_error: f64,
}

impl Pid {
    /// Create a controller with zeroed state.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeGain)` if any gain is negative or NaN.
    pub fn new(gains: PidGains) -> Result<Self, KinematicsError> {
        for gain in [gains.kp, gains.ki, gains.kd] {
            if !(gain >= 0.0) {
                return Err(KinematicsError::NegativeGain("gains must be non-negative"));
            }
        }
        Ok(Pid {
            gains,
            integral: 0.0,
            prev_error: 0.0,
        })
    }

    /// Returns the controller gains.
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Returns the accumulated integral term (before scaling by `ki`).
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Returns the error passed to the most recent `compute` call.
    pub fn previous_error(&self) -> f64 {
        self.prev_error
    }

    /// Computes the controller output for `error` over a step of `dt` seconds.
    ///
    /// The integral is accumulated before the output is formed. A `dt` that is
    /// not strictly positive contributes a zero derivative term.
    pub fn compute(&mut self, error: f64, dt: f64) -> f64 {
        self.integral += error * dt;

        let derivative = if dt > 0.0 {
            (error - self.prev_error) / dt
        } else {
            0.0
        };

        let output =
            self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative;
        self.prev_error = error;
        output
    }

    /// Clears the integral and derivative memory.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }
}
