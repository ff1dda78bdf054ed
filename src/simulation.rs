use pathbot_kinematics::{KinematicsError, Robot};
use pathbot_navigation::{Obstacle, PathResult, WaypointQueue, WorldPoint, plan_path_detailed, simplify};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::trace::TrackingTrace;

/// One robot driving through an editable obstacle field.
///
/// Every call to [`Simulation::set_target`] plans against the obstacles as
/// they are at that moment. Editing obstacles afterwards does not re-plan.
pub struct Simulation {
    robot: Robot,
    obstacles: Vec<Obstacle>,
    waypoints: WaypointQueue,
    goal: Option<WorldPoint>,
    width: f64,
    height: f64,
    cell_size: f64,
    min_spacing: f64,
    waypoint_tolerance: f64,
    time: f64,
    trace: TrackingTrace,
}

impl Simulation {
    pub fn new(settings: &Settings) -> Result<Self, KinematicsError> {
        let robot = Robot::new(settings.robot.pose(), settings.robot.params())?;
        Ok(Simulation {
            robot,
            obstacles: settings.world.obstacles.clone(),
            waypoints: WaypointQueue::new(),
            goal: None,
            width: settings.world.width,
            height: settings.world.height,
            cell_size: settings.world.cell_size,
            min_spacing: settings.navigation.min_spacing,
            waypoint_tolerance: settings.navigation.waypoint_tolerance,
            time: 0.0,
            trace: TrackingTrace::new(settings.simulation.trace_window),
        })
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn waypoints(&self) -> &WaypointQueue {
        &self.waypoints
    }

    /// The goal of the route being followed, if any.
    pub fn goal(&self) -> Option<WorldPoint> {
        self.goal
    }

    /// Simulated seconds elapsed.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn trace(&self) -> &TrackingTrace {
        &self.trace
    }

    /// True once every waypoint has been reached.
    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        debug!(%obstacle, "Obstacle added");
        self.obstacles.push(obstacle);
    }

    /// Removes the first obstacle containing `point`.
    pub fn remove_obstacle_at(&mut self, point: WorldPoint) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.contains(point))?;
        let removed = self.obstacles.remove(index);
        debug!(obstacle = %removed, "Obstacle removed");
        Some(removed)
    }

    /// Plans from the robot's position to `goal` and, on success, replaces the
    /// waypoint queue with the simplified route.
    ///
    /// A failed plan leaves the current route untouched.
    pub fn set_target(&mut self, goal: WorldPoint) -> PathResult<WorldPoint> {
        let start = self.robot.position();
        let result = plan_path_detailed(
            start,
            goal,
            self.width,
            self.height,
            &self.obstacles,
            self.cell_size,
        );

        match &result.path {
            Some(path) => {
                let route = simplify(path, self.min_spacing);
                info!(
                    %start,
                    %goal,
                    cells = path.len(),
                    waypoints = route.len(),
                    "New route"
                );
                self.waypoints.replace(route);
                self.goal = Some(goal);
                if self.waypoints.is_empty() {
                    self.robot.clear_target();
                }
            }
            None => {
                warn!(%goal, remaining = self.waypoints.len(), "No route to target, keeping current route");
            }
        }
        result
    }

    /// Advances the robot one tick toward the head waypoint.
    ///
    /// Does nothing while the queue is empty.
    pub fn step(&mut self, dt: f64) -> Result<(), KinematicsError> {
        let Some(head) = self.waypoints.head() else {
            return Ok(());
        };

        self.robot.set_target(head);
        self.robot.advance(dt, self.width, self.height)?;
        self.time += dt;

        let position = self.robot.position();
        if let Some(goal) = self.goal {
            self.trace.record(self.time, position.distance(&goal));
        }

        if let Some(reached) = self.waypoints.advance_if_reached(position, self.waypoint_tolerance) {
            debug!(waypoint = %reached, remaining = self.waypoints.len(), "Waypoint reached");
            if self.waypoints.is_empty() {
                info!(%position, time = self.time, "Route complete");
                self.robot.clear_target();
            }
        }
        Ok(())
    }

    /// Steps until the route is finished or `max_ticks` have run, calling
    /// `on_tick` after every step. Returns the number of ticks taken.
    pub fn run_until_idle(
        &mut self,
        dt: f64,
        max_ticks: u64,
        mut on_tick: impl FnMut(&Simulation),
    ) -> Result<u64, KinematicsError> {
        let mut ticks = 0;
        while !self.is_idle() && ticks < max_ticks {
            self.step(dt)?;
            ticks += 1;
            on_tick(self);
        }
        Ok(ticks)
    }
}
