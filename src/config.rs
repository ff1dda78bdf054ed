use anyhow::{Context, ensure};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use pathbot_kinematics::{PidGains, Pose, RobotParams};
use pathbot_navigation::{Obstacle, WorldPoint};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PATHBOT_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub width: f64,
    pub height: f64,
    pub cell_size: f64,
    pub obstacles: Vec<Obstacle>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldSettings {
            width: 800.0,
            height: 600.0,
            cell_size: 10.0,
            obstacles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub radius: f64,
    pub wheelbase: f64,
    pub max_speed: f64,
    pub heading_deadband: f64,
    pub pid: PidGains,
}

impl RobotSettings {
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.theta)
    }

    pub fn params(&self) -> RobotParams {
        RobotParams {
            radius: self.radius,
            wheelbase: self.wheelbase,
            max_speed: self.max_speed,
            heading_deadband: self.heading_deadband,
            pid: self.pid,
        }
    }
}

impl Default for RobotSettings {
    fn default() -> Self {
        let params = RobotParams::default();
        RobotSettings {
            x: 400.0,
            y: 300.0,
            theta: 0.0,
            radius: params.radius,
            wheelbase: params.wheelbase,
            max_speed: params.max_speed,
            heading_deadband: params.heading_deadband,
            pid: params.pid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Waypoints closer than this to the previous one are dropped.
    pub min_spacing: f64,
    /// Distance at which the head waypoint counts as reached.
    pub waypoint_tolerance: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        NavigationSettings {
            min_spacing: 10.0,
            waypoint_tolerance: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Seconds per tick.
    pub dt: f64,
    /// Tick budget per target.
    pub max_ticks: u64,
    /// Sleep between ticks so the run takes wall-clock time.
    pub realtime: bool,
    /// Seconds of tracking-error samples kept for inspection.
    pub trace_window: f64,
    pub targets: Vec<WorldPoint>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            dt: 1.0 / 60.0,
            max_ticks: 3600,
            realtime: false,
            trace_window: 10.0,
            targets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldSettings,
    pub robot: RobotSettings,
    pub navigation: NavigationSettings,
    pub simulation: SimulationSettings,
}

impl Settings {
    /// Checks the values the libraries do not validate themselves.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.simulation.dt > 0.0, "simulation.dt must be positive");
        ensure!(self.simulation.max_ticks > 0, "simulation.max_ticks must be positive");
        ensure!(self.simulation.trace_window > 0.0, "simulation.trace_window must be positive");
        ensure!(self.navigation.min_spacing >= 0.0, "navigation.min_spacing must be non-negative");
        ensure!(
            self.navigation.waypoint_tolerance > 0.0,
            "navigation.waypoint_tolerance must be positive"
        );
        Ok(())
    }
}

fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> anyhow::Result<Settings> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from `$PATHBOT_CONFIG` or [`DEFAULT_CONFIG_PATH`], with
/// `PATHBOT__SECTION__KEY` environment overrides.
pub fn load_config() -> anyhow::Result<Settings> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    info!("Attempting to load configuration from {}", path);

    let builder = Config::builder()
        .add_source(File::new(&path, FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("PATHBOT").separator("__"));
    match build(builder).with_context(|| format!("failed to load configuration from {}", path)) {
        Ok(settings) => {
            info!(?settings, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            Err(e)
        }
    }
}

/// Parses and validates settings from TOML text alone, without environment
/// overrides.
#[cfg(test)]
pub fn parse_config(toml: &str) -> anyhow::Result<Settings> {
    build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}
