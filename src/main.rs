mod config;      // `config.rs`: settings file and env overrides
mod simulation;  // `simulation.rs`: robot, obstacles and waypoint loop
mod trace;       // `trace.rs`: distance-to-goal history

use anyhow::Context;
use spin_sleep::SpinSleeper;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{self, EnvFilter};

use simulation::Simulation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Pathbot simulation started.");
    match run() {
        Ok(()) => info!("Simulation finished successfully."),
        Err(e) => {
            error!("Simulation failed: {:?}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<()> {
    let settings = config::load_config()?;
    let sim_settings = &settings.simulation;
    let mut sim = Simulation::new(&settings).context("failed to create robot")?;
    info!(pose = %sim.robot().pose(), obstacles = sim.obstacles().len(), "Robot placed");

    if sim_settings.targets.is_empty() {
        warn!("No targets configured; nothing to do.");
        return Ok(());
    }

    let sleeper = sim_settings.realtime.then(|| SpinSleeper::new(100_000));
    let tick = Duration::from_secs_f64(sim_settings.dt);

    for (i, &target) in sim_settings.targets.iter().enumerate() {
        let result = sim.set_target(target);
        info!(goal = %target, %result, "Target {} of {}", i + 1, sim_settings.targets.len());
        if !result.is_success() {
            continue;
        }

        let ticks = sim
            .run_until_idle(sim_settings.dt, sim_settings.max_ticks, |_| {
                if let Some(sleeper) = &sleeper {
                    sleeper.sleep(tick);
                }
            })
            .with_context(|| format!("driving toward {}", target))?;

        let error = sim.robot().position().distance(&target);
        if sim.is_idle() {
            info!(ticks, time = sim.time(), error, "Target reached");
        } else {
            warn!(ticks, error, goal = ?sim.goal(), remaining = sim.waypoints().len(), "Tick budget exhausted before target");
        }
    }

    let trace = sim.trace();
    if trace.is_empty() {
        return Ok(());
    }
    info!(
        samples = trace.len(),
        last = trace.last().unwrap_or(0.0),
        max = trace.max().unwrap_or(0.0),
        mean = trace.mean().unwrap_or(0.0),
        recent_max = trace.window(1.0).map(|(_, e)| e).fold(0.0, f64::max),
        "Tracking error summary"
    );
    Ok(())
}
