use pathbot_navigation::{Grid, Obstacle, WorldPoint, plan_path_detailed};
use rand::Rng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();

    // 15 random obstacles in a 600x300 workspace, each at most 60 units on a side.
    let mut rng = rand::rng();
    let obstacles: Vec<Obstacle> = (0..15)
        .map(|_| {
            Obstacle::new(
                rng.random_range(40.0..540.0),
                rng.random_range(0.0..260.0),
                rng.random_range(10.0..60.0),
                rng.random_range(10.0..60.0),
            )
        })
        .collect();

    let grid = match Grid::new(600.0, 300.0, 10.0, &obstacles) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to build grid: {}", e);
            return;
        }
    };
    println!("Occupancy:\n{}", grid);

    let start = WorldPoint::new(5.0, 150.0);
    let goal = WorldPoint::new(595.0, 150.0);
    let result = plan_path_detailed(start, goal, 600.0, 300.0, &obstacles, 10.0);
    println!("{}", result);
}
