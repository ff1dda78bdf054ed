use pathbot_navigation::{Grid, GridPoint, Obstacle, WorldPoint, plan_path_detailed, simplify};
use std::collections::HashSet;

fn main() {
    // A 40x20 cell workspace with a wall that leaves a gap at the bottom.
    let width = 400.0;
    let height = 200.0;
    let cell_size = 10.0;
    let obstacles = vec![
        Obstacle::new(150.0, 0.0, 20.0, 160.0),
        Obstacle::new(260.0, 60.0, 20.0, 140.0),
    ];

    let start = WorldPoint::new(25.0, 95.0);
    let goal = WorldPoint::new(375.0, 95.0);

    let result = plan_path_detailed(start, goal, width, height, &obstacles, cell_size);
    println!("{}", result);

    let grid = match Grid::new(width, height, cell_size, &obstacles) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Failed to build grid: {}", e);
            return;
        }
    };

    let Some(path) = result.path else {
        println!("\nNo path found.");
        println!("{}", grid);
        return;
    };

    let path_cells: HashSet<GridPoint> = path.iter().map(|p| grid.world_to_grid(*p)).collect();
    let start_cell = grid.world_to_grid(start);
    let goal_cell = grid.world_to_grid(goal);

    println!("\nGrid with path:");
    for y in 0..grid.rows() {
        for x in 0..grid.cols() {
            let cell = GridPoint::new(x, y);
            if cell == start_cell {
                print!("S");
            } else if cell == goal_cell {
                print!("G");
            } else if path_cells.contains(&cell) {
                print!("*");
            } else if grid.is_blocked(cell) {
                print!("X");
            } else {
                print!(".");
            }
        }
        println!();
    }

    let waypoints = simplify(&path, cell_size);
    println!("\nRaw path: {} points, simplified: {} waypoints", path.len(), waypoints.len());
    for (i, w) in waypoints.iter().enumerate() {
        println!("  {:>2}: {}", i, w);
    }
}
