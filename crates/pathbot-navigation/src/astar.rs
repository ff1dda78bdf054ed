/*

A* = f(n) = g(n) + h(n)

Where:
    n = a cell of the implicit grid
    g(n) = number of unit steps from the start cell to n
    h(n) = straight-line distance from n to the goal cell (never overestimates
           on a 4-connected grid with unit step cost)

The open set is a min-heap on f(n); equal priorities pop in insertion order.
The search stops when the goal cell is popped, not when it is first pushed.

*/

//! A* search over the implicit grid and the world-coordinate planning entry points.

use crate::error::NavigationError;
use crate::map::{Grid, GridPoint, Obstacle, WorldPoint};

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents the result of an A* pathfinding operation with metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathResult<T> {
    /// The computed path, if one was found. Excludes the start cell, so a
    /// start that already sits in the goal cell yields an empty path.
    pub path: Option<Vec<T>>,
    /// The number of unit steps in the path.
    pub total_cost: Option<usize>,
    /// The number of cells popped from the open set.
    pub nodes_explored: usize,
    /// The length of the path (number of waypoints).
    pub path_length: usize,
    /// Why no path was produced.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub error: Option<NavigationError>,
}

impl<T> PathResult<T> {
    /// Creates a new PathResult for a successful path.
    pub fn success(path: Vec<T>, total_cost: usize, nodes_explored: usize) -> Self {
        let path_length = path.len();
        Self {
            path: Some(path),
            total_cost: Some(total_cost),
            nodes_explored,
            path_length,
            error: None,
        }
    }

    /// Creates a new PathResult for a failed path search.
    pub fn failure(error: NavigationError, nodes_explored: usize) -> Self {
        Self {
            path: None,
            total_cost: None,
            nodes_explored,
            path_length: 0,
            error: Some(error),
        }
    }

    /// Returns true if a path was found.
    pub fn is_success(&self) -> bool {
        self.path.is_some()
    }

    /// Returns the path, or an empty one if the search failed.
    pub fn into_path(self) -> Vec<T> {
        self.path.unwrap_or_default()
    }

    fn map_path<U>(self, f: impl FnMut(T) -> U) -> PathResult<U> {
        PathResult {
            path: self.path.map(|p| p.into_iter().map(f).collect()),
            total_cost: self.total_cost,
            nodes_explored: self.nodes_explored,
            path_length: self.path_length,
            error: self.error,
        }
    }
}

impl<T> fmt::Display for PathResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.error) {
            (Some(_), _) => write!(
                f,
                "PathResult {{ success: true, path_length: {}, total_cost: {}, nodes_explored: {} }}",
                self.path_length,
                self.total_cost.unwrap_or(0),
                self.nodes_explored
            ),
            (None, Some(e)) => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {}, error: {} }}",
                self.nodes_explored, e
            ),
            (None, None) => write!(
                f,
                "PathResult {{ success: false, nodes_explored: {} }}",
                self.nodes_explored
            ),
        }
    }
}

/// Open-set entry. `seq` is the push order and breaks priority ties FIFO.
#[derive(Copy, Clone, Debug)]
struct State {
    priority: f64,
    seq: u64,
    position: GridPoint,
}

// The priority queue depends on `Ord`.
// Flip both comparisons so the max-heap pops the lowest f(n) first and,
// among equals, the earliest push.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

/// Walks the `came_from` links back from `goal` to `start`.
///
/// The start cell is not included. Returns `None` if the chain breaks before
/// reaching `start`.
fn reconstruct_path(
    came_from: &HashMap<GridPoint, GridPoint>,
    start: GridPoint,
    goal: GridPoint,
) -> Option<Vec<GridPoint>> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        current = *came_from.get(&current)?;
    }
    path.reverse();
    Some(path)
}

/// Finds a path between two cells of `grid` with the A* algorithm.
///
/// The start cell is searched from even if it is blocked or out of bounds;
/// only neighbours are required to be traversable. An out-of-bounds goal fails
/// at once; a blocked goal ends in `NoPathFound` once the reachable cells run
/// out.
///
/// # Arguments
/// * `grid` - The grid and obstacle snapshot to plan in.
/// * `start` - Starting cell.
/// * `goal` - Goal cell.
///
/// # Returns
/// * `PathResult<GridPoint>` - Detailed pathfinding result with metadata.
pub fn astar_search_detailed(grid: &Grid<'_>, start: GridPoint, goal: GridPoint) -> PathResult<GridPoint> {
    if start == goal {
        return PathResult::success(Vec::new(), 0, 0);
    }
    if !grid.in_bounds(goal) {
        return PathResult::failure(NavigationError::NoPathFound("goal is outside the grid"), 0);
    }

    let mut nodes_explored = 0;
    let mut seq: u64 = 0;
    let mut open_set = BinaryHeap::new();
    let mut closed: HashSet<GridPoint> = HashSet::new();
    let mut came_from: HashMap<GridPoint, GridPoint> = HashMap::new();
    let mut g_score: HashMap<GridPoint, usize> = HashMap::new();

    g_score.insert(start, 0);
    open_set.push(State {
        priority: start.euclidean_distance(&goal),
        seq,
        position: start,
    });

    while let Some(State { position: current, .. }) = open_set.pop() {
        // A cell can sit in the heap more than once; only its first pop counts.
        if !closed.insert(current) {
            continue;
        }
        nodes_explored += 1;

        if current == goal {
            let total_cost = g_score[&current];
            return match reconstruct_path(&came_from, start, goal) {
                Some(path) => PathResult::success(path, total_cost, nodes_explored),
                None => PathResult::failure(
                    NavigationError::NoPathFound("broken predecessor chain"),
                    nodes_explored,
                ),
            };
        }

        let tentative_g_score = g_score[&current] + 1; // Cost between adjacent cells is 1
        for neighbor in grid.neighbors(current) {
            if tentative_g_score < *g_score.get(&neighbor).unwrap_or(&usize::MAX) {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);
                seq += 1;
                open_set.push(State {
                    priority: tentative_g_score as f64 + neighbor.euclidean_distance(&goal),
                    seq,
                    position: neighbor,
                });
            }
        }
    }

    PathResult::failure(
        NavigationError::NoPathFound("open set exhausted before reaching goal"),
        nodes_explored,
    )
}

/// Finds a path between two cells of `grid` with the A* algorithm.
///
/// # Returns
/// * `Vec<GridPoint>` - The cells from the start (exclusive) to the goal, or an empty path.
pub fn astar_search(grid: &Grid<'_>, start: GridPoint, goal: GridPoint) -> Vec<GridPoint> {
    astar_search_detailed(grid, start, goal).into_path()
}

/// Finds a path between two workspace points.
///
/// Coordinates are converted to cells for the search and the resulting cells
/// are mapped back to their centres.
pub fn astar_search_world_detailed(
    grid: &Grid<'_>,
    start: WorldPoint,
    goal: WorldPoint,
) -> PathResult<WorldPoint> {
    if !(start.x.is_finite() && start.y.is_finite() && goal.x.is_finite() && goal.y.is_finite()) {
        return PathResult::failure(
            NavigationError::InvalidCoordinates("start and goal must be finite"),
            0,
        );
    }

    let Some(start_cell) = grid.checked_world_to_grid(start) else {
        return PathResult::failure(NavigationError::NoPathFound("start is far outside the grid"), 0);
    };
    let Some(goal_cell) = grid.checked_world_to_grid(goal) else {
        return PathResult::failure(NavigationError::NoPathFound("goal is outside the grid"), 0);
    };
    astar_search_detailed(grid, start_cell, goal_cell).map_path(|cell| grid.grid_to_world(cell))
}

/// Plans a path from `start` to `goal` across a `width` by `height` workspace
/// divided into `cell_size` cells, avoiding `obstacles`, with detailed results.
///
/// The obstacle list is read for this call only; nothing is cached.
pub fn plan_path_detailed(
    start: WorldPoint,
    goal: WorldPoint,
    width: f64,
    height: f64,
    obstacles: &[Obstacle],
    cell_size: f64,
) -> PathResult<WorldPoint> {
    let grid = match Grid::new(width, height, cell_size, obstacles) {
        Ok(grid) => grid,
        Err(e) => return PathResult::failure(e, 0),
    };

    let result = astar_search_world_detailed(&grid, start, goal);
    match &result.error {
        None => debug!(
            %start,
            %goal,
            obstacles = obstacles.len(),
            path_length = result.path_length,
            nodes_explored = result.nodes_explored,
            "Planned path"
        ),
        Some(e) => warn!(
            %start,
            %goal,
            obstacles = obstacles.len(),
            nodes_explored = result.nodes_explored,
            error = %e,
            "Path planning failed"
        ),
    }
    result
}

/// Plans a path from `start` to `goal`, returning the cell centres along it
/// (start cell excluded) or an empty path when none exists.
pub fn plan_path(
    start: WorldPoint,
    goal: WorldPoint,
    width: f64,
    height: f64,
    obstacles: &[Obstacle],
    cell_size: f64,
) -> Vec<WorldPoint> {
    plan_path_detailed(start, goal, width, height, obstacles, cell_size).into_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-9;

    fn cell_of(p: &WorldPoint, cell_size: f64) -> GridPoint {
        GridPoint::new((p.x / cell_size).floor() as i32, (p.y / cell_size).floor() as i32)
    }

    fn assert_four_connected(path: &[GridPoint], start: GridPoint) {
        let mut previous = start;
        for cell in path {
            assert_eq!(previous.manhattan_distance(cell), 1, "{} -> {} is not a unit step", previous, cell);
            previous = *cell;
        }
    }

    #[test]
    fn test_astar_open_field_scenario() {
        let path = plan_path(
            WorldPoint::new(400.0, 300.0),
            WorldPoint::new(700.0, 300.0),
            800.0,
            600.0,
            &[],
            10.0,
        );
        assert_eq!(path.len(), 30, "Path should take 30 steps");

        let mut previous_x = 40;
        for p in &path {
            let cell = cell_of(p, 10.0);
            assert_eq!(cell.y, 30);
            assert!(cell.x > previous_x, "x-cell should increase monotonically");
            previous_x = cell.x;
        }
        let last = path.last().unwrap();
        assert!((last.x - 705.0).abs() < EPSILON);
        assert!((last.y - 305.0).abs() < EPSILON);
    }

    #[test]
    fn test_astar_output_is_cell_centres() {
        let path = plan_path(
            WorldPoint::new(12.0, 17.0),
            WorldPoint::new(38.0, 17.0),
            100.0,
            100.0,
            &[],
            10.0,
        );
        assert_eq!(path, vec![WorldPoint::new(25.0, 15.0), WorldPoint::new(35.0, 15.0)]);
    }

    #[test]
    fn test_astar_obstacle_scenario() {
        let obstacles = [Obstacle::new(500.0, 100.0, 50.0, 200.0)];
        let path = plan_path(
            WorldPoint::new(400.0, 300.0),
            WorldPoint::new(700.0, 300.0),
            800.0,
            600.0,
            &obstacles,
            10.0,
        );
        assert!(!path.is_empty());
        // Row 30 touches the obstacle's lower edge, so the straight line is cut.
        assert!(path.len() > 30, "Path should detour around the obstacle");
        assert_eq!(path.len(), 32);
        assert!(path.iter().any(|p| cell_of(p, 10.0).y != 30), "Path should leave row 30");

        let grid = Grid::new(800.0, 600.0, 10.0, &obstacles).unwrap();
        for p in &path {
            let cell = cell_of(p, 10.0);
            assert!(!grid.is_blocked(cell), "{} lies in an obstacle", p);
            assert!(!grid.cell_footprint(cell).intersects(&obstacles[0]));
        }
        let last = path.last().unwrap();
        assert!((last.x - 705.0).abs() < EPSILON);
        assert!((last.y - 305.0).abs() < EPSILON);
    }

    #[test]
    fn test_astar_detours_around_wall() {
        // Blocks rows 24..=35, squarely across row 30.
        let obstacles = [Obstacle::new(500.0, 250.0, 50.0, 100.0)];
        let grid = Grid::new(800.0, 600.0, 10.0, &obstacles).unwrap();
        let start = GridPoint::new(40, 30);
        let goal = GridPoint::new(70, 30);

        let result = astar_search_detailed(&grid, start, goal);
        assert!(result.is_success());
        let path = result.path.unwrap();

        assert!(path.len() > 30, "Path should be longer than the straight line");
        // Around the wall's lower edge: 30 across plus 6 down and 6 back up.
        assert_eq!(path.len(), 42);
        assert_eq!(result.total_cost, Some(42));
        assert_eq!(*path.last().unwrap(), goal);
        assert_four_connected(&path, start);
        assert!(path.iter().all(|c| !grid.is_blocked(*c)));
    }

    #[test]
    fn test_astar_optimal_on_open_grid() {
        let grid = Grid::new(400.0, 300.0, 10.0, &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let start = GridPoint::new(rng.random_range(0..40), rng.random_range(0..30));
            let goal = GridPoint::new(rng.random_range(0..40), rng.random_range(0..30));
            let path = astar_search(&grid, start, goal);

            assert_eq!(path.len() as u32, start.manhattan_distance(&goal));
            if start != goal {
                assert_eq!(*path.last().unwrap(), goal);
            }
            assert_four_connected(&path, start);
        }
    }

    #[test]
    fn test_astar_respects_random_obstacles() {
        let mut rng = StdRng::seed_from_u64(42);
        let obstacles: Vec<Obstacle> = (0..12)
            .map(|_| {
                Obstacle::new(
                    rng.random_range(50.0..700.0),
                    rng.random_range(50.0..500.0),
                    rng.random_range(10.0..80.0),
                    rng.random_range(10.0..80.0),
                )
            })
            .collect();
        let grid = Grid::new(800.0, 600.0, 10.0, &obstacles).unwrap();

        let result = astar_search_detailed(&grid, GridPoint::new(0, 0), GridPoint::new(79, 59));
        if let Some(path) = result.path {
            assert!(path.iter().all(|c| grid.is_traversable(*c)));
            assert_four_connected(&path, GridPoint::new(0, 0));
            assert!(path.len() as u32 >= GridPoint::new(0, 0).manhattan_distance(&GridPoint::new(79, 59)));
        }
    }

    #[test]
    fn test_astar_no_path_when_goal_enclosed() {
        // A ring of cells around (10, 10), with no 4-connected opening. Each
        // obstacle sits inside its cells without touching (10, 10).
        let obstacles = [
            Obstacle::new(91.0, 91.0, 28.0, 8.0),
            Obstacle::new(91.0, 111.0, 28.0, 8.0),
            Obstacle::new(91.0, 101.0, 8.0, 8.0),
            Obstacle::new(111.0, 101.0, 8.0, 8.0),
        ];
        let grid = Grid::new(200.0, 200.0, 10.0, &obstacles).unwrap();
        assert!(!grid.is_blocked(GridPoint::new(10, 10)));

        let result = astar_search_detailed(&grid, GridPoint::new(0, 0), GridPoint::new(10, 10));
        assert!(!result.is_success());
        assert!(matches!(result.error, Some(NavigationError::NoPathFound(_))));
        // Every reachable cell is expanded exactly once.
        assert_eq!(result.nodes_explored, 20 * 20 - 9);
        assert!(astar_search(&grid, GridPoint::new(0, 0), GridPoint::new(10, 10)).is_empty());
    }

    #[test]
    fn test_astar_blocked_goal() {
        let obstacles = [Obstacle::new(100.0, 100.0, 10.0, 10.0)];
        let path = plan_path(
            WorldPoint::new(5.0, 5.0),
            WorldPoint::new(105.0, 105.0),
            200.0,
            200.0,
            &obstacles,
            10.0,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_astar_start_inside_obstacle_can_escape() {
        let obstacles = [Obstacle::new(1.0, 1.0, 8.0, 8.0)];
        let grid = Grid::new(100.0, 100.0, 10.0, &obstacles).unwrap();
        assert!(grid.is_blocked(GridPoint::new(0, 0)));
        let path = astar_search(&grid, GridPoint::new(0, 0), GridPoint::new(3, 0));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_astar_start_equals_goal() {
        let result = plan_path_detailed(
            WorldPoint::new(401.0, 301.0),
            WorldPoint::new(408.0, 309.0),
            800.0,
            600.0,
            &[],
            10.0,
        );
        assert!(result.is_success());
        assert_eq!(result.path, Some(Vec::new()));
        assert_eq!(result.total_cost, Some(0));
    }

    #[test]
    fn test_astar_goal_out_of_bounds() {
        let result = plan_path_detailed(
            WorldPoint::new(400.0, 300.0),
            WorldPoint::new(900.0, 300.0),
            800.0,
            600.0,
            &[],
            10.0,
        );
        assert!(matches!(result.error, Some(NavigationError::NoPathFound(_))));
        assert!(result.into_path().is_empty());
    }

    #[test]
    fn test_astar_start_out_of_bounds() {
        // The start cell is never checked, so the search steps back in.
        let grid = Grid::new(100.0, 100.0, 10.0, &[]).unwrap();
        let path = astar_search(&grid, GridPoint::new(-1, 0), GridPoint::new(2, 0));
        assert_eq!(path, vec![GridPoint::new(0, 0), GridPoint::new(1, 0), GridPoint::new(2, 0)]);
    }

    #[test]
    fn test_astar_start_far_outside_grid() {
        for x in [-1.0e12, 1.0e12] {
            let result = plan_path_detailed(
                WorldPoint::new(x, 300.0),
                WorldPoint::new(700.0, 300.0),
                800.0,
                600.0,
                &[],
                10.0,
            );
            assert!(matches!(result.error, Some(NavigationError::NoPathFound(_))), "start x = {}", x);
            assert_eq!(result.nodes_explored, 0);
        }

        let result = plan_path_detailed(
            WorldPoint::new(400.0, 1.0e12),
            WorldPoint::new(-1.0e12, -1.0e12),
            800.0,
            600.0,
            &[],
            10.0,
        );
        assert!(matches!(result.error, Some(NavigationError::NoPathFound(_))));
    }

    #[test]
    fn test_astar_start_many_cells_outside_grid() {
        // Representable, but no neighbour is ever in bounds.
        let result = plan_path_detailed(
            WorldPoint::new(-2.0e10, 300.0),
            WorldPoint::new(700.0, 300.0),
            800.0,
            600.0,
            &[],
            10.0,
        );
        assert!(matches!(result.error, Some(NavigationError::NoPathFound(_))));
        assert_eq!(result.nodes_explored, 1);

        let grid = Grid::new(800.0, 600.0, 10.0, &[]).unwrap();
        for start in [GridPoint::new(i32::MAX, i32::MAX), GridPoint::new(i32::MIN, 30)] {
            let result = astar_search_detailed(&grid, start, GridPoint::new(70, 30));
            assert!(!result.is_success());
            assert_eq!(result.nodes_explored, 1);
        }
    }

    #[test]
    fn test_astar_invalid_inputs() {
        let nan = plan_path_detailed(
            WorldPoint::new(f64::NAN, 0.0),
            WorldPoint::new(50.0, 50.0),
            100.0,
            100.0,
            &[],
            10.0,
        );
        assert!(matches!(nan.error, Some(NavigationError::InvalidCoordinates(_))));

        let bad_cell = plan_path_detailed(
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(50.0, 50.0),
            100.0,
            100.0,
            &[],
            0.0,
        );
        assert!(matches!(bad_cell.error, Some(NavigationError::InvalidCellSize(_))));
    }

    #[test]
    fn test_path_result_display() {
        let grid = Grid::new(50.0, 50.0, 10.0, &[]).unwrap();
        let result = astar_search_detailed(&grid, GridPoint::new(0, 0), GridPoint::new(4, 4));
        assert!(result.nodes_explored > 0, "Should have explored some nodes");
        let display_str = format!("{}", result);
        assert!(display_str.contains("success: true"));
        assert!(display_str.contains("nodes_explored"));

        let failed = astar_search_detailed(&grid, GridPoint::new(0, 0), GridPoint::new(9, 9));
        assert!(format!("{}", failed).contains("success: false"));
    }

    #[test]
    fn test_open_set_ties_pop_in_push_order() {
        let mut heap = BinaryHeap::new();
        for seq in 0..5 {
            heap.push(State { priority: 3.0, seq, position: GridPoint::new(seq as i32, 0) });
        }
        heap.push(State { priority: 1.0, seq: 9, position: GridPoint::new(9, 9) });

        assert_eq!(heap.pop().unwrap().position, GridPoint::new(9, 9));
        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|s| s.seq).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
