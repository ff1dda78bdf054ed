#![warn(missing_docs)]

//! Implicit uniform grid over the workspace.
//!
//! The grid is never materialized: occupancy of a cell is decided on demand by
//! testing the cell's footprint against the obstacle snapshot the grid borrows.

use crate::error::NavigationError;
use super::{GridPoint, Obstacle, WorldPoint};

/// A uniform grid of square cells laid over a `width` by `height` workspace,
/// paired with the obstacle snapshot of one planning call.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    /// Number of columns, `floor(width / cell_size)`
    cols: i32,
    /// Number of rows, `floor(height / cell_size)`
    rows: i32,
    /// Side length of a cell in workspace units
    cell_size: f64,
    obstacles: &'a [Obstacle],
}

impl<'a> Grid<'a> {
    /// Creates a grid for the given workspace and obstacle snapshot.
    ///
    /// # Arguments
    /// * `width` - Workspace width
    /// * `height` - Workspace height
    /// * `cell_size` - Side length of a cell
    /// * `obstacles` - Obstacles to test cells against
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The grid, or an error if the cell size
    ///   is not positive or the workspace holds no whole cell
    pub fn new(
        width: f64,
        height: f64,
        cell_size: f64,
        obstacles: &'a [Obstacle],
    ) -> Result<Self, NavigationError> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(NavigationError::InvalidCellSize("Cell size must be positive and finite"));
        }
        if !width.is_finite() || !height.is_finite() {
            return Err(NavigationError::InvalidDimensions("Width and height must be finite"));
        }

        let cols = (width / cell_size).floor();
        let rows = (height / cell_size).floor();
        if cols < 1.0 || rows < 1.0 {
            return Err(NavigationError::InvalidDimensions(
                "Workspace must hold at least one cell in each direction",
            ));
        }
        if cols > f64::from(i32::MAX) || rows > f64::from(i32::MAX) {
            return Err(NavigationError::InvalidDimensions("Grid too large for i32 cell indices"));
        }

        Ok(Grid {
            cols: cols as i32,
            rows: rows as i32,
            cell_size,
            obstacles,
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Side length of a cell.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The obstacle snapshot this grid tests against.
    pub fn obstacles(&self) -> &'a [Obstacle] {
        self.obstacles
    }

    /// Converts workspace coordinates to the cell containing them.
    /// The result may be out of bounds; indices beyond `i32` saturate.
    pub fn world_to_grid(&self, p: WorldPoint) -> GridPoint {
        GridPoint::new(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        )
    }

    /// Like [`Grid::world_to_grid`], but `None` when a cell index would not
    /// fit in an `i32`.
    pub fn checked_world_to_grid(&self, p: WorldPoint) -> Option<GridPoint> {
        let index = |v: f64| {
            let cell = (v / self.cell_size).floor();
            (cell >= f64::from(i32::MIN) && cell <= f64::from(i32::MAX)).then_some(cell as i32)
        };
        Some(GridPoint::new(index(p.x)?, index(p.y)?))
    }

    /// Returns the centre of a cell in workspace coordinates.
    pub fn grid_to_world(&self, cell: GridPoint) -> WorldPoint {
        let half = self.cell_size / 2.0;
        WorldPoint::new(
            f64::from(cell.x) * self.cell_size + half,
            f64::from(cell.y) * self.cell_size + half,
        )
    }

    /// True if `0 <= x < cols` and `0 <= y < rows`.
    pub fn in_bounds(&self, cell: GridPoint) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// The square footprint of a cell in workspace coordinates.
    pub fn cell_footprint(&self, cell: GridPoint) -> Obstacle {
        Obstacle::new(
            f64::from(cell.x) * self.cell_size,
            f64::from(cell.y) * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// True if the cell's footprint intersects any obstacle.
    pub fn is_blocked(&self, cell: GridPoint) -> bool {
        let footprint = self.cell_footprint(cell);
        self.obstacles.iter().any(|o| footprint.intersects(o))
    }

    /// True if the cell is inside the grid and free of obstacles.
    pub fn is_traversable(&self, cell: GridPoint) -> bool {
        self.in_bounds(cell) && !self.is_blocked(cell)
    }

    /// Traversable 4-connected neighbours of a cell (up, down, left, right).
    pub fn neighbors(&self, cell: GridPoint) -> impl Iterator<Item = GridPoint> + '_ {
        const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dx, dy)| {
                Some(GridPoint::new(cell.x.checked_add(dx)?, cell.y.checked_add(dy)?))
            })
            .filter(move |n| self.is_traversable(*n))
    }
}

impl std::fmt::Display for Grid<'_> {
    /// One character per cell, row 0 first: `.` free, `X` blocked.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let c = if self.is_blocked(GridPoint::new(x, y)) { 'X' } else { '.' };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(800.0, 600.0, 10.0, &[]).unwrap();
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 60);
        assert_eq!(grid.cell_size(), 10.0);

        // Partial cells at the far edge are dropped.
        let grid = Grid::new(805.0, 609.0, 10.0, &[]).unwrap();
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 60);
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(
            Grid::new(800.0, 600.0, 0.0, &[]),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            Grid::new(800.0, 600.0, -10.0, &[]),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            Grid::new(800.0, 600.0, f64::NAN, &[]),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            Grid::new(5.0, 600.0, 10.0, &[]),
            Err(NavigationError::InvalidDimensions(_))
        ));
        assert!(matches!(
            Grid::new(800.0, f64::INFINITY, 10.0, &[]),
            Err(NavigationError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_coordinate_conversion() {
        let grid = Grid::new(800.0, 600.0, 10.0, &[]).unwrap();

        assert_eq!(grid.world_to_grid(WorldPoint::new(400.0, 300.0)), GridPoint::new(40, 30));
        assert_eq!(grid.world_to_grid(WorldPoint::new(409.99, 300.01)), GridPoint::new(40, 30));
        assert_eq!(grid.world_to_grid(WorldPoint::new(0.0, 0.0)), GridPoint::new(0, 0));
        // Negative coordinates floor away from zero, landing out of bounds.
        assert_eq!(grid.world_to_grid(WorldPoint::new(-0.5, -15.0)), GridPoint::new(-1, -2));

        let centre = grid.grid_to_world(GridPoint::new(40, 30));
        assert!((centre.x - 405.0).abs() < EPSILON);
        assert!((centre.y - 305.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(800.0, 600.0, 10.0, &[]).unwrap();
        assert!(grid.in_bounds(GridPoint::new(0, 0)));
        assert!(grid.in_bounds(GridPoint::new(79, 59)));
        assert!(!grid.in_bounds(GridPoint::new(80, 59)));
        assert!(!grid.in_bounds(GridPoint::new(79, 60)));
        assert!(!grid.in_bounds(GridPoint::new(-1, 0)));
        assert!(!grid.in_bounds(GridPoint::new(0, -1)));
    }

    #[test]
    fn test_blocked_cells() {
        let obstacles = [Obstacle::new(500.0, 100.0, 50.0, 200.0)];
        let grid = Grid::new(800.0, 600.0, 10.0, &obstacles).unwrap();

        assert!(grid.is_blocked(GridPoint::new(50, 10)));
        assert!(grid.is_blocked(GridPoint::new(54, 29)));
        // Cells that touch the obstacle's edges are blocked too.
        assert!(grid.is_blocked(GridPoint::new(49, 20)));
        assert!(grid.is_blocked(GridPoint::new(55, 20)));
        assert!(grid.is_blocked(GridPoint::new(52, 9)));
        assert!(grid.is_blocked(GridPoint::new(52, 30)));
        assert!(grid.is_blocked(GridPoint::new(55, 30)));
        // One cell further out is free.
        assert!(!grid.is_blocked(GridPoint::new(48, 20)));
        assert!(!grid.is_blocked(GridPoint::new(56, 20)));
        assert!(!grid.is_blocked(GridPoint::new(52, 8)));
        assert!(!grid.is_blocked(GridPoint::new(52, 31)));
    }

    #[test]
    fn test_small_obstacle_blocks_containing_cell() {
        let obstacles = [Obstacle::new(123.0, 456.0, 1.0, 1.0)];
        let grid = Grid::new(800.0, 600.0, 10.0, &obstacles).unwrap();
        assert!(grid.is_blocked(GridPoint::new(12, 45)));
        assert!(!grid.is_blocked(GridPoint::new(13, 45)));
    }

    #[test]
    fn test_neighbors() {
        // Strictly inside cell (1, 0).
        let obstacles = [Obstacle::new(12.0, 2.0, 6.0, 6.0)];
        let grid = Grid::new(50.0, 50.0, 10.0, &obstacles).unwrap();

        // Corner cell: only down is free, right is blocked.
        let n: Vec<_> = grid.neighbors(GridPoint::new(0, 0)).collect();
        assert_eq!(n, vec![GridPoint::new(0, 1)]);

        let n: Vec<_> = grid.neighbors(GridPoint::new(2, 2)).collect();
        assert_eq!(n.len(), 4);
    }

    #[test]
    fn test_neighbors_at_index_limits() {
        let grid = Grid::new(50.0, 50.0, 10.0, &[]).unwrap();
        assert_eq!(grid.neighbors(GridPoint::new(i32::MAX, i32::MAX)).count(), 0);
        assert_eq!(grid.neighbors(GridPoint::new(i32::MIN, i32::MIN)).count(), 0);
        assert_eq!(
            grid.neighbors(GridPoint::new(-1, 0)).collect::<Vec<_>>(),
            vec![GridPoint::new(0, 0)]
        );
    }

    #[test]
    fn test_checked_world_to_grid() {
        let grid = Grid::new(800.0, 600.0, 10.0, &[]).unwrap();
        assert_eq!(
            grid.checked_world_to_grid(WorldPoint::new(405.0, -15.0)),
            Some(GridPoint::new(40, -2))
        );
        assert_eq!(
            grid.checked_world_to_grid(WorldPoint::new(-2.0e10, 300.0)),
            Some(GridPoint::new(-2_000_000_000, 30))
        );
        assert_eq!(grid.checked_world_to_grid(WorldPoint::new(1.0e12, 300.0)), None);
        assert_eq!(grid.checked_world_to_grid(WorldPoint::new(400.0, -1.0e12)), None);
        assert_eq!(grid.world_to_grid(WorldPoint::new(1.0e12, 0.0)).x, i32::MAX);
    }

    #[test]
    fn test_display() {
        let obstacles = [Obstacle::new(12.0, 12.0, 6.0, 6.0)];
        let grid = Grid::new(30.0, 20.0, 10.0, &obstacles).unwrap();
        assert_eq!(format!("{}", grid), "...\n.X.\n");

        // Touching a corner is enough.
        let corner = [Obstacle::new(10.0, 10.0, 0.0, 0.0)];
        let grid = Grid::new(30.0, 20.0, 10.0, &corner).unwrap();
        assert_eq!(format!("{}", grid), "XX.\nXX.\n");
    }

    #[test]
    fn test_obstacle_geometry() {
        let a = Obstacle::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Obstacle::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(&Obstacle::new(10.0, 0.0, 10.0, 10.0)));
        assert!(a.intersects(&Obstacle::new(10.0, 10.0, 5.0, 5.0)));
        assert!(!a.intersects(&Obstacle::new(10.5, 0.0, 10.0, 10.0)));
        assert!(a.contains(WorldPoint::new(0.0, 0.0)));
        assert!(!a.contains(WorldPoint::new(10.0, 5.0)));

        let dragged = Obstacle::from_corners(WorldPoint::new(30.0, 5.0), WorldPoint::new(10.0, 25.0));
        assert_eq!(dragged, Obstacle::new(10.0, 5.0, 20.0, 20.0));
    }
}
