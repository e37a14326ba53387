use crate::cell::{Cell, CellState};
use crate::error::{Error, Result};
use crate::N_SMALLVEC_SIZE;
use core::fmt;
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// [Grid] is a square board of [Cell]s. Besides the cell states it tracks which cell holds the
/// start and goal roles and maintains the 4-connected components of non-barrier cells in a
/// [UnionFind] structure, so reachability can be answered without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    goal: Option<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Builds a `size` x `size` grid of empty cells.
    pub fn new(size: usize) -> Result<Grid> {
        if size == 0 {
            return Err(Error::InvalidSize { size: 0 });
        }
        let cells = iproduct!(0..size, 0..size)
            .map(|(row, col)| Cell::new(row, col))
            .collect();
        let mut grid = Grid {
            size,
            cells,
            start: None,
            goal: None,
            components: UnionFind::new(size * size),
            components_dirty: false,
        };
        grid.generate_components();
        info!("Created {size}x{size} grid");
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    pub fn point_in_bounds(&self, point: Point) -> bool {
        self.in_bounds(point.x as i64, point.y as i64)
    }
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }
    /// Index into `cells`; only valid for in-bounds points.
    fn get_ix_point(&self, point: &Point) -> usize {
        point.y as usize * self.size + point.x as usize
    }
    fn checked_ix(&self, point: Point) -> Result<usize> {
        if self.point_in_bounds(point) {
            Ok(self.get_ix_point(&point))
        } else {
            Err(Error::OutOfBounds {
                row: point.y as i64,
                col: point.x as i64,
                size: self.size,
            })
        }
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<&Cell> {
        if row < self.size && col < self.size {
            Ok(&self.cells[row * self.size + col])
        } else {
            Err(Error::OutOfBounds {
                row: row as i64,
                col: col as i64,
                size: self.size,
            })
        }
    }
    pub fn cell(&self, point: Point) -> Result<&Cell> {
        let ix = self.checked_ix(point)?;
        Ok(&self.cells[ix])
    }
    pub fn state(&self, point: Point) -> Result<CellState> {
        self.cell(point).map(Cell::state)
    }
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    /// Cells of one row, left to right, or `None` past the last row.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.cells.chunks(self.size).nth(row)
    }

    /// Gives `point` the start role, releasing the previous start cell.
    pub fn set_start(&mut self, point: Point) -> Result<()> {
        self.place_endpoint(point, CellState::Start)
    }
    /// Gives `point` the goal role, releasing the previous goal cell.
    pub fn set_goal(&mut self, point: Point) -> Result<()> {
        self.place_endpoint(point, CellState::Goal)
    }
    fn place_endpoint(&mut self, point: Point, role: CellState) -> Result<()> {
        let ix = self.checked_ix(point)?;
        let held = self.cells[ix].state;
        if held == role {
            return Ok(());
        }
        if held.is_endpoint() {
            return Err(Error::RoleConflict { point, held });
        }
        let slot = if role == CellState::Start {
            &mut self.start
        } else {
            &mut self.goal
        };
        if let Some(previous) = slot.replace(point) {
            let prev_ix = previous.y as usize * self.size + previous.x as usize;
            self.cells[prev_ix].state = CellState::Empty;
        }
        self.cells[ix].state = role;
        if held == CellState::Barrier {
            self.join_components(point);
        }
        debug!("{role:?} placed at {point}");
        Ok(())
    }

    /// Paints a barrier on an empty (or search-marked) cell. Returns whether the cell changed;
    /// barriers and the start and goal cells are left alone.
    pub fn toggle_barrier(&mut self, point: Point) -> Result<bool> {
        let ix = self.checked_ix(point)?;
        if !self.cells[ix].state.is_paintable() {
            return Ok(false);
        }
        self.cells[ix].state = CellState::Barrier;
        // A new barrier may split a component, which union-find cannot undo.
        self.components_dirty = true;
        Ok(true)
    }

    /// Restores a single cell to [CellState::Empty], releasing the start or goal role it held.
    pub fn reset_cell(&mut self, point: Point) -> Result<()> {
        let ix = self.checked_ix(point)?;
        let held = self.cells[ix].state;
        match held {
            CellState::Start => self.start = None,
            CellState::Goal => self.goal = None,
            _ => {}
        }
        self.cells[ix].state = CellState::Empty;
        if held == CellState::Barrier {
            self.join_components(point);
        }
        Ok(())
    }

    /// Clears every cell and drops the start and goal roles.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.state = CellState::Empty;
        }
        self.start = None;
        self.goal = None;
        self.generate_components();
        info!("Grid reset");
    }

    /// Turns Frontier, Visited and Path tags back into Empty so a search can be rerun on the
    /// same layout.
    pub fn clear_search_marks(&mut self) {
        for cell in &mut self.cells {
            if cell.state.is_search_mark() {
                cell.state = CellState::Empty;
            }
        }
    }

    /// Applies a search tag. Barriers and the start and goal cells keep their state.
    pub(crate) fn mark(&mut self, point: Point, state: CellState) {
        let ix = self.get_ix_point(&point);
        let cell = &mut self.cells[ix];
        if cell.state.is_paintable() {
            cell.state = state;
        }
    }

    /// Orthogonal neighbours of `point` that lie inside the grid and are not barriers, in the
    /// order up, down, left, right.
    pub fn neighbors_of(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        [
            Point::new(point.x, point.y - 1),
            Point::new(point.x, point.y + 1),
            Point::new(point.x - 1, point.y),
            Point::new(point.x + 1, point.y),
        ]
        .into_iter()
        .filter(|p| self.can_move_to(*p))
        .collect()
    }
    pub fn can_move_to(&self, point: Point) -> bool {
        self.point_in_bounds(point) && !self.cells[self.get_ix_point(&point)].is_barrier()
    }

    /// Checks that `path` is a non-empty walk of orthogonal unit steps over in-bounds,
    /// non-barrier cells.
    pub fn is_valid_path(&self, path: &[Point]) -> bool {
        !path.is_empty()
            && path.iter().all(|p| self.can_move_to(*p))
            && path
                .iter()
                .tuple_windows()
                .all(|(a, b)| crate::manhattan_distance(a, b) == 1)
    }

    fn join_components(&mut self, point: Point) {
        let p_ix = self.get_ix_point(&point);
        for n in self.neighbors_of(&point) {
            self.components.union(p_ix, self.get_ix_point(&n));
        }
    }

    /// Checks if start and goal are on the same component. Only exact after [update](Self::update)
    /// when barriers have been placed since the last regeneration.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.can_move_to(*start) && self.can_move_to(*goal) {
            !self
                .components
                .equiv(self.get_ix_point(start), self.get_ix_point(goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open 4-neighbours to the same components.
    pub fn generate_components(&mut self) {
        debug!("Generating connected components");
        let n = self.size;
        self.components = UnionFind::new(n * n);
        self.components_dirty = false;
        for (y, x) in iproduct!(0..n as i32, 0..n as i32) {
            let point = Point::new(x, y);
            if !self.can_move_to(point) {
                continue;
            }
            let parent_ix = self.get_ix_point(&point);
            for p in [Point::new(x, y + 1), Point::new(x + 1, y)] {
                if self.can_move_to(p) {
                    let ix = self.get_ix_point(&p);
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line = row.iter().map(|c| c.state().glyph()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(col, row)
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(Grid::new(0).unwrap_err(), Error::InvalidSize { size: 0 });
    }

    #[test]
    fn cell_at_checks_bounds() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(grid.cell_at(2, 1).unwrap().position(), p(2, 1));
        assert!(matches!(
            grid.cell_at(3, 0),
            Err(Error::OutOfBounds { row: 3, col: 0, size: 3 })
        ));
        assert!(grid.cell(Point::new(-1, 0)).is_err());
    }

    #[test]
    fn rows_past_the_edge_are_none() {
        let grid = Grid::new(3).unwrap();
        let last = grid.row(2).unwrap();
        assert_eq!(last.len(), 3);
        assert_eq!(last[0].position(), p(2, 0));
        assert!(grid.row(3).is_none());
        assert!(grid.row(usize::MAX).is_none());
        assert!(matches!(
            grid.state(p(0, 3)),
            Err(Error::OutOfBounds { row: 0, col: 3, size: 3 })
        ));
        assert!(!grid.reachable(&p(0, 0), &p(3, 0)));
    }

    #[test]
    fn single_start_and_goal() {
        let mut grid = Grid::new(4).unwrap();
        grid.set_start(p(0, 0)).unwrap();
        grid.set_start(p(1, 1)).unwrap();
        assert_eq!(grid.start(), Some(p(1, 1)));
        assert_eq!(grid.state(p(0, 0)).unwrap(), CellState::Empty);
        grid.set_goal(p(3, 3)).unwrap();
        assert_eq!(
            grid.set_goal(p(1, 1)),
            Err(Error::RoleConflict {
                point: p(1, 1),
                held: CellState::Start
            })
        );
        assert_eq!(grid.goal(), Some(p(3, 3)));
        let starts = grid.cells().filter(|c| c.state() == CellState::Start).count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn barrier_only_on_empty_cells() {
        let mut grid = Grid::new(3).unwrap();
        grid.set_start(p(0, 0)).unwrap();
        assert!(!grid.toggle_barrier(p(0, 0)).unwrap());
        assert!(grid.toggle_barrier(p(1, 1)).unwrap());
        assert!(!grid.toggle_barrier(p(1, 1)).unwrap());
        assert_eq!(grid.state(p(1, 1)).unwrap(), CellState::Barrier);
        grid.reset_cell(p(1, 1)).unwrap();
        assert_eq!(grid.state(p(1, 1)).unwrap(), CellState::Empty);
    }

    #[test]
    fn reset_cell_releases_roles() {
        let mut grid = Grid::new(3).unwrap();
        grid.set_start(p(0, 0)).unwrap();
        grid.set_goal(p(2, 2)).unwrap();
        grid.reset_cell(p(0, 0)).unwrap();
        grid.reset_cell(p(2, 2)).unwrap();
        assert_eq!(grid.start(), None);
        assert_eq!(grid.goal(), None);
    }

    #[test]
    fn neighbours_respect_bounds_and_barriers() {
        let mut grid = Grid::new(3).unwrap();
        assert_eq!(grid.neighbors_of(&p(0, 0)).as_slice(), &[p(1, 0), p(0, 1)]);
        assert_eq!(
            grid.neighbors_of(&p(1, 1)).as_slice(),
            &[p(0, 1), p(2, 1), p(1, 0), p(1, 2)]
        );
        grid.toggle_barrier(p(0, 1)).unwrap();
        grid.toggle_barrier(p(1, 2)).unwrap();
        assert_eq!(grid.neighbors_of(&p(1, 1)).as_slice(), &[p(2, 1), p(1, 0)]);
        assert_eq!(grid.neighbors_of(&p(2, 2)).as_slice(), &[p(2, 1)]);
    }

    #[test]
    fn neighbours_never_leave_the_grid() {
        let mut grid = Grid::new(5).unwrap();
        grid.toggle_barrier(p(2, 2)).unwrap();
        grid.toggle_barrier(p(0, 3)).unwrap();
        for cell in grid.cells() {
            for n in grid.neighbors_of(&cell.position()) {
                assert!(grid.point_in_bounds(n));
                assert_ne!(grid.state(n).unwrap(), CellState::Barrier);
                assert_eq!(crate::manhattan_distance(&n, &cell.position()), 1);
            }
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut grid = Grid::new(3).unwrap();
        grid.set_start(p(0, 0)).unwrap();
        grid.set_goal(p(2, 2)).unwrap();
        grid.toggle_barrier(p(1, 1)).unwrap();
        grid.reset();
        assert!(grid.cells().all(|c| c.state() == CellState::Empty));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.goal(), None);
    }

    /// Tests whether cells are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        // |.#.|
        let mut grid = Grid::new(3).unwrap();
        for row in 0..3 {
            grid.toggle_barrier(p(row, 1)).unwrap();
        }
        assert!(grid.components_dirty);
        grid.update();
        assert!(grid.reachable(&p(0, 0), &p(2, 0)));
        assert!(grid.unreachable(&p(0, 0), &p(0, 2)));
        assert!(grid.unreachable(&p(0, 0), &p(0, 1)));
        // Opening the wall joins both sides without a regeneration.
        grid.reset_cell(p(1, 1)).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&p(0, 0), &p(0, 2)));
    }

    #[test]
    fn path_validation() {
        let mut grid = Grid::new(3).unwrap();
        grid.toggle_barrier(p(1, 1)).unwrap();
        assert!(grid.is_valid_path(&[p(0, 0), p(0, 1), p(0, 2)]));
        assert!(!grid.is_valid_path(&[p(0, 0), p(1, 1)]));
        assert!(!grid.is_valid_path(&[p(0, 1), p(1, 1), p(2, 1)]));
        assert!(!grid.is_valid_path(&[]));
    }

    #[test]
    fn display_draws_glyphs() {
        let mut grid = Grid::new(2).unwrap();
        grid.set_start(p(0, 0)).unwrap();
        grid.set_goal(p(1, 1)).unwrap();
        grid.toggle_barrier(p(0, 1)).unwrap();
        assert_eq!(grid.to_string(), "S#\n.G\n");
    }
}
