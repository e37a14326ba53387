use grid_util::point::Point;

/// Render/role tag of a single cell. Start, Goal and Barrier are set by the user; Frontier,
/// Visited and Path are written by a search run and can be wiped with
/// [clear_search_marks](crate::grid::Grid::clear_search_marks).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Barrier,
    Start,
    Goal,
    Frontier,
    Visited,
    Path,
}

impl CellState {
    /// True for the tags a search run writes.
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellState::Frontier | CellState::Visited | CellState::Path)
    }
    /// Cells that can be painted over by the user: empty ones and search marks.
    pub fn is_paintable(self) -> bool {
        self == CellState::Empty || self.is_search_mark()
    }
    pub fn is_endpoint(self) -> bool {
        matches!(self, CellState::Start | CellState::Goal)
    }
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Barrier => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Frontier => 'o',
            CellState::Visited => 'x',
            CellState::Path => '*',
        }
    }
}

/// One grid position. The coordinates are fixed at construction, only the state changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    pub(crate) state: CellState,
}

impl Cell {
    pub(crate) fn new(row: usize, col: usize) -> Cell {
        Cell {
            row,
            col,
            state: CellState::Empty,
        }
    }
    pub fn row(&self) -> usize {
        self.row
    }
    pub fn col(&self) -> usize {
        self.col
    }
    pub fn state(&self) -> CellState {
        self.state
    }
    /// Position of the cell as a [Point], with `x` the column and `y` the row.
    pub fn position(&self) -> Point {
        Point::new(self.col as i32, self.row as i32)
    }
    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }
}
