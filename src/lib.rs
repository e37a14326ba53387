//! # astar_visualizer
//!
//! Step-by-step [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a square,
//! 4-connected, uniform-cost grid, built for animation. A [Grid](grid::Grid) holds the painted
//! layout (barriers, one start, one goal); [search](search::search) expands one cell at a time,
//! tags cells as frontier, visited and path, and hands control back to a redraw callback after
//! every expansion. The callback can halt the run.
//!
//! The heuristic is the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), which is admissible
//! for unit-cost orthogonal moves, so returned paths are shortest paths.
//!
//! [Controller](controller::Controller) maps pointer and key input onto grid edits and search
//! runs, leaving drawing to the front end.
pub mod cell;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod search;

pub use cell::{Cell, CellState};
pub use config::VisualizerConfig;
pub use controller::{Button, Command, Controller, PressOutcome};
pub use error::{Error, Result};
pub use grid::Grid;
pub use grid_util::point::Point;
pub use search::{search, search_grid, PathResult, SearchReport, SearchStats};

/// Number of rows (and columns) of a default grid.
pub const DEFAULT_ROWS: usize = 50;
/// Side length of the default square viewport in pixels.
pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
/// Cost of a single orthogonal move.
pub const C: i32 = 1;
/// Inline capacity for neighbour lists: at most 4 on a 4-connected grid.
pub const N_SMALLVEC_SIZE: usize = 4;

/// The [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) between two cells.
pub fn manhattan_distance(p1: &Point, p2: &Point) -> i32 {
    (p1.x - p2.x).abs() + (p1.y - p2.y).abs()
}

/// Number of moves in a path given as the list of visited cells.
pub fn path_len(path: &[Point]) -> usize {
    path.len().saturating_sub(1)
}
