//! Error types for grid construction, grid edits and search preconditions.
//!
//! A search that exhausts its frontier is not an error; see
//! [PathResult](crate::search::PathResult).

use grid_util::point::Point;
use thiserror::Error;

use crate::cell::CellState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid grid size {size}: needs at least one row and one pixel per row")]
    InvalidSize { size: usize },

    #[error("cell ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: i64, col: i64, size: usize },

    #[error("cell {point} already holds the {held:?} role")]
    RoleConflict { point: Point, held: CellState },

    #[error("no start cell has been placed")]
    MissingStart,

    #[error("no goal cell has been placed")]
    MissingGoal,

    #[error("start and goal are the same cell {0}")]
    StartIsGoal(Point),

    #[error("search endpoint {0} is a barrier")]
    BarrierEndpoint(Point),
}

impl Error {
    /// Precondition violations are reported to the caller as no-ops rather than
    /// aborting the session.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::MissingStart
                | Error::MissingGoal
                | Error::StartIsGoal(_)
                | Error::BarrierEndpoint(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
