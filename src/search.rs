//! A* over a [Grid], one expansion at a time.
//!
//! The frontier is a [BinaryHeap] keyed on the estimated total cost with a monotonically
//! increasing insertion counter as tie-breaker, so cells with equal estimates leave the frontier
//! in the order they entered it. Every expansion is followed by a call to the caller's step
//! callback, which receives the grid for redrawing and decides whether the run continues.
use crate::cell::CellState;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::{manhattan_distance, path_len, C};
use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::ControlFlow;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Outcome of a search run. Neither a missing path nor a halted run is an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// Cells from start to goal, both included.
    Found(Vec<Point>),
    NotFound,
    /// The step callback asked to stop before the run finished.
    Cancelled,
}

impl PathResult {
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            PathResult::Found(path) => Some(path),
            _ => None,
        }
    }
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells popped from the frontier and expanded.
    pub expanded: usize,
    /// Cells pushed onto the frontier, including the start.
    pub enqueued: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub result: PathResult,
    pub stats: SearchStats,
}

struct FrontierEntry {
    estimated_cost: i32,
    order: usize,
    point: Point,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.order == other.order
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest estimate, then the oldest entry, must compare
        // greatest.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Bookkeeping for a single run. Cells are keyed by position; `came_from` only ever points
/// from a cell to the cell it was reached from, so it cannot form cycles.
struct SearchState {
    open_set: BinaryHeap<FrontierEntry>,
    open_membership: FxHashSet<Point>,
    came_from: FxIndexMap<Point, Point>,
    g_score: FxHashMap<Point, i32>,
    f_score: FxHashMap<Point, i32>,
    insertion_counter: usize,
}

impl SearchState {
    fn new(start: Point, goal: &Point) -> SearchState {
        let h = manhattan_distance(&start, goal);
        let mut state = SearchState {
            open_set: BinaryHeap::new(),
            open_membership: FxHashSet::default(),
            came_from: FxIndexMap::default(),
            g_score: FxHashMap::default(),
            f_score: FxHashMap::default(),
            insertion_counter: 0,
        };
        state.g_score.insert(start, 0);
        state.f_score.insert(start, h);
        state.open_set.push(FrontierEntry {
            estimated_cost: h,
            order: 0,
            point: start,
        });
        state.open_membership.insert(start);
        state
    }

    /// Unreached cells have an infinite cost.
    fn g(&self, point: &Point) -> i32 {
        self.g_score.get(point).copied().unwrap_or(i32::MAX)
    }

    fn push(&mut self, point: Point, estimated_cost: i32) {
        self.insertion_counter += 1;
        self.open_set.push(FrontierEntry {
            estimated_cost,
            order: self.insertion_counter,
            point,
        });
    }

    /// Pops the next live entry. An entry is stale when its cell was re-pushed with a lower
    /// estimate or has already been expanded.
    fn pop(&mut self) -> Option<Point> {
        while let Some(FrontierEntry {
            estimated_cost,
            point,
            ..
        }) = self.open_set.pop()
        {
            let live = self.open_membership.contains(&point)
                && self.f_score.get(&point) == Some(&estimated_cost);
            if live {
                self.open_membership.remove(&point);
                return Some(point);
            }
        }
        None
    }

    fn reconstruct_path(&self, goal: Point) -> Vec<Point> {
        let mut path: Vec<Point> =
            std::iter::successors(Some(goal), |p| self.came_from.get(p).copied()).collect();
        path.reverse();
        path
    }
}

fn check_endpoint(grid: &Grid, point: Point) -> Result<()> {
    if grid.cell(point)?.is_barrier() {
        return Err(Error::BarrierEndpoint(point));
    }
    Ok(())
}

/// Runs A* from `start` to `goal`, tagging cells on `grid` as it goes and calling `on_step`
/// after every expansion.
///
/// Newly discovered cells become [CellState::Frontier], expanded cells [CellState::Visited], and
/// on success the cells strictly between start and goal become [CellState::Path]. Start and goal
/// keep their tags. Returning [ControlFlow::Break] from `on_step` stops the run with
/// [PathResult::Cancelled]; tags written so far stay on the grid.
///
/// Fails when either endpoint lies outside the grid or on a barrier, or when they coincide.
pub fn search<F>(
    grid: &mut Grid,
    start: Point,
    goal: Point,
    mut on_step: F,
) -> Result<SearchReport>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    check_endpoint(grid, start)?;
    check_endpoint(grid, goal)?;
    if start == goal {
        return Err(Error::StartIsGoal(start));
    }
    let mut state = SearchState::new(start, &goal);
    let mut stats = SearchStats {
        expanded: 0,
        enqueued: 1,
    };
    let result = loop {
        let Some(current) = state.pop() else {
            break PathResult::NotFound;
        };
        stats.expanded += 1;
        if current == goal {
            let path = state.reconstruct_path(goal);
            for p in &path[1..path.len() - 1] {
                grid.mark(*p, CellState::Path);
            }
            break PathResult::Found(path);
        }
        let tentative_g = state.g(&current) + C;
        for neighbour in grid.neighbors_of(&current) {
            if tentative_g >= state.g(&neighbour) {
                continue;
            }
            let f = tentative_g + manhattan_distance(&neighbour, &goal);
            state.came_from.insert(neighbour, current);
            state.g_score.insert(neighbour, tentative_g);
            state.f_score.insert(neighbour, f);
            if state.open_membership.insert(neighbour) {
                stats.enqueued += 1;
                if neighbour != goal {
                    grid.mark(neighbour, CellState::Frontier);
                }
            }
            // Cells already in the frontier are re-pushed with their improved estimate; the
            // old entry is skipped when it surfaces. Every push, re-pushes included, takes a
            // fresh insertion number, so the counter can run ahead of `stats.enqueued`.
            state.push(neighbour, f);
        }
        if on_step(&*grid).is_break() {
            break PathResult::Cancelled;
        }
        if current != start {
            grid.mark(current, CellState::Visited);
        }
    };
    debug!(
        "Search {} -> {}: expanded {}, enqueued {}",
        start, goal, stats.expanded, stats.enqueued
    );
    match &result {
        PathResult::Found(path) => info!(
            "Found path of length {} from {} to {}",
            path_len(path),
            start,
            goal
        ),
        PathResult::NotFound => info!("{} is not reachable from {}", goal, start),
        PathResult::Cancelled => info!("Search from {} to {} cancelled", start, goal),
    }
    Ok(SearchReport { result, stats })
}

/// Runs [search] between the grid's own start and goal cells.
pub fn search_grid<F>(grid: &mut Grid, on_step: F) -> Result<SearchReport>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    let start = grid.start().ok_or(Error::MissingStart)?;
    let goal = grid.goal().ok_or(Error::MissingGoal)?;
    search(grid, start, goal, on_step)
}
