//! Input handling for an interactive session, independent of any windowing toolkit.
//!
//! A front end translates its pointer and key events into [Controller::press] and
//! [Controller::command] calls and draws [Controller::grid] from the step callback it passes in.
use crate::cell::CellState;
use crate::config::VisualizerConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::search::{search_grid, SearchReport};
use grid_util::point::Point;
use log::{debug, info, warn};
use std::ops::ControlFlow;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    /// Places the start, then the goal, then barriers.
    Left,
    /// Clears a cell.
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Search,
    Clear,
    Quit,
}

/// What a pointer press did to the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    Start(Point),
    Goal(Point),
    Barrier(Point),
    Cleared(Point),
    Ignored,
}

pub struct Controller {
    grid: Grid,
    config: VisualizerConfig,
    running: bool,
    last_report: Option<SearchReport>,
}

impl Controller {
    pub fn new(config: VisualizerConfig) -> Result<Controller> {
        config.validate()?;
        let grid = Grid::new(config.rows)?;
        Ok(Controller {
            grid,
            config,
            running: true,
            last_report: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }
    /// False once [Command::Quit] has been issued.
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Maps a pixel position to the cell under it, clamping positions past the last row or
    /// column onto the edge.
    pub fn pixel_to_cell(&self, x: u32, y: u32) -> Point {
        let cell_width = self.config.cell_width().max(1);
        let last = self.grid.size() - 1;
        let row = ((y / cell_width) as usize).min(last);
        let col = ((x / cell_width) as usize).min(last);
        Point::new(col as i32, row as i32)
    }

    pub fn press(&mut self, button: Button, x: u32, y: u32) -> Result<PressOutcome> {
        let point = self.pixel_to_cell(x, y);
        self.press_cell(button, point)
    }

    pub fn press_cell(&mut self, button: Button, point: Point) -> Result<PressOutcome> {
        let state = self.grid.state(point)?;
        let outcome = match button {
            Button::Left => {
                if self.grid.start().is_none() && state != CellState::Goal {
                    self.grid.set_start(point)?;
                    PressOutcome::Start(point)
                } else if self.grid.goal().is_none() && state != CellState::Start {
                    self.grid.set_goal(point)?;
                    PressOutcome::Goal(point)
                } else if self.grid.toggle_barrier(point)? {
                    PressOutcome::Barrier(point)
                } else {
                    PressOutcome::Ignored
                }
            }
            Button::Right => {
                self.grid.reset_cell(point)?;
                PressOutcome::Cleared(point)
            }
        };
        debug!("{button:?} press at {point}: {outcome:?}");
        Ok(outcome)
    }

    /// Executes a key command. A search without both endpoints placed is a no-op and yields
    /// `None`; other errors are returned.
    pub fn command<F>(&mut self, command: Command, on_step: F) -> Result<Option<SearchReport>>
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        match command {
            Command::Search => match self.run_search(on_step) {
                Ok(report) => Ok(Some(report)),
                Err(e) if e.is_precondition() => {
                    warn!("Search not started: {e}");
                    Ok(None)
                }
                Err(e) => Err(e),
            },
            Command::Clear => {
                self.grid.reset();
                self.last_report = None;
                Ok(None)
            }
            Command::Quit => {
                info!("Quit requested");
                self.running = false;
                Ok(None)
            }
        }
    }

    /// Clears the marks of any previous run and searches between the placed endpoints, pausing
    /// for the configured step delay after each step.
    pub fn run_search<F>(&mut self, mut on_step: F) -> Result<SearchReport>
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        self.grid.clear_search_marks();
        self.grid.update();
        if let (Some(start), Some(goal)) = (self.grid.start(), self.grid.goal()) {
            if self.grid.unreachable(&start, &goal) {
                info!("{goal} lies in another component than {start}, expecting no path");
            }
        }
        let delay = self.config.step_delay;
        let report = search_grid(&mut self.grid, |grid| {
            let flow = on_step(grid);
            if flow.is_continue() && !delay.is_zero() {
                std::thread::sleep(delay);
            }
            flow
        })?;
        self.last_report = Some(report.clone());
        Ok(report)
    }
}
