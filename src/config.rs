use crate::error::{Error, Result};
use crate::{DEFAULT_ROWS, DEFAULT_WINDOW_WIDTH};
use std::time::Duration;

/// Session settings for a visualizer front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisualizerConfig {
    /// Rows and columns of the square grid.
    pub rows: usize,
    /// Side length of the square viewport in pixels (or terminal cells).
    pub window_width: u32,
    /// Pause after every search step so the expansion stays watchable.
    pub step_delay: Duration,
}

impl Default for VisualizerConfig {
    fn default() -> VisualizerConfig {
        VisualizerConfig {
            rows: DEFAULT_ROWS,
            window_width: DEFAULT_WINDOW_WIDTH,
            step_delay: Duration::ZERO,
        }
    }
}

impl VisualizerConfig {
    pub fn new() -> VisualizerConfig {
        VisualizerConfig::default()
    }
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }
    pub fn with_window_width(mut self, window_width: u32) -> Self {
        self.window_width = window_width;
        self
    }
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Every row needs at least one pixel.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || (self.window_width as usize) < self.rows {
            return Err(Error::InvalidSize { size: self.rows });
        }
        Ok(())
    }

    /// Width of one cell in pixels; the remainder of the division is left unused.
    pub fn cell_width(&self) -> u32 {
        self.window_width / self.rows.max(1) as u32
    }
}
