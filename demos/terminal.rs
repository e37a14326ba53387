//! Terminal front end.
//!
//! Left click places the start, then the goal, then barriers; right click clears a cell. Space
//! runs the search, `c` clears the grid and `q` or Esc quits, also while a search is animating.
//!
//! Run with `cargo run --example terminal --features terminal`.
use astar_visualizer::{
    path_len, Button, CellState, Command, Controller, Grid, PathResult, VisualizerConfig,
    DEFAULT_ROWS,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Stdout, Write};
use std::ops::ControlFlow;
use std::time::Duration;

const HELP: &str = "left: start/goal/barrier  right: clear  space: search  c: clear  q: quit";

fn color(state: CellState) -> Color {
    match state {
        CellState::Empty => Color::White,
        CellState::Barrier => Color::Black,
        CellState::Start => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        CellState::Goal => Color::Rgb {
            r: 64,
            g: 224,
            b: 208,
        },
        CellState::Frontier => Color::Green,
        CellState::Visited => Color::Red,
        CellState::Path => Color::Rgb {
            r: 128,
            g: 0,
            b: 128,
        },
    }
}

/// Owns the terminal for the lifetime of the session and restores it on drop.
struct Renderer {
    out: Stdout,
}

impl Renderer {
    fn init() -> io::Result<Renderer> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture,
            terminal::Clear(ClearType::All)
        )?;
        Ok(Renderer { out })
    }

    /// Every cell is two columns wide so the grid looks roughly square.
    fn draw(&mut self, grid: &Grid, status: &str) -> io::Result<()> {
        for row in 0..grid.size() {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for cell in grid.row(row).unwrap_or_default() {
                queue!(self.out, SetBackgroundColor(color(cell.state())), Print("  "))?;
            }
        }
        queue!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, grid.size() as u16),
            terminal::Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Drains pending input, looking for a quit key.
fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            kind: KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

fn status_line(controller: &Controller) -> String {
    match controller.last_report().map(|r| &r.result) {
        Some(PathResult::Found(path)) => format!("path length {}  |  {HELP}", path_len(path)),
        Some(PathResult::NotFound) => format!("no path  |  {HELP}"),
        Some(PathResult::Cancelled) => format!("cancelled  |  {HELP}"),
        None => HELP.to_owned(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (_, height) = terminal::size()?;
    let rows = (height.saturating_sub(1) as usize).clamp(5, DEFAULT_ROWS);
    // One terminal row per grid row; mouse columns are halved before mapping.
    let config = VisualizerConfig::new()
        .with_rows(rows)
        .with_window_width(rows as u32)
        .with_step_delay(Duration::from_millis(10));
    let mut controller = Controller::new(config)?;
    let mut renderer = Renderer::init()?;

    while controller.is_running() {
        renderer.draw(controller.grid(), &status_line(&controller))?;
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Mouse(me) => {
                let button = match me.kind {
                    MouseEventKind::Down(MouseButton::Left)
                    | MouseEventKind::Drag(MouseButton::Left) => Some(Button::Left),
                    MouseEventKind::Down(MouseButton::Right)
                    | MouseEventKind::Drag(MouseButton::Right) => Some(Button::Right),
                    _ => None,
                };
                let (x, y) = (me.column as u32 / 2, me.row as u32);
                if let Some(button) = button {
                    if (x as usize) < rows && (y as usize) < rows {
                        controller.press(button, x, y)?;
                    }
                }
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let command = match key.code {
                    KeyCode::Char(' ') => Command::Search,
                    KeyCode::Char('c') => Command::Clear,
                    KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
                    _ => continue,
                };
                let mut io_error = None;
                let mut halted = false;
                controller.command(command, |grid| {
                    let checked = renderer
                        .draw(grid, "searching...  q: quit")
                        .and_then(|_| quit_requested());
                    match checked {
                        Ok(false) => ControlFlow::Continue(()),
                        Ok(true) => {
                            halted = true;
                            ControlFlow::Break(())
                        }
                        Err(e) => {
                            io_error = Some(e);
                            ControlFlow::Break(())
                        }
                    }
                })?;
                if let Some(e) = io_error {
                    return Err(e.into());
                }
                if halted {
                    controller.command(Command::Quit, |_| ControlFlow::Continue(()))?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
