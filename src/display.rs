use std::fmt;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The monochrome pixel grid. Coordinates wrap on both axes, so anything
/// drawn off an edge reappears on the opposite one.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH] = on;
    }

    /// flip one pixel; returns true if it was on and is now off
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let px = &mut self.pixels[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH];
        *px = !*px;
        !*px
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> {
        self.pixels.iter()
    }

    pub fn is_blank(&self) -> bool {
        self.rows().all(|row| row.iter().all(|&px| !px))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: String = row.iter().map(|&px| if px { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Display is used by the interpreter to draw things on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// erase whatever is currently shown
    fn clear(&mut self) -> Result<(), io::Error>;

    /// push the whole frame to the output surface
    fn render(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;
}

// store useful metadata about the terminal canvas
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel that is `lit`; canvas y grows upward
    fn points_from_frame<'a>(
        &self,
        frame: &'a FrameBuffer,
        lit: bool,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        frame.rows().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, &px)| px == lit)
                .map(move |(x, _)| (x as f64, -1.0 * y as f64))
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for MonoTermDisplay {
    fn clear(&mut self) -> Result<(), io::Error> {
        self.terminal.clear()
    }

    fn render(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        let resolution = &self.resolution;
        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let unlit = resolution.points_from_frame(frame, false).collect::<Vec<_>>();
            let lit = resolution.points_from_frame(frame, true).collect::<Vec<_>>();
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// renders nowhere, but remembers what it was asked to do; used for
/// `--headless` runs and for testing non-display routines
#[derive(Default)]
pub struct HeadlessDisplay {
    pub clears: usize,
    pub renders: usize,
    pub last_frame: Option<FrameBuffer>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        HeadlessDisplay::default()
    }
}

impl Display for HeadlessDisplay {
    fn clear(&mut self) -> Result<(), io::Error> {
        self.clears += 1;
        Ok(())
    }

    fn render(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        self.renders += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
