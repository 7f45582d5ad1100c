//! Terminal host surface.
//!
//! Each character cell shows two stacked pixels through the upper half block
//! glyph: the foreground paints the top pixel and the background the bottom
//! one, so a `cols × rows` terminal is a `cols × 2·rows` drawing surface.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::graphics::Framebuffer;
use crate::renderer::Viewport;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::{debug, warn};
use std::io::{self, Stdout, Write};

pub const HALF_BLOCK: char = '▀';

/// Surface size in pixels for a terminal of `cols × rows` cells
pub fn viewport_for_cells(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as usize, rows as usize * 2)
}

/// Current terminal size in cells, if there is a terminal at all
pub fn probe_size() -> Option<(u16, u16)> {
    termsize::get()
        .map(|size| (size.cols, size.rows))
        .or_else(|| terminal::size().ok())
        .filter(|&(cols, rows)| cols > 0 && rows > 0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
}

/// A frame of terminal cells ready to be written out
#[derive(Debug, Clone)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Packs pairs of framebuffer rows into half-block cells
    pub fn from_framebuffer(framebuffer: &Framebuffer) -> Self {
        let cols = framebuffer.width();
        let rows = framebuffer.height() / 2;
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell {
                    ch: HALF_BLOCK,
                    fg: framebuffer.pixel(col, row * 2),
                    bg: framebuffer.pixel(col, row * 2 + 1),
                });
            }
        }
        CellGrid { cols, rows, cells }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Writes `text` starting at `(col, row)`, clipped to the grid
    ///
    /// Without an explicit background the text sits on the average of the
    /// two pixels it covers.
    pub fn put_text(&mut self, col: usize, row: usize, text: &str, fg: Rgba, bg: Option<Rgba>) {
        if row >= self.rows {
            return;
        }
        for (offset, ch) in text.chars().enumerate() {
            let x = col + offset;
            if x >= self.cols {
                break;
            }
            let cell = &mut self.cells[row * self.cols + x];
            let under = cell.fg.lerp(cell.bg, 0.5);
            *cell = Cell {
                ch,
                fg,
                bg: bg.unwrap_or(under),
            };
        }
    }

    /// Text of one row, for tests and logs
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|c| c.ch)
            .collect()
    }
}

fn to_color(color: Rgba) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb { r, g, b }
}

/// Represents the concrete output target the terminal host writes to.
#[derive(Debug)]
enum TerminalTarget {
    Stdout {
        handle: Stdout,
        raw_mode: bool,
        alternate_screen: bool,
        cursor_hidden: bool,
        mouse_capture: bool,
    },
    Buffer(Vec<u8>),
}

impl TerminalTarget {
    /// Each step is recorded as soon as it succeeds, so a failure part way
    /// through still unwinds the earlier steps when the target is dropped.
    fn stdout() -> Result<Self> {
        let mut target = TerminalTarget::Stdout {
            handle: io::stdout(),
            raw_mode: false,
            alternate_screen: false,
            cursor_hidden: false,
            mouse_capture: false,
        };
        if let TerminalTarget::Stdout {
            handle,
            raw_mode,
            alternate_screen,
            cursor_hidden,
            mouse_capture,
        } = &mut target
        {
            terminal::enable_raw_mode()?;
            *raw_mode = true;
            execute!(handle, EnterAlternateScreen)?;
            *alternate_screen = true;
            execute!(handle, Hide)?;
            *cursor_hidden = true;
            execute!(handle, EnableMouseCapture)?;
            *mouse_capture = true;
        }
        Ok(target)
    }

    fn write_grid(&mut self, grid: &CellGrid) -> io::Result<()> {
        match self {
            Self::Stdout { handle, .. } => {
                queue!(handle, BeginSynchronizedUpdate)?;
                for row in 0..grid.rows() {
                    queue!(handle, MoveTo(0, row as u16))?;
                    let mut current: Option<(Rgba, Rgba)> = None;
                    for col in 0..grid.cols() {
                        let cell = grid.cell(col, row);
                        if current != Some((cell.fg, cell.bg)) {
                            queue!(
                                handle,
                                SetForegroundColor(to_color(cell.fg)),
                                SetBackgroundColor(to_color(cell.bg))
                            )?;
                            current = Some((cell.fg, cell.bg));
                        }
                        queue!(handle, Print(cell.ch))?;
                    }
                }
                queue!(handle, ResetColor, EndSynchronizedUpdate)?;
                handle.flush()
            }
            Self::Buffer(buffer) => {
                buffer.clear();
                for row in 0..grid.rows() {
                    if row > 0 {
                        buffer.push(b'\n');
                    }
                    buffer.extend_from_slice(grid.row_text(row).as_bytes());
                }
                Ok(())
            }
        }
    }
}

impl Drop for TerminalTarget {
    fn drop(&mut self) {
        if let TerminalTarget::Stdout {
            handle,
            raw_mode,
            alternate_screen,
            cursor_hidden,
            mouse_capture,
        } = self
        {
            if *mouse_capture {
                let _ = execute!(handle, DisableMouseCapture);
            }
            if *cursor_hidden {
                let _ = execute!(handle, ResetColor, Show);
            }
            if *alternate_screen {
                let _ = execute!(handle, LeaveAlternateScreen);
            }
            if *raw_mode {
                let _ = terminal::disable_raw_mode();
            }
            debug!("terminal restored");
        }
    }
}

/// The drawing surface: either the real terminal or an in-memory buffer
#[derive(Debug)]
pub struct TerminalHost {
    target: TerminalTarget,
    cols: u16,
    rows: u16,
}

impl TerminalHost {
    /// Takes over the terminal: raw mode, alternate screen, mouse capture
    pub fn stdout() -> Result<Self> {
        let (cols, rows) = probe_size().ok_or(Error::SurfaceUnavailable {
            width: 0,
            height: 0,
        })?;
        let target = TerminalTarget::stdout()?;
        Ok(TerminalHost { target, cols, rows })
    }

    /// Headless host that records the glyphs of the last frame
    pub fn buffered(cols: u16, rows: u16) -> Self {
        TerminalHost {
            target: TerminalTarget::Buffer(Vec::new()),
            cols,
            rows,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn viewport(&self) -> Viewport {
        viewport_for_cells(self.cols, self.rows)
    }

    /// Records a new terminal size and returns the matching viewport
    pub fn resize(&mut self, cols: u16, rows: u16) -> Viewport {
        if cols == 0 || rows == 0 {
            warn!("terminal reported an empty size {cols}x{rows}");
        } else {
            self.cols = cols;
            self.rows = rows;
        }
        viewport_for_cells(cols, rows)
    }

    pub fn present(&mut self, grid: &CellGrid) -> Result<()> {
        self.target.write_grid(grid)?;
        Ok(())
    }

    /// Glyphs of the last frame for a buffered host
    pub fn snapshot(&self) -> Option<&[u8]> {
        match &self.target {
            TerminalTarget::Buffer(buffer) => Some(buffer.as_slice()),
            TerminalTarget::Stdout { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_pack_two_pixels() {
        let mut framebuffer = Framebuffer::new(3, 4);
        framebuffer.clear(Rgba::BLACK);
        framebuffer.write(1, 2, 0.5, Rgba::WHITE);
        let grid = CellGrid::from_framebuffer(&framebuffer);
        assert_eq!((grid.cols(), grid.rows()), (3, 2));
        assert_eq!(grid.cell(1, 1).fg, Rgba::WHITE);
        assert_eq!(grid.cell(1, 1).bg, Rgba::BLACK);
        assert_eq!(grid.cell(1, 0).fg, Rgba::BLACK);
    }

    #[test]
    fn text_is_clipped() {
        let framebuffer = Framebuffer::new(5, 2);
        let mut grid = CellGrid::from_framebuffer(&framebuffer);
        grid.put_text(2, 0, "hello", Rgba::WHITE, None);
        grid.put_text(0, 5, "ignored", Rgba::WHITE, None);
        assert_eq!(grid.row_text(0), "▀▀hel");
    }

    #[test]
    fn buffered_host_snapshots_glyphs() {
        let framebuffer = Framebuffer::new(2, 4);
        let mut grid = CellGrid::from_framebuffer(&framebuffer);
        grid.put_text(0, 1, "ok", Rgba::WHITE, Some(Rgba::BLACK));
        let mut host = TerminalHost::buffered(2, 2);
        host.present(&grid).unwrap();
        assert_eq!(host.snapshot().unwrap(), "▀▀\nok".as_bytes());
    }

    #[test]
    fn viewport_doubles_rows() {
        assert_eq!(viewport_for_cells(80, 24), Viewport::new(80, 48));
        let mut host = TerminalHost::buffered(80, 24);
        assert_eq!(host.resize(100, 30), Viewport::new(100, 60));
        assert_eq!(host.size(), (100, 30));
    }
}
