//! Terminal driver seam.

use anyhow::Result;

use crate::canvas::Cell;
use crate::types::Size;

/// The physical side of a [`crate::Display`].
///
/// Drivers may buffer writes; nothing is guaranteed visible before `flush`.
pub trait TerminalDriver {
    /// Write one glyph with its style at `(row, col)`.
    fn write_cell(&mut self, row: u16, col: u16, cell: &Cell) -> Result<()>;

    /// Push buffered writes to the terminal.
    fn flush(&mut self) -> Result<()>;

    /// Clear the whole screen. Called before a forced full redraw.
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    /// The screen changed size. Terminals track this themselves.
    fn resize(&mut self, _size: Size) {}
}

/// In-memory driver for tests and headless runs.
///
/// Keeps a screen image plus counters of how much work each flush caused.
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    size: Size,
    screen: Vec<Cell>,
    writes: usize,
    flushes: usize,
    clears: usize,
}

impl HeadlessDriver {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            screen: vec![Cell::default(); size.area()],
            writes: 0,
            flushes: 0,
            clears: 0,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.screen = vec![Cell::default(); size.area()];
    }

    /// Total `write_cell` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn reset_counters(&mut self) {
        self.writes = 0;
        self.flushes = 0;
        self.clears = 0;
    }

    pub fn cell_at(&self, row: u16, col: u16) -> Option<Cell> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        Some(self.screen[(row as usize) * (self.size.width as usize) + col as usize])
    }

    pub fn glyph_at(&self, row: u16, col: u16) -> Option<char> {
        self.cell_at(row, col).map(|c| c.ch)
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.size.width)
            .filter_map(|col| self.glyph_at(row, col))
            .collect()
    }
}

impl TerminalDriver for HeadlessDriver {
    fn write_cell(&mut self, row: u16, col: u16, cell: &Cell) -> Result<()> {
        self.writes += 1;
        if row < self.size.height && col < self.size.width {
            self.screen[(row as usize) * (self.size.width as usize) + col as usize] = *cell;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.clears += 1;
        self.screen.fill(Cell::default());
        Ok(())
    }

    fn resize(&mut self, size: Size) {
        HeadlessDriver::resize(self, size);
    }
}
