//! Display: the double-buffered adapter between canvases and a driver.
//!
//! Scenes draw into the "new" canvas. On flush, the display compares it
//! against the "old" canvas (the last frame the terminal received) and only
//! talks to the driver when they differ or a full redraw is forced. The
//! in-memory comparison is O(width × height); terminal writes are far more
//! expensive than that.

use anyhow::Result;

use crate::canvas::{Canvas, Cell, RenderTarget};
use crate::driver::TerminalDriver;
use crate::types::{Point, Size};

/// What a flush did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushStats {
    /// Cells sent to the driver.
    pub cells_written: usize,
    /// Whether the whole screen was redrawn.
    pub full: bool,
}

impl FlushStats {
    pub fn wrote(&self) -> bool {
        self.full || self.cells_written > 0
    }
}

pub struct Display<D: TerminalDriver> {
    driver: D,
    old: Canvas,
    new: Canvas,
    needs_full: bool,
}

impl<D: TerminalDriver> Display<D> {
    /// The first flush is always a full redraw.
    pub fn new(driver: D, size: Size) -> Self {
        Self {
            driver,
            old: Canvas::new(size),
            new: Canvas::new(size),
            needs_full: true,
        }
    }

    pub fn size(&self) -> Size {
        self.new.size()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// The frame being composed.
    pub fn canvas(&self) -> &Canvas {
        &self.new
    }

    /// The frame the terminal last received.
    pub fn last_frame(&self) -> &Canvas {
        &self.old
    }

    pub fn get_cell_at(&self, at: Point) -> Option<Cell> {
        self.new.get_cell_at(at)
    }

    pub fn set_cell_at(&mut self, at: Point, cell: Cell) -> bool {
        self.new.set_cell_at(at, cell)
    }

    /// Start composing a frame from a blank screen.
    pub fn begin_frame(&mut self) {
        self.new.clear();
    }

    /// Resize both buffers; the next flush redraws everything.
    pub fn resize(&mut self, size: Size) {
        if size == self.size() {
            return;
        }
        tracing::debug!(width = size.width, height = size.height, "display resized");
        self.driver.resize(size);
        self.old.resize(size);
        self.new.resize(size);
        self.needs_full = true;
    }

    /// Force the next flush to be a full redraw.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    /// Push the composed frame to the driver.
    ///
    /// Writes nothing unless `force` is set, a full redraw is pending, or the
    /// frame differs from the last one. Afterwards old := new.
    pub fn flush(&mut self, force: bool) -> Result<FlushStats> {
        let full = force || self.needs_full;
        if !full && self.old == self.new {
            return Ok(FlushStats::default());
        }

        let mut stats = FlushStats {
            cells_written: 0,
            full,
        };

        if full {
            self.driver.clear()?;
            for y in 0..self.new.height() {
                stats.cells_written += write_run(&mut self.driver, &self.new, 0, y, self.new.width())?;
            }
        } else {
            let (old, new, driver) = (&self.old, &self.new, &mut self.driver);
            for_each_changed_run(old, new, |x, y, len| {
                stats.cells_written += write_run(driver, new, x, y, len)?;
                Ok(())
            })?;
        }

        self.driver.flush()?;
        self.old.copy_from(&self.new);
        self.needs_full = false;

        tracing::trace!(cells = stats.cells_written, full = stats.full, "display flushed");
        Ok(stats)
    }
}

impl<D: TerminalDriver> RenderTarget for Display<D> {
    fn render_cell_at(&mut self, at: Point, cell: Cell) -> bool {
        self.set_cell_at(at, cell)
    }
}

fn write_run<D: TerminalDriver>(driver: &mut D, canvas: &Canvas, x: u16, y: u16, len: u16) -> Result<usize> {
    let Some(row) = canvas.row(y) else {
        return Ok(0);
    };
    let start = x as usize;
    let end = (start + len as usize).min(row.len());
    for (col, slot) in row[start..end].iter().enumerate() {
        let cell = slot.unwrap_or_default();
        driver.write_cell(y, x + col as u16, &cell)?;
    }
    Ok(end - start)
}

/// Call `f(x, y, len)` for each horizontal run of cells that differ between
/// two equally sized canvases. Differently sized canvases are dirty everywhere.
fn for_each_changed_run(
    prev: &Canvas,
    next: &Canvas,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.size() != next.size() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    for y in 0..next.height() {
        let (Some(a), Some(b)) = (prev.row(y), next.row(y)) else {
            continue;
        };
        let w = b.len();
        let mut x = 0;
        while x < w {
            if a[x] == b[x] {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && a[x] != b[x] {
                x += 1;
            }
            f(start as u16, y, (x - start) as u16)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::HeadlessDriver;
    use crate::types::Style;

    fn display(w: u16, h: u16) -> Display<HeadlessDriver> {
        Display::new(HeadlessDriver::new(Size::new(w, h)), Size::new(w, h))
    }

    #[test]
    fn first_flush_is_full() {
        let mut d = display(4, 2);
        let stats = d.flush(false).unwrap();
        assert!(stats.full);
        assert_eq!(stats.cells_written, 8);
        assert_eq!(d.driver().clears(), 1);
    }

    #[test]
    fn unchanged_frame_skips_driver() {
        let mut d = display(4, 2);
        d.flush(false).unwrap();
        d.driver_mut().reset_counters();

        let stats = d.flush(false).unwrap();
        assert!(!stats.wrote());
        assert_eq!(d.driver().writes(), 0);
        assert_eq!(d.driver().flushes(), 0);
    }

    #[test]
    fn changed_cells_are_written_as_runs() {
        let mut d = display(5, 2);
        d.flush(false).unwrap();
        d.driver_mut().reset_counters();

        d.set_cell_at(Point::new(1, 1), Cell::new('a', Style::default()));
        d.set_cell_at(Point::new(2, 1), Cell::new('b', Style::default()));
        let stats = d.flush(false).unwrap();

        assert!(!stats.full);
        assert_eq!(stats.cells_written, 2);
        assert_eq!(d.driver().writes(), 2);
        assert_eq!(d.driver().row_text(1), " ab  ");
        assert_eq!(d.last_frame(), d.canvas());
    }

    #[test]
    fn forced_flush_redraws_everything() {
        let mut d = display(3, 3);
        d.flush(false).unwrap();
        let stats = d.flush(true).unwrap();
        assert!(stats.full);
        assert_eq!(stats.cells_written, 9);
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut d = display(3, 3);
        d.flush(false).unwrap();
        d.resize(Size::new(4, 1));
        assert_eq!(d.driver().size(), Size::new(4, 1));
        let stats = d.flush(false).unwrap();
        assert!(stats.full);
        assert_eq!(stats.cells_written, 4);
    }

    #[test]
    fn changed_run_iterator_coalesces_adjacent_cells() {
        let style = Style::default();
        let a = Canvas::new(Size::new(5, 1));
        let mut b = Canvas::new(Size::new(5, 1));
        for x in 1..=3 {
            b.set_cell_at(Point::new(x, 0), Cell::new('X', style));
        }

        let mut runs = Vec::new();
        for_each_changed_run(&a, &b, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        assert_eq!(runs, vec![(1, 0, 3)]);
    }
}
