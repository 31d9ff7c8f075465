//! Canvas and cell types for terminal rendering.

use crate::types::{Point, Rect, Size, Style};

/// A single terminal cell.
///
/// `Cell` is `Copy`: every read and write hands out an independent value, so
/// two positions never alias the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// Anything a canvas can be rendered into.
pub trait RenderTarget {
    /// Write `cell` at `at`. Returns `false` when `at` is outside the target.
    fn render_cell_at(&mut self, at: Point, cell: Cell) -> bool;
}

/// 2D grid of optional styled cells.
///
/// Storage is row-major and flat, so all rows always have the same length.
/// Unset slots are transparent when rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    /// A `size` canvas with every slot unset.
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            cells: vec![None; size.area()],
        }
    }

    /// A `size` canvas with every slot set to `cell`.
    pub fn filled(size: Size, cell: Cell) -> Self {
        Self {
            width: size.width,
            height: size.height,
            cells: vec![Some(cell); size.area()],
        }
    }

    /// Build a canvas from literal text, one row per line.
    ///
    /// Width is the longest line in chars; shorter lines leave trailing slots
    /// unset.
    pub fn from_text(text: &str, style: Style) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);

        let mut canvas = Canvas::new(Size::new(width, height));
        for (y, line) in lines.iter().enumerate().take(height as usize) {
            canvas.write_str(Point::new(0, y as i32), line, style);
        }
        canvas
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline(always)]
    fn idx(&self, at: Point) -> Option<usize> {
        if at.x < 0 || at.y < 0 || at.x >= i32::from(self.width) || at.y >= i32::from(self.height) {
            return None;
        }
        Some((at.y as usize) * (self.width as usize) + (at.x as usize))
    }

    /// Row `y` as a slice of slots.
    pub fn row(&self, y: u16) -> Option<&[Option<Cell>]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * (self.width as usize);
        Some(&self.cells[start..start + self.width as usize])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Cell>]> {
        // chunks() panics on zero, and a zero-width canvas has no cells anyway.
        self.cells.chunks(usize::from(self.width.max(1)))
    }

    /// The cell at `at`, or `None` when out of bounds or unset.
    pub fn get_cell_at(&self, at: Point) -> Option<Cell> {
        self.idx(at).and_then(|i| self.cells[i])
    }

    /// Store a copy of `cell` at `at`. Returns `false` when out of bounds.
    pub fn set_cell_at(&mut self, at: Point, cell: Cell) -> bool {
        match self.idx(at) {
            Some(i) => {
                self.cells[i] = Some(cell);
                true
            }
            None => false,
        }
    }

    /// Unset the slot at `at`. Returns `false` when out of bounds.
    pub fn clear_cell_at(&mut self, at: Point) -> bool {
        match self.idx(at) {
            Some(i) => {
                self.cells[i] = None;
                true
            }
            None => false,
        }
    }

    /// Set every slot to a copy of `cell`.
    pub fn fill_with_cell(&mut self, cell: Cell) {
        self.cells.fill(Some(cell));
    }

    /// Unset every slot.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Copy `src` cell by cell.
    ///
    /// Only happens when both sizes match exactly; otherwise this is a no-op
    /// and returns `false`.
    pub fn copy_from(&mut self, src: &Canvas) -> bool {
        if self.size() != src.size() {
            return false;
        }
        self.cells.copy_from_slice(&src.cells);
        true
    }

    /// Resize the canvas. Content is discarded when the size changes.
    pub fn resize(&mut self, size: Size) {
        if self.size() == size {
            return;
        }
        self.width = size.width;
        self.height = size.height;
        self.cells.clear();
        self.cells.resize(size.area(), None);
    }

    /// Write `s` left to right from `at`, clipped at the right edge.
    ///
    /// Returns the number of cells written.
    pub fn write_str(&mut self, at: Point, s: &str, style: Style) -> usize {
        let mut written = 0;
        for (dx, ch) in s.chars().enumerate() {
            let p = at.offset(dx as i32, 0);
            if p.x >= i32::from(self.width) {
                break;
            }
            if self.set_cell_at(p, Cell::new(ch, style)) {
                written += 1;
            }
        }
        written
    }

    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        for y in rect.origin.y..rect.bottom() {
            for x in rect.origin.x..rect.right() {
                self.set_cell_at(Point::new(x, y), cell);
            }
        }
    }

    /// If every slot holds the same cell, that cell.
    pub fn uniform_cell(&self) -> Option<Cell> {
        let first = (*self.cells.first()?)?;
        self.cells
            .iter()
            .all(|c| *c == Some(first))
            .then_some(first)
    }

    /// Glyphs of row `y`, unset slots as spaces.
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y)
            .map(|row| row.iter().map(|c| c.map_or(' ', |c| c.ch)).collect())
    }

    /// Render every set cell into `target` at its own coordinates.
    pub fn render(&self, target: &mut dyn RenderTarget) -> usize {
        self.render_at(Point::default(), target)
    }

    /// Render every set cell into `target`, offset by `origin`.
    ///
    /// Returns how many cells the target accepted.
    pub fn render_at(&self, origin: Point, target: &mut dyn RenderTarget) -> usize {
        let mut accepted = 0;
        for (y, row) in self.rows().enumerate() {
            for (x, slot) in row.iter().enumerate() {
                if let Some(cell) = slot {
                    if target.render_cell_at(origin.offset(x as i32, y as i32), *cell) {
                        accepted += 1;
                    }
                }
            }
        }
        accepted
    }
}

impl RenderTarget for Canvas {
    fn render_cell_at(&mut self, at: Point, cell: Cell) -> bool {
        self.set_cell_at(at, cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attrs, Color};

    fn red(ch: char) -> Cell {
        Cell::new(ch, Style::fg(Color::Red))
    }

    #[test]
    fn new_canvas_is_unset() {
        let c = Canvas::new(Size::new(3, 2));
        assert_eq!(c.width(), 3);
        assert_eq!(c.height(), 2);
        assert!(c.rows().all(|row| row.len() == 3 && row.iter().all(Option::is_none)));
    }

    #[test]
    fn bounds_are_half_open() {
        let mut c = Canvas::new(Size::new(3, 2));
        assert!(c.set_cell_at(Point::new(0, 0), red('a')));
        assert!(c.set_cell_at(Point::new(2, 1), red('b')));
        assert!(!c.set_cell_at(Point::new(3, 0), red('x')));
        assert!(!c.set_cell_at(Point::new(0, 2), red('x')));
        assert!(!c.set_cell_at(Point::new(-1, 0), red('x')));

        assert_eq!(c.get_cell_at(Point::new(2, 1)), Some(red('b')));
        assert_eq!(c.get_cell_at(Point::new(3, 1)), None);
        assert_eq!(c.get_cell_at(Point::new(0, -1)), None);
    }

    #[test]
    fn copy_from_requires_matching_size() {
        let mut src = Canvas::new(Size::new(2, 2));
        src.fill_with_cell(red('z'));

        let mut same = Canvas::new(Size::new(2, 2));
        assert!(same.copy_from(&src));
        assert_eq!(same, src);

        let mut other = Canvas::new(Size::new(3, 2));
        assert!(!other.copy_from(&src));
        assert_eq!(other, Canvas::new(Size::new(3, 2)));
    }

    #[test]
    fn fill_then_mutate_does_not_alias() {
        let cell = red('o');
        let mut c = Canvas::new(Size::new(2, 2));
        c.fill_with_cell(cell);

        let mut bold = cell;
        bold.style.attrs = Attrs::BOLD;
        c.set_cell_at(Point::new(0, 0), bold);

        assert_eq!(c.get_cell_at(Point::new(1, 1)), Some(cell));
        assert_eq!(c.get_cell_at(Point::new(0, 0)), Some(bold));
    }

    #[test]
    fn from_text_pads_short_lines() {
        let c = Canvas::from_text("ab\nc", Style::default());
        assert_eq!(c.size(), Size::new(2, 2));
        assert_eq!(c.row_text(0).as_deref(), Some("ab"));
        assert_eq!(c.row_text(1).as_deref(), Some("c "));
        assert_eq!(c.get_cell_at(Point::new(1, 1)), None);
    }

    #[test]
    fn write_str_clips_at_edge() {
        let mut c = Canvas::new(Size::new(3, 1));
        assert_eq!(c.write_str(Point::new(1, 0), "hello", Style::default()), 2);
        assert_eq!(c.row_text(0).as_deref(), Some(" he"));
    }

    #[test]
    fn render_at_offsets_and_skips_unset() {
        let mut src = Canvas::new(Size::new(2, 1));
        src.set_cell_at(Point::new(1, 0), red('x'));

        let mut dst = Canvas::new(Size::new(4, 4));
        assert_eq!(src.render_at(Point::new(2, 3), &mut dst), 1);
        assert_eq!(dst.get_cell_at(Point::new(3, 3)), Some(red('x')));
        assert_eq!(dst.get_cell_at(Point::new(2, 3)), None);

        // Fully off-target renders nothing.
        assert_eq!(src.render_at(Point::new(10, 10), &mut dst), 0);
    }

    #[test]
    fn uniform_cell_detection() {
        let mut c = Canvas::filled(Size::new(2, 2), red('#'));
        assert_eq!(c.uniform_cell(), Some(red('#')));
        c.clear_cell_at(Point::new(0, 1));
        assert_eq!(c.uniform_cell(), None);
        assert_eq!(Canvas::new(Size::new(0, 0)).uniform_cell(), None);
    }
}
