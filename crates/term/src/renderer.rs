//! CrosstermDriver: the real-terminal [`TerminalDriver`].
//!
//! Writes are queued as crossterm commands into an in-memory buffer and only
//! reach stdout on `flush`, so one frame costs one `write_all`.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color as CtColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::canvas::Cell;
use crate::driver::TerminalDriver;
use crate::types::{Attrs, Color, Size, Style};

pub struct CrosstermDriver {
    stdout: io::Stdout,
    buf: Vec<u8>,
    current_style: Option<Style>,
    /// Where the terminal cursor sits after the last queued glyph, as (col, row).
    cursor: Option<(u16, u16)>,
}

impl CrosstermDriver {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            buf: Vec::with_capacity(64 * 1024),
            current_style: None,
            cursor: None,
        }
    }

    /// Current terminal size, falling back to 80x24 when unknown.
    pub fn terminal_size() -> Size {
        let (w, h) = terminal::size().unwrap_or((80, 24));
        Size::new(w, h)
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        self.buf.clear();
        Ok(())
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalDriver for CrosstermDriver {
    fn write_cell(&mut self, row: u16, col: u16, cell: &Cell) -> Result<()> {
        if self.cursor != Some((col, row)) {
            self.buf.queue(cursor::MoveTo(col, row))?;
        }
        if self.current_style != Some(cell.style) {
            apply_style_into(&mut self.buf, cell.style)?;
            self.current_style = Some(cell.style);
        }
        self.buf.queue(Print(cell.ch))?;
        self.cursor = Some((col.saturating_add(1), row));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.current_style = None;
        self.flush_buf()
    }

    fn clear(&mut self) -> Result<()> {
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.cursor = None;
        Ok(())
    }
}

fn apply_style_into(out: &mut Vec<u8>, style: Style) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(to_crossterm_color(style.fg)))?;
    out.queue(SetBackgroundColor(to_crossterm_color(style.bg)))?;
    for (flag, attr) in ATTRIBUTE_MAP {
        if style.attrs.contains(flag) {
            out.queue(SetAttribute(attr))?;
        }
    }
    Ok(())
}

const ATTRIBUTE_MAP: [(Attrs, Attribute); 8] = [
    (Attrs::BOLD, Attribute::Bold),
    (Attrs::DIM, Attribute::Dim),
    (Attrs::ITALIC, Attribute::Italic),
    (Attrs::UNDERLINE, Attribute::Underlined),
    (Attrs::BLINK, Attribute::SlowBlink),
    (Attrs::REVERSE, Attribute::Reverse),
    (Attrs::HIDDEN, Attribute::Hidden),
    (Attrs::CROSSED_OUT, Attribute::CrossedOut),
];

fn to_crossterm_color(color: Color) -> CtColor {
    match color {
        Color::Reset => CtColor::Reset,
        Color::Black => CtColor::Black,
        Color::DarkGrey => CtColor::DarkGrey,
        Color::Red => CtColor::Red,
        Color::DarkRed => CtColor::DarkRed,
        Color::Green => CtColor::Green,
        Color::DarkGreen => CtColor::DarkGreen,
        Color::Yellow => CtColor::Yellow,
        Color::DarkYellow => CtColor::DarkYellow,
        Color::Blue => CtColor::Blue,
        Color::DarkBlue => CtColor::DarkBlue,
        Color::Magenta => CtColor::Magenta,
        Color::DarkMagenta => CtColor::DarkMagenta,
        Color::Cyan => CtColor::Cyan,
        Color::DarkCyan => CtColor::DarkCyan,
        Color::White => CtColor::White,
        Color::Grey => CtColor::Grey,
        Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
    }
}
