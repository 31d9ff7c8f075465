//! Colors, text attributes and cell styles.

use bitflags::bitflags;

/// Terminal color.
///
/// Named variants follow the 16-color ANSI palette. `Rgb` is 24-bit color and
/// is named `#rrggbb` in persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Reset,
    Black,
    DarkGrey,
    Red,
    DarkRed,
    Green,
    DarkGreen,
    Yellow,
    DarkYellow,
    Blue,
    DarkBlue,
    Magenta,
    DarkMagenta,
    Cyan,
    DarkCyan,
    White,
    Grey,
    Rgb(u8, u8, u8),
}

const NAMED: [(&str, Color); 17] = [
    ("reset", Color::Reset),
    ("black", Color::Black),
    ("darkgrey", Color::DarkGrey),
    ("red", Color::Red),
    ("darkred", Color::DarkRed),
    ("green", Color::Green),
    ("darkgreen", Color::DarkGreen),
    ("yellow", Color::Yellow),
    ("darkyellow", Color::DarkYellow),
    ("blue", Color::Blue),
    ("darkblue", Color::DarkBlue),
    ("magenta", Color::Magenta),
    ("darkmagenta", Color::DarkMagenta),
    ("cyan", Color::Cyan),
    ("darkcyan", Color::DarkCyan),
    ("white", Color::White),
    ("grey", Color::Grey),
];

impl Color {
    /// Parse a color name (case-insensitive; `_`, `-` and spaces ignored).
    ///
    /// Accepts the palette names, `default` as an alias of `reset`, `gray`
    /// spellings, and `#rrggbb`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(hex) = name.strip_prefix('#') {
            return parse_hex(hex);
        }

        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect::<String>()
            .replace("gray", "grey");

        if normalized == "default" {
            return Some(Color::Reset);
        }
        NAMED
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
    }

    /// Canonical name, the inverse of [`Color::from_name`].
    pub fn name(&self) -> String {
        if let Color::Rgb(r, g, b) = self {
            return format!("#{r:02x}{g:02x}{b:02x}");
        }
        NAMED
            .iter()
            .find(|(_, c)| c == self)
            .map(|(n, _)| (*n).to_string())
            .unwrap_or_default()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

bitflags! {
    /// Text attributes. Bit values are stable; they are persisted as-is.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u16 {
        const BOLD = 1;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const REVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const CROSSED_OUT = 1 << 7;
    }
}

/// Per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    pub const fn new(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self { fg, bg, attrs }
    }

    pub const fn fg(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Reset,
            attrs: Attrs::empty(),
        }
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = attrs;
        self
    }
}
