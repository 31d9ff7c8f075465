//! Input events, independent of any terminal backend.

use bitflags::bitflags;

use crate::geom::Size;

bitflags! {
    /// Keyboard modifiers held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
    }
}

/// A logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyPress {
    pub const fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::empty(),
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            mods: Modifiers::CTRL,
        }
    }
}

/// An input event delivered to scenes once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyPress),
    Resize(Size),
    /// No input arrived before the tick deadline.
    Tick,
}

impl Event {
    pub fn key(key: Key) -> Self {
        Event::Key(KeyPress::plain(key))
    }

    pub fn as_key(&self) -> Option<&KeyPress> {
        match self {
            Event::Key(k) => Some(k),
            _ => None,
        }
    }

    /// Ctrl-C, the unconditional quit chord.
    pub fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Event::Key(KeyPress { key: Key::Char('c') | Key::Char('C'), mods })
                if mods.contains(Modifiers::CTRL)
        )
    }
}
