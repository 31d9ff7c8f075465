//! Core types module - shared data structures and constants
//!
//! This crate defines the plain data shared by every other crate in the
//! workspace: geometry, styling, focus policy, entity identity and input
//! events. Nothing here performs I/O.
//!
//! # Coordinates
//!
//! - Positions are signed (`i32`) so entities may live partially or fully
//!   off-screen.
//! - Sizes are unsigned (`u16`), matching terminal dimensions.
//! - Bounds are half-open: a rect at `(x, y)` with size `(w, h)` covers
//!   `x..x+w` and `y..y+h`.
//!
//! # Examples
//!
//! ```
//! use tui_scene_types::{Color, Point, Rect, Size, Style};
//!
//! let a = Rect::new(Point::new(0, 0), Size::new(4, 4));
//! let b = Rect::new(Point::new(3, 3), Size::new(4, 4));
//! assert!(a.overlaps(&b));
//! assert!(!a.overlaps(&b.translate(100, 100)));
//!
//! assert_eq!(Color::from_name("red"), Some(Color::Red));
//! assert_eq!(Style::default().fg, Color::Reset);
//! ```

pub mod event;
pub mod geom;
pub mod style;

pub use event::{Event, Key, KeyPress, Modifiers};
pub use geom::{Point, Rect, Size};
pub use style::{Attrs, Color, Style};

use std::sync::atomic::{AtomicU64, Ordering};

/// Default tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Number of dynamic entities handled per collision worker.
pub const COLLISION_ENTITIES_PER_WORKER: usize = 3;

/// Default upper bound on the collision worker pool.
pub const DEFAULT_MAX_COLLISION_WORKERS: usize = 16;

/// Focus policy of an entity.
///
/// - **None**: never receives focus
/// - **Single**: exclusive, at most one holder per scene
/// - **Multi**: shared, any number of holders per scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusType {
    #[default]
    None,
    Single,
    Multi,
}

impl FocusType {
    /// Parse from a case-insensitive string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(FocusType::None),
            "single" => Some(FocusType::Single),
            "multi" => Some(FocusType::Multi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusType::None => "none",
            FocusType::Single => "single",
            FocusType::Multi => "multi",
        }
    }
}

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Allocate a fresh identifier.
    pub fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
