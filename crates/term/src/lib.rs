//! Terminal rendering layer.
//!
//! Entities draw into a [`Canvas`], canvases render into any [`RenderTarget`],
//! and a [`Display`] keeps the previous frame so a flush only touches the
//! terminal when something actually changed.
//!
//! Pipeline:
//! - `Canvas::render_at` walks every set cell into a target
//! - `Display` is the target for a frame; it holds an "old" and a "new" canvas
//! - `Display::flush` compares them and forwards changed runs to a
//!   [`TerminalDriver`] (crossterm for real terminals, headless for tests)

pub mod canvas;
pub mod display;
pub mod driver;
pub mod renderer;

pub use tui_scene_types as types;

pub use canvas::{Canvas, Cell, RenderTarget};
pub use display::{Display, FlushStats};
pub use driver::{HeadlessDriver, TerminalDriver};
pub use renderer::CrosstermDriver;
