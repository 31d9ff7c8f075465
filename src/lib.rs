//! tui-scene (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so applications depend
//! on a single package: `tui_scene::{types, term, input, bus, core, persist,
//! engine}`.

pub use tui_scene_bus as bus;
pub use tui_scene_core as core;
pub use tui_scene_engine as engine;
pub use tui_scene_input as input;
pub use tui_scene_persist as persist;
pub use tui_scene_term as term;
pub use tui_scene_types as types;
