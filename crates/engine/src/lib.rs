//! Engine: the tick loop tying scenes, the bus and the display together.
//!
//! Each tick runs, in order:
//!
//! 1. focus cycling on Tab (when enabled), otherwise the update step
//! 2. mailbox consumption
//! 3. the collision step, with hits dispatched to both participants
//! 4. drawing every visible scene into the display, then a diffed flush
//!
//! [`Engine::run`] drives ticks from an [`tui_scene_input::EventSource`],
//! synthesizing `Tick` events at the configured interval.

mod config;
mod engine;

pub use config::EngineConfig;
pub use engine::{Engine, StopHandle, TickReport};
