//! Terminal input module (engine-facing).
//!
//! This crate is independent of the scene kernel. It maps `crossterm` events
//! into [`crate::types::Event`] and exposes them through the [`EventSource`]
//! trait, with a real-terminal source and a scripted one for headless runs.

pub mod map;
pub mod source;

pub use tui_scene_types as types;

pub use map::{map_event, map_key_event};
pub use source::{CrosstermEvents, EventSource, ScriptedEvents};
