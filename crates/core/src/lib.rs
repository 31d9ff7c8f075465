//! Scene kernel: entities, scenes, focus and collision.
//!
//! # Per-tick flow
//!
//! 1. [`SceneManager::update`] walks every active scene; each scene updates
//!    its entities in descending p-level order.
//! 2. [`SceneManager::consume`] lets entities drain their mailbox queues.
//! 3. [`SceneManager::collide`] runs the concurrent collision scan per active
//!    scene and dispatches hits to both participants.
//! 4. [`SceneManager::draw`] walks every visible scene; each scene draws its
//!    entities in ascending z-level order into a render target.
//!
//! Entity capabilities are split into small traits ([`Drawable`],
//! [`Updatable`], [`Focusable`], [`Collidable`]) so each algorithm depends
//! only on what it uses. Domain logic plugs in through [`Behavior`].

pub mod behavior;
pub mod collider;
pub mod collision;
pub mod entity;
pub mod error;
pub mod focus;
pub mod manager;
pub mod scene;
pub mod traits;

pub use tui_scene_bus as bus;
pub use tui_scene_term as term;
pub use tui_scene_types as types;

pub use behavior::{Behavior, Hooks, SceneCtx};
pub use collider::{Collider, ColliderShape};
pub use collision::{scan_collisions, worker_count, Collision};
pub use entity::{Entity, EntityBuilder, FocusState};
pub use error::{FocusError, SceneError};
pub use focus::{FocusManager, FocusStore};
pub use manager::SceneManager;
pub use scene::Scene;
pub use traits::{Collidable, Drawable, Focusable, Identified, Updatable};
