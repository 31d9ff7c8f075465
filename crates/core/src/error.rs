//! Kernel errors.
//!
//! Everything here is returned to the caller; none of it is fatal.

use crate::types::EntityId;

/// Focus registration and transition errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("scene '{0}' not found")]
    SceneNotFound(String),

    /// The entity has focus disabled and cannot be (un)registered.
    #[error("focus disabled for entity {0}")]
    FocusDisabled(EntityId),
}

/// Scene and scene manager errors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene '{0}' not found")]
    SceneNotFound(String),

    #[error("scene '{0}' already exists")]
    DuplicateScene(String),

    #[error("entity {id} not found in scene '{scene}'")]
    EntityNotFound { scene: String, id: EntityId },

    #[error(transparent)]
    Focus(#[from] FocusError),
}
