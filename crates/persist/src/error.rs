use thiserror::Error;

/// Errors raised while loading or saving persisted entities.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown entity class '{0}'")]
    UnknownClass(String),

    #[error("unknown color '{color}' for entity '{entity}'")]
    UnknownColor { entity: String, color: String },
}
