//! Error type shared by the simulation core and its configuration layer

use thiserror::Error;

/// Errors surfaced by the simulation core
///
/// These signal caller mistakes (bad geometry, malformed input text) and are
/// raised before any state is mutated.
#[derive(Debug, Error)]
pub enum SimError {
    /// Entity size must be finite and strictly positive on both axes
    #[error("entity size must be positive, got ({x}, {y})")]
    InvalidSize { x: f32, y: f32 },
    /// A position or velocity component was NaN or infinite
    #[error("entity {field} must be finite")]
    NonFinite { field: &'static str },
    #[error("malformed level pack: {0}")]
    LevelPack(#[source] serde_json::Error),
    #[error("malformed settings: {0}")]
    Settings(#[source] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
