// error.rs - Engine failure taxonomy
//
// None of these ever reach the host as an exception. The lifecycle layer
// logs them and degrades to "nothing running".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("unknown effect type {0:?}")]
    UnknownEffect(String),
    #[error("invalid engine options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    #[error("viewport has no area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
}
