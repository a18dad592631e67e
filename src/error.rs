//! Engine error taxonomy.
//!
//! Setup-time failures (surface acquisition, shader compilation) are fatal
//! and surfaced immediately. A failed resource fetch aborts the loading
//! scene's startup barrier. Draw-time references to resources that were
//! never loaded are programmer errors and fail loudly.

use std::fmt;

/// Errors produced by the engine.
#[derive(Debug)]
pub enum EngineError {
    /// The rendering surface could not be acquired or the graphics API is
    /// unsupported on this machine.
    SurfaceUnavailable(String),
    /// Fetching the raw bytes for a resource failed.
    Fetch { key: String, reason: String },
    /// A shader module failed validation.
    Compile { label: String, reason: String },
    /// A render pipeline could not be created from compiled modules.
    Link { label: String, reason: String },
    /// `get` was called for a key that is not in the resource map.
    NotLoaded(String),
    /// A renderable referenced a texture or font that is not loaded.
    MissingResource(String),
    /// An operation was issued in the wrong lifecycle state.
    InvalidState(String),
    /// A resource's payload could not be decoded or parsed.
    Parse { key: String, reason: String },
    /// Audio backend or playback failure.
    #[cfg(feature = "audio")]
    Audio(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceUnavailable(reason) => {
                write!(f, "rendering surface unavailable: {reason}")
            }
            EngineError::Fetch { key, reason } => write!(f, "fetch failed for '{key}': {reason}"),
            EngineError::Compile { label, reason } => {
                write!(f, "shader '{label}' failed to compile: {reason}")
            }
            EngineError::Link { label, reason } => {
                write!(f, "pipeline '{label}' failed to link: {reason}")
            }
            EngineError::NotLoaded(key) => write!(f, "resource '{key}' is not loaded"),
            EngineError::MissingResource(key) => {
                write!(f, "draw referenced missing resource '{key}'")
            }
            EngineError::InvalidState(what) => write!(f, "invalid state: {what}"),
            EngineError::Parse { key, reason } => write!(f, "cannot parse '{key}': {reason}"),
            #[cfg(feature = "audio")]
            EngineError::Audio(reason) => write!(f, "audio failure: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}
