//! Error types for the core library.
//!
//! The overlay is decorative: none of these ever reach the end user. They
//! exist so callers can log a precise reason before falling back to
//! defaults.

use std::path::PathBuf;

/// Failures while locating, reading or watching the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no platform configuration directory available")]
    NoConfigDir,

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Errors a frame backend can report while rendering.
///
/// Anything returned here is fatal to the renderer instance: the loop halts
/// and the host has to re-mount to recover.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("rendering context lost: {0}")]
    ContextLost(String),

    #[error("GPU out of memory")]
    OutOfMemory,
}
