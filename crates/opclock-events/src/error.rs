//! Error types for opclock-events

use crate::SourceKind;

/// A single failed fetch. Never fatal; the worker retries next cycle.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("HTTP transport error: {0}")]
    Transport(Box<ureq::Transport>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid event document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Backend selection failure. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("{0} event source not yet implemented")]
    Unimplemented(SourceKind),

    #[error("{kind} event source requires `{key}`")]
    MissingParameter { kind: SourceKind, key: &'static str },
}
