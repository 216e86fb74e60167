//! Error types for opclock-hw

use std::path::PathBuf;

/// Hardware access errors
#[derive(Debug, thiserror::Error)]
pub enum HwError {
    #[error("Device error on {path}: {source}")]
    Device {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value {value:?} read from {path}")]
    InvalidValue { path: PathBuf, value: String },

    #[error("Short read from touch device ({0} bytes)")]
    ShortRead(usize),

    #[error("Display not initialized")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HwError {
    pub(crate) fn device(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HwError::Device {
            path: path.into(),
            source,
        }
    }
}
