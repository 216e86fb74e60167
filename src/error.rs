//! Startup errors. Every variant ends the process with exit code 1.

use crate::config::ConfigError;
use crate::workers::WorkerKind;
use opclock_events::SelectError;
use opclock_hw::HwError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Error loading config: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SelectError),

    #[error("Error opening hardware: {0}")]
    Hardware(#[source] HwError),

    #[error("Error initialising backlight: {0}")]
    Backlight(#[source] HwError),

    #[error("Error initialising screen: {0}")]
    Display(#[source] HwError),

    #[error("Error creating {kind} thread: {source}")]
    Spawn {
        kind: WorkerKind,
        #[source]
        source: std::io::Error,
    },

    #[error("Error setting up signal handling: {0}")]
    Signals(#[source] std::io::Error),

    #[error("Error creating runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
