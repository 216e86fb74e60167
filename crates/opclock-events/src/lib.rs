//! opclock-events - Event data for the clock display
//!
//! Features:
//! - Timestamped `Event` records, ordered by start time
//! - One `EventSource` trait over every backend
//! - One-shot backend selection from configuration

pub mod demo;
pub mod error;
pub mod http;
pub mod types;

pub use demo::DemoSource;
pub use error::{SelectError, SourceError};
pub use http::HttpSource;
pub use types::{Event, SourceKind, split_at};

use log::info;
use std::path::PathBuf;
use std::time::Duration;

/// A backend producing the full current list of events on each fetch.
pub trait EventSource: Send {
    fn kind(&self) -> SourceKind;

    /// How long the worker waits between fetches.
    fn refresh_interval(&self) -> Duration;

    /// Fetch a fresh snapshot, sorted by start time.
    fn fetch(&mut self) -> Result<Vec<Event>, SourceError>;
}

/// Everything needed to build any of the backends.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub file_path: Option<PathBuf>,
    pub http_url: Option<String>,
    pub http_interval: Duration,
    pub http_timeout: Duration,
}

impl SourceConfig {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            file_path: None,
            http_url: None,
            http_interval: http::DEFAULT_INTERVAL,
            http_timeout: http::DEFAULT_TIMEOUT,
        }
    }
}

/// Pick the backend for `config.kind`. Called once at startup.
pub fn select(config: &SourceConfig) -> Result<Box<dyn EventSource>, SelectError> {
    match config.kind {
        SourceKind::Demo => {
            info!("Using demo event source");
            Ok(Box::new(DemoSource::new()))
        }
        SourceKind::File => Err(SelectError::Unimplemented(SourceKind::File)),
        SourceKind::Http => {
            let url = config
                .http_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(SelectError::MissingParameter {
                    kind: SourceKind::Http,
                    key: "event_source_http_url",
                })?;
            info!("Using HTTP event source: {}", url);
            Ok(Box::new(HttpSource::new(
                url,
                config.http_interval,
                config.http_timeout,
            )))
        }
    }
}
