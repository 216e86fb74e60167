//! Synthetic event source for running without any backend.

use crate::{Event, EventSource, SourceError, SourceKind};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// (offset from anchor in minutes, length in minutes, title)
const SCHEDULE: [(i64, i64, &str); 4] = [
    (-20, 10, "Demo: Coffee break"),
    (10, 15, "Demo: Standup"),
    (120, 60, "Demo: Design review"),
    (24 * 60, 30, "Demo: Tomorrow's call"),
];

/// Generates a fixed schedule relative to the moment it was created.
/// One event is already over so the "previous event" slot has content.
pub struct DemoSource {
    anchor: DateTime<Utc>,
}

impl DemoSource {
    pub fn new() -> Self {
        Self::with_anchor(Utc::now())
    }

    pub fn with_anchor(anchor: DateTime<Utc>) -> Self {
        Self { anchor }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for DemoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Demo
    }

    fn refresh_interval(&self) -> Duration {
        REFRESH_INTERVAL
    }

    fn fetch(&mut self) -> Result<Vec<Event>, SourceError> {
        Ok(SCHEDULE
            .iter()
            .map(|&(offset, length, title)| {
                let start = self.anchor + ChronoDuration::minutes(offset);
                Event::new(start, Some(start + ChronoDuration::minutes(length)), title)
            })
            .collect())
    }
}
