use super::{Worker, WorkerKind};
use crate::state::SharedState;
use log::{debug, info, warn};
use opclock_events::EventSource;
use std::time::Duration;

/// Polls the active event source and publishes the result.
pub struct EventSourceWorker {
    source: Box<dyn EventSource>,
}

impl EventSourceWorker {
    pub fn new(source: Box<dyn EventSource>) -> Self {
        Self { source }
    }
}

impl Worker for EventSourceWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::EventSource
    }

    fn period(&self) -> Duration {
        self.source.refresh_interval()
    }

    fn step(&mut self, state: &SharedState) {
        match self.source.fetch() {
            Ok(events) => {
                debug!("{} source: {} events", self.source.kind(), events.len());
                if !state.source_ok() {
                    info!("{} event source OK", self.source.kind());
                }
                state.set_events(events);
                state.set_source_health(true);
            }
            Err(e) => {
                // Previous events stay on screen until the next good fetch
                warn!("{} event source failed: {}", self.source.kind(), e);
                state.set_source_health(false);
            }
        }
    }
}
