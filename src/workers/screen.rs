use super::{Worker, WorkerKind};
use crate::state::SharedState;
use log::warn;
use opclock_hw::{Backbuffer, Display};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

const REFRESH_PERIOD: Duration = Duration::from_millis(50);

/// Display handle shared by the screen worker and the orchestrator,
/// which deinitializes it after every worker is joined.
pub type SharedDisplay = Arc<Mutex<Box<dyn Display>>>;

/// Copies the backbuffer to the display whenever it changed.
pub struct ScreenWorker {
    display: SharedDisplay,
    backbuffer: Arc<Backbuffer>,
    presented: u64,
}

impl ScreenWorker {
    pub fn new(display: SharedDisplay, backbuffer: Arc<Backbuffer>) -> Self {
        Self {
            display,
            backbuffer,
            presented: 0,
        }
    }
}

impl Worker for ScreenWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Screen
    }

    fn period(&self) -> Duration {
        REFRESH_PERIOD
    }

    fn step(&mut self, _state: &SharedState) {
        let Some((revision, frame)) = self.backbuffer.snapshot_if_newer(self.presented) else {
            return;
        };

        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = display.present(&frame) {
            warn!("Failed to present frame {}: {}", revision, e);
        }
        // Failed frames are not retried; the next change triggers a new present.
        self.presented = revision;
    }
}
