//! State shared between the main thread and every worker.

use crate::config::Config;
use opclock_events::Event;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Built once at startup and handed to workers as `Arc<SharedState>`.
pub struct SharedState {
    config: Config,
    /// Written only by the event source worker.
    events: Mutex<Vec<Event>>,
    events_source_ok: AtomicBool,
    /// Only ever goes false -> true.
    app_exit: AtomicBool,
}

impl SharedState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            events: Mutex::new(Vec::new()),
            events_source_ok: AtomicBool::new(false),
            app_exit: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ask every loop to stop. Returns true for the call that flipped the flag.
    ///
    /// A single atomic swap: no allocation, no locking, so it is fine to call
    /// from a signal path.
    #[inline]
    pub fn request_shutdown(&self) -> bool {
        !self.app_exit.swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.app_exit.load(Ordering::Acquire)
    }

    /// Replace the whole event list.
    pub fn set_events(&self, events: Vec<Event>) {
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = events;
    }

    /// Copy of the current event list.
    pub fn read_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[inline]
    pub fn set_source_health(&self, ok: bool) {
        self.events_source_ok.store(ok, Ordering::Release);
    }

    #[inline]
    pub fn source_ok(&self) -> bool {
        self.events_source_ok.load(Ordering::Acquire)
    }
}
