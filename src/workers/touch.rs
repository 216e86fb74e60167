use super::{Worker, WorkerKind};
use crate::state::SharedState;
use log::{info, warn};
use opclock_hw::{Backlight, TouchEvent, TouchInput};
use std::time::Duration;

const POLL_PERIOD: Duration = Duration::from_millis(50);

/// Toggles backlight power on every touch press.
pub struct TouchWorker {
    touch: Box<dyn TouchInput>,
    backlight: Box<dyn Backlight>,
    /// Set while polls keep failing, so the error is logged once.
    failing: bool,
}

impl TouchWorker {
    pub fn new(touch: Box<dyn TouchInput>, backlight: Box<dyn Backlight>) -> Self {
        Self {
            touch,
            backlight,
            failing: false,
        }
    }

    fn toggle_backlight(&mut self) {
        let on = !self.backlight.is_powered();
        match self.backlight.power(on) {
            Ok(()) => info!("Touch: backlight {}", if on { "on" } else { "off" }),
            Err(e) => warn!("Touch: failed to switch backlight: {}", e),
        }
    }
}

impl Worker for TouchWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Touch
    }

    fn period(&self) -> Duration {
        POLL_PERIOD
    }

    fn step(&mut self, _state: &SharedState) {
        match self.touch.poll() {
            Ok(event) => {
                if self.failing {
                    info!("Touch input recovered");
                    self.failing = false;
                }
                if event == Some(TouchEvent::Press) {
                    self.toggle_backlight();
                }
            }
            Err(e) => {
                if !self.failing {
                    warn!("Touch poll failed: {}", e);
                    self.failing = true;
                }
            }
        }
    }

    /// Leave the panel lit for whatever runs next.
    fn release(&mut self) {
        if !self.backlight.is_powered() {
            if let Err(e) = self.backlight.power(true) {
                warn!("Failed to restore backlight power: {}", e);
            }
        }
    }
}
