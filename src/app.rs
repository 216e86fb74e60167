//! Startup and shutdown sequencing.
//!
//! Startup is strictly ordered and every step is fatal:
//! source selection, hardware bring-up, then Screen, Touch, Clock and
//! EventSource workers. Shutdown runs the same list backwards and releases
//! the display last.

use crate::config::Config;
use crate::error::StartupError;
use crate::signals::ShutdownSignals;
use crate::state::SharedState;
use crate::status;
use crate::workers::screen::SharedDisplay;
use crate::workers::{
    ClockWorker, EventSourceWorker, ScreenWorker, ShutdownReport, TouchWorker, Worker, WorkerKind,
    WorkerSet,
};
use log::{error, info};
use opclock_events::EventSource;
use opclock_hw::{Backbuffer, Backlight, Hardware, HardwareConfig, HwError, TouchInput};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

const STATUS_TICK: Duration = Duration::from_millis(100);

pub struct App {
    state: Arc<SharedState>,
    backbuffer: Arc<Backbuffer>,
    display: SharedDisplay,
    workers: WorkerSet,
}

impl App {
    /// Bring up real hardware and every worker.
    pub fn start(config: Config) -> Result<Self, StartupError> {
        Self::start_with(config, Hardware::from_config)
    }

    /// Same as `start`, with the hardware backends supplied by `open_hardware`.
    pub fn start_with<F>(config: Config, open_hardware: F) -> Result<Self, StartupError>
    where
        F: FnOnce(&HardwareConfig) -> Result<Hardware, HwError>,
    {
        // Resolved before any hardware is touched so an unusable source
        // leaves nothing half started.
        let source = opclock_events::select(&config.source_config())?;

        let Hardware {
            mut backlight,
            touch,
            mut display,
        } = open_hardware(&config.hardware_config()).map_err(StartupError::Hardware)?;

        backlight.power(true).map_err(StartupError::Backlight)?;
        backlight
            .set_level(config.backlight_level)
            .map_err(StartupError::Backlight)?;
        display.init().map_err(StartupError::Display)?;

        let mut app = App {
            state: Arc::new(SharedState::new(config)),
            backbuffer: Arc::new(Backbuffer::new()),
            display: Arc::new(Mutex::new(display)),
            workers: WorkerSet::new(),
        };

        if let Err(e) = app.spawn_workers(touch, backlight, source) {
            app.shutdown();
            return Err(e);
        }

        info!("Started workers: {:?}", app.workers.kinds());
        Ok(app)
    }

    fn spawn_workers(
        &mut self,
        touch: Box<dyn TouchInput>,
        backlight: Box<dyn Backlight>,
        source: Box<dyn EventSource>,
    ) -> Result<(), StartupError> {
        self.spawn(ScreenWorker::new(
            self.display.clone(),
            self.backbuffer.clone(),
        ))?;
        self.spawn(TouchWorker::new(touch, backlight))?;
        self.spawn(ClockWorker::new(self.backbuffer.clone()))?;
        self.spawn(EventSourceWorker::new(source))?;
        Ok(())
    }

    fn spawn<W: Worker>(&mut self, worker: W) -> Result<(), StartupError> {
        let kind = worker.kind();
        self.workers
            .spawn(worker, &self.state)
            .map_err(|source| StartupError::Spawn { kind, source })
    }

    pub fn worker_kinds(&self) -> Vec<WorkerKind> {
        self.workers.kinds()
    }

    /// Main-thread loop: draw the status labels until shutdown is requested.
    ///
    /// Shutdown comes from a signal, from another thread calling
    /// `request_shutdown`, or from a worker thread ending on its own.
    pub async fn run_status_loop(&self, mut signals: Option<ShutdownSignals>) {
        let source_label = status::source_label(self.state.config().event_source);
        self.backbuffer
            .update(move |frame| frame.source_label = source_label);

        let mut tick = tokio::time::interval(STATUS_TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while !self.state.exit_requested() {
            let ok = self.state.source_ok();
            self.backbuffer.update(|frame| {
                frame.status_label = Some(status::status_label(ok).to_string());
                frame.status_ok = ok;
            });

            if let Some(kind) = self.workers.first_finished() {
                error!("{} worker exited unexpectedly, shutting down", kind);
                self.state.request_shutdown();
                break;
            }

            tokio::select! {
                _ = tick.tick() => {}
                name = next_signal(&mut signals) => {
                    info!("Got {}..", name);
                    self.state.request_shutdown();
                }
            }
        }
    }

    /// Stop every worker (newest first), then release the display.
    pub fn shutdown(self) -> ShutdownReport {
        let report = self.workers.shutdown(&self.state);

        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = display.deinit() {
            error!("Error releasing display: {}", e);
        }
        report
    }
}

async fn next_signal(signals: &mut Option<ShutdownSignals>) -> &'static str {
    match signals {
        Some(signals) => signals.recv().await,
        None => std::future::pending().await,
    }
}
