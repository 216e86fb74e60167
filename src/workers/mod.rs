//! Long-running hardware and data workers.
//!
//! Each worker gets its own OS thread and a current-thread tokio runtime used
//! only for the interruptible sleep between work units.
//!
//! - `screen` - Presents the backbuffer on the display
//! - `touch` - Polls the touch panel, toggles the backlight
//! - `clock` - Draws time, date and events into the backbuffer
//! - `events` - Refreshes the shared event list from the active source

pub mod clock;
pub mod events;
pub mod screen;
pub mod touch;

pub use clock::ClockWorker;
pub use events::EventSourceWorker;
pub use screen::ScreenWorker;
pub use touch::TouchWorker;

use crate::state::SharedState;
use log::{error, info, warn};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    Screen,
    Touch,
    Clock,
    EventSource,
}

impl WorkerKind {
    pub fn thread_name(&self) -> &'static str {
        match self {
            WorkerKind::Screen => "Screen",
            WorkerKind::Touch => "Touch",
            WorkerKind::Clock => "Clock",
            WorkerKind::EventSource => "Events",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.thread_name())
    }
}

/// One duty run in a loop on its own thread.
pub trait Worker: Send + 'static {
    fn kind(&self) -> WorkerKind;

    /// Sleep between two `step` calls.
    fn period(&self) -> Duration;

    /// One unit of work. Failures are handled inside; the loop never stops on them.
    fn step(&mut self, state: &SharedState);

    /// Give back owned resources. Called once, after the loop ends.
    fn release(&mut self) {}
}

/// A running worker thread and the token that interrupts its sleep.
pub struct WorkerHandle {
    kind: WorkerKind,
    thread: JoinHandle<()>,
    cancel: CancellationToken,
}

impl WorkerHandle {
    pub fn kind(&self) -> WorkerKind {
        self.kind
    }

    /// Wake the worker out of its sleep so it sees the exit flag now.
    pub fn interrupt(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the thread. `false` if it panicked.
    pub fn join(self) -> bool {
        self.thread.join().is_ok()
    }
}

/// Start `worker` on a named thread.
pub fn spawn<W: Worker>(worker: W, state: Arc<SharedState>) -> io::Result<WorkerHandle> {
    let kind = worker.kind();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let thread = thread::Builder::new()
        .name(kind.thread_name().to_string())
        .spawn(move || {
            info!("{} worker started", kind);
            rt.block_on(run_loop(worker, &state, &token));
            info!("{} worker stopped", kind);
        })?;

    Ok(WorkerHandle {
        kind,
        thread,
        cancel,
    })
}

async fn run_loop<W: Worker>(mut worker: W, state: &SharedState, cancel: &CancellationToken) {
    while !state.exit_requested() && !cancel.is_cancelled() {
        worker.step(state);

        if state.exit_requested() {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(worker.period()) => {}
        }
    }
    worker.release();
}

/// Outcome of `WorkerSet::shutdown`.
#[derive(Debug, Default, PartialEq)]
pub struct ShutdownReport {
    /// Workers in the order they were joined.
    pub joined: Vec<WorkerKind>,
    /// Workers whose thread panicked.
    pub panicked: Vec<WorkerKind>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.panicked.is_empty()
    }
}

/// Running workers, kept in creation order.
///
/// The only way to stop them is `shutdown`, which interrupts and joins in
/// reverse creation order, so consumers stop before what they depend on.
#[derive(Default)]
pub struct WorkerSet {
    workers: Vec<WorkerHandle>,
}

impl WorkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<W: Worker>(&mut self, worker: W, state: &Arc<SharedState>) -> io::Result<()> {
        let handle = spawn(worker, state.clone())?;
        self.workers.push(handle);
        Ok(())
    }

    pub fn kinds(&self) -> Vec<WorkerKind> {
        self.workers.iter().map(WorkerHandle::kind).collect()
    }

    /// First worker whose thread has already ended.
    pub fn first_finished(&self) -> Option<WorkerKind> {
        self.workers
            .iter()
            .find(|w| w.is_finished())
            .map(WorkerHandle::kind)
    }

    /// Set the exit flag, interrupt every worker, then join newest first.
    pub fn shutdown(mut self, state: &SharedState) -> ShutdownReport {
        state.request_shutdown();

        let mut workers = std::mem::take(&mut self.workers);
        for worker in workers.iter().rev() {
            worker.interrupt();
        }

        let mut report = ShutdownReport::default();
        while let Some(worker) = workers.pop() {
            let kind = worker.kind();
            if worker.join() {
                info!("{} worker joined", kind);
            } else {
                error!("{} worker panicked", kind);
                report.panicked.push(kind);
            }
            report.joined.push(kind);
        }
        report
    }
}

impl Drop for WorkerSet {
    fn drop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        warn!(
            "Dropping {} workers without shutdown, interrupting them detached",
            self.workers.len()
        );
        for worker in self.workers.iter().rev() {
            worker.interrupt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    /// Worker that counts steps and records its release in a shared journal.
    struct Probe {
        kind: WorkerKind,
        period: Duration,
        steps: Arc<AtomicUsize>,
        journal: Arc<Mutex<Vec<WorkerKind>>>,
    }

    impl Worker for Probe {
        fn kind(&self) -> WorkerKind {
            self.kind
        }

        fn period(&self) -> Duration {
            self.period
        }

        fn step(&mut self, _state: &SharedState) {
            self.steps.fetch_add(1, Ordering::SeqCst);
        }

        fn release(&mut self) {
            self.journal.lock().unwrap().push(self.kind);
        }
    }

    fn shared() -> Arc<SharedState> {
        Arc::new(SharedState::new(Config::default()))
    }

    #[test]
    fn test_interrupt_breaks_long_sleep() {
        let state = shared();
        let steps = Arc::new(AtomicUsize::new(0));
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut set = WorkerSet::new();
        set.spawn(
            Probe {
                kind: WorkerKind::Clock,
                period: Duration::from_secs(3600),
                steps: steps.clone(),
                journal: journal.clone(),
            },
            &state,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        let started = Instant::now();
        let report = set.shutdown(&state);

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(report.joined, vec![WorkerKind::Clock]);
        assert!(report.is_clean());
        assert_eq!(steps.load(Ordering::SeqCst), 1);
        assert_eq!(*journal.lock().unwrap(), vec![WorkerKind::Clock]);
    }

    #[test]
    fn test_exit_flag_alone_stops_worker_within_one_period() {
        let state = shared();
        let steps = Arc::new(AtomicUsize::new(0));
        let handle = spawn(
            Probe {
                kind: WorkerKind::Touch,
                period: Duration::from_millis(20),
                steps: steps.clone(),
                journal: Arc::new(Mutex::new(Vec::new())),
            },
            state.clone(),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(100));
        state.request_shutdown();
        thread::sleep(Duration::from_millis(200));
        assert!(handle.is_finished());
        assert!(handle.join());
        assert!(steps.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_shutdown_joins_in_reverse_creation_order() {
        let state = shared();
        let journal = Arc::new(Mutex::new(Vec::new()));
        let order = [
            WorkerKind::Screen,
            WorkerKind::Touch,
            WorkerKind::Clock,
            WorkerKind::EventSource,
        ];

        let mut set = WorkerSet::new();
        for kind in order {
            set.spawn(
                Probe {
                    kind,
                    period: Duration::from_millis(10),
                    steps: Arc::new(AtomicUsize::new(0)),
                    journal: journal.clone(),
                },
                &state,
            )
            .unwrap();
        }
                assert_eq!(set.kinds(), order.to_vec());
        assert!(set.first_finished().is_none());

        let report = set.shutdown(&state);
        let reversed: Vec<_> = order.iter().rev().copied().collect();
        assert_eq!(report.joined, reversed);
        assert!(state.exit_requested());
    }

    struct Panicker;

    impl Worker for Panicker {
        fn kind(&self) -> WorkerKind {
            WorkerKind::EventSource
        }

        fn period(&self) -> Duration {
            Duration::from_millis(10)
        }

        fn step(&mut self, _state: &SharedState) {
            panic!("boom");
        }
    }

    #[test]
    fn test_panicked_worker_is_reported_and_others_still_joined() {
        let state = shared();
        let mut set = WorkerSet::new();
        set.spawn(
            Probe {
                kind: WorkerKind::Screen,
                period: Duration::from_millis(10),
                steps: Arc::new(AtomicUsize::new(0)),
                journal: Arc::new(Mutex::new(Vec::new())),
            },
            &state,
        )
        .unwrap();
        set.spawn(Panicker, &state).unwrap();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(set.first_finished(), Some(WorkerKind::EventSource));

        let report = set.shutdown(&state);
        assert_eq!(report.joined, vec![WorkerKind::EventSource, WorkerKind::Screen]);
        assert_eq!(report.panicked, vec![WorkerKind::EventSource]);
        assert!(!report.is_clean());
    }
}
