//! OpClock - clock and event display appliance
//!
//! One thread per hardware or data duty, coordinated from the main thread.
//! The main thread draws the status labels and owns startup and shutdown.

mod app;
mod config;
mod error;
mod signals;
mod state;
mod status;
mod workers;

use app::App;
use config::Config;
use error::StartupError;
use log::info;
use signals::ShutdownSignals;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}, aborting!", e);
            ExitCode::FAILURE
        }
    }
}

/// `Ok(false)` when shutdown completed but a worker had panicked.
fn run() -> Result<bool, StartupError> {
    println!("==============================");
    println!("OpClock");
    println!("* version: {}", env!("CARGO_PKG_VERSION"));
    println!("------------------------------");

    // Registered before anything else so an early SIGTERM is queued, not fatal
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;
    let signals = {
        let _guard = rt.enter();
        ShutdownSignals::register().map_err(StartupError::Signals)?
    };

    let path = Config::locate();
    info!("Loading config from {}", path.display());
    let config = Config::load(&path)?;
    for line in config.summary() {
        println!("{}", line);
    }
    println!("------------------------------");

    let app = App::start(config)?;
    info!("{} workers running", app.worker_kinds().len());

    rt.block_on(app.run_status_loop(Some(signals)));

    let report = app.shutdown();
    println!("All threads caught, exiting..");
    Ok(report.is_clean())
}
