//! opclock-hw: Hardware abstraction for the OpClock display
//!
//! Provides the backlight, touch and display interfaces the application drives,
//! plus the shared text backbuffer that workers draw into.
//! Backends are picked from config so the clock also runs headless on a dev box.

pub mod backbuffer;
pub mod backlight;
pub mod display;
pub mod error;
pub mod touch;

pub use backbuffer::{Backbuffer, Frame};
pub use backlight::{Backlight, MemoryBacklight, SysfsBacklight};
pub use display::{ConsoleDisplay, Display};
pub use error::HwError;
pub use touch::{EvdevTouch, NoTouch, TouchEvent, TouchInput};

use log::info;
use std::path::PathBuf;

/// Device selection. `None` picks the device-less backend for that part.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HardwareConfig {
    /// sysfs backlight directory, e.g. `/sys/class/backlight/rpi_backlight`.
    pub backlight_device: Option<PathBuf>,
    /// evdev node of the touch panel, e.g. `/dev/input/event0`.
    pub touch_device: Option<PathBuf>,
}

/// Opened hardware backends, owned by the orchestrator until handed to workers.
pub struct Hardware {
    pub backlight: Box<dyn Backlight>,
    pub touch: Box<dyn TouchInput>,
    pub display: Box<dyn Display>,
}

impl Hardware {
    /// Open every backend named by `config`.
    /// Any device that cannot be opened is an error; nothing is retried.
    pub fn from_config(config: &HardwareConfig) -> Result<Self, HwError> {
        let backlight: Box<dyn Backlight> = match &config.backlight_device {
            Some(dir) => Box::new(SysfsBacklight::open(dir)?),
            None => {
                info!("No backlight device configured, using in-memory backlight");
                Box::new(MemoryBacklight::default())
            }
        };

        let touch: Box<dyn TouchInput> = match &config.touch_device {
            Some(path) => Box::new(EvdevTouch::open(path)?),
            None => {
                info!("No touch device configured, touch input disabled");
                Box::new(NoTouch)
            }
        };

        Ok(Self {
            backlight,
            touch,
            display: Box::new(ConsoleDisplay::stdout()),
        })
    }
}
