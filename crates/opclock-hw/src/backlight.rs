//! Backlight control.
//!
//! Level is always 0-255 at this interface; the sysfs backend scales it to
//! the device's `max_brightness`.

use crate::HwError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// `bl_power` values from the kernel's FB_BLANK constants.
const BL_POWER_ON: &str = "0";
const BL_POWER_OFF: &str = "4";

pub trait Backlight: Send {
    /// Switch the backlight on or off without touching the level.
    fn power(&mut self, on: bool) -> Result<(), HwError>;

    /// Set brightness, 0-255.
    fn set_level(&mut self, level: u8) -> Result<(), HwError>;

    fn is_powered(&self) -> bool;
}

/// Backlight driven through `/sys/class/backlight/<name>/`.
pub struct SysfsBacklight {
    dir: PathBuf,
    max_brightness: u32,
    powered: bool,
}

impl SysfsBacklight {
    /// Open a backlight directory. Fails if `max_brightness` is unreadable.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, HwError> {
        let dir = dir.as_ref().to_path_buf();
        let max_path = dir.join("max_brightness");
        let raw = fs::read_to_string(&max_path).map_err(|e| HwError::device(&max_path, e))?;
        let max_brightness = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| HwError::InvalidValue {
                path: max_path.clone(),
                value: raw.trim().to_string(),
            })?;

        info!(
            "Opened backlight {} (max brightness {})",
            dir.display(),
            max_brightness
        );

        Ok(Self {
            dir,
            max_brightness,
            powered: false,
        })
    }

    fn write_attr(&self, name: &str, value: &str) -> Result<(), HwError> {
        let path = self.dir.join(name);
        fs::write(&path, value).map_err(|e| HwError::device(&path, e))
    }

    #[inline]
    fn scale(&self, level: u8) -> u32 {
        (u32::from(level) * self.max_brightness) / 255
    }
}

impl Backlight for SysfsBacklight {
    fn power(&mut self, on: bool) -> Result<(), HwError> {
        self.write_attr("bl_power", if on { BL_POWER_ON } else { BL_POWER_OFF })?;
        self.powered = on;
        debug!("Backlight power {}", if on { "on" } else { "off" });
        Ok(())
    }

    fn set_level(&mut self, level: u8) -> Result<(), HwError> {
        let raw = self.scale(level);
        self.write_attr("brightness", &raw.to_string())?;
        debug!("Backlight level {} (raw {})", level, raw);
        Ok(())
    }

    fn is_powered(&self) -> bool {
        self.powered
    }
}

/// Backlight with no device behind it. Keeps state so callers can inspect it.
#[derive(Debug, Default)]
pub struct MemoryBacklight {
    powered: bool,
    level: u8,
}

impl MemoryBacklight {
    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Backlight for MemoryBacklight {
    fn power(&mut self, on: bool) -> Result<(), HwError> {
        self.powered = on;
        debug!("Backlight (memory) power {}", if on { "on" } else { "off" });
        Ok(())
    }

    fn set_level(&mut self, level: u8) -> Result<(), HwError> {
        self.level = level;
        debug!("Backlight (memory) level {}", level);
        Ok(())
    }

    fn is_powered(&self) -> bool {
        self.powered
    }
}
