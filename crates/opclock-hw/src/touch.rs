//! Touch panel polling.
//!
//! Only the BTN_TOUCH key matters here: a press or release of the panel.
//! Coordinates are ignored.

use crate::HwError;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::mem::size_of;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

const EV_KEY: u16 = 0x01;
const BTN_TOUCH: u16 = 0x14a;

const EVENT_SIZE: usize = size_of::<libc::input_event>();
const TYPE_OFFSET: usize = size_of::<libc::timeval>();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEvent {
    Press,
    Release,
}

pub trait TouchInput: Send {
    /// Non-blocking poll. `Ok(None)` when nothing happened since the last call.
    fn poll(&mut self) -> Result<Option<TouchEvent>, HwError>;
}

/// Touch panel read from a Linux evdev node.
pub struct EvdevTouch {
    file: File,
}

impl EvdevTouch {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HwError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| HwError::device(path, e))?;
        info!("Opened touch device {}", path.display());
        Ok(Self { file })
    }
}

impl TouchInput for EvdevTouch {
    fn poll(&mut self) -> Result<Option<TouchEvent>, HwError> {
        let mut buf = [0u8; EVENT_SIZE];
        loop {
            let n = match self.file.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n != EVENT_SIZE {
                return Err(HwError::ShortRead(n));
            }
            if let Some(event) = decode(&buf) {
                return Ok(Some(event));
            }
        }
    }
}

fn decode(record: &[u8; EVENT_SIZE]) -> Option<TouchEvent> {
    let kind = u16::from_ne_bytes([record[TYPE_OFFSET], record[TYPE_OFFSET + 1]]);
    let code = u16::from_ne_bytes([record[TYPE_OFFSET + 2], record[TYPE_OFFSET + 3]]);
    let value = i32::from_ne_bytes([
        record[TYPE_OFFSET + 4],
        record[TYPE_OFFSET + 5],
        record[TYPE_OFFSET + 6],
        record[TYPE_OFFSET + 7],
    ]);

    if kind != EV_KEY || code != BTN_TOUCH {
        return None;
    }
    match value {
        1 => Some(TouchEvent::Press),
        0 => Some(TouchEvent::Release),
        // 2 is key autorepeat
        _ => None,
    }
}

/// Touch input for builds without a panel.
pub struct NoTouch;

impl TouchInput for NoTouch {
    fn poll(&mut self) -> Result<Option<TouchEvent>, HwError> {
        Ok(None)
    }
}
