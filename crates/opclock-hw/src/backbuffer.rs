//! Shared text backbuffer.
//!
//! The clock worker and the status loop draw into it, the screen worker
//! presents it. A revision counter lets the screen skip unchanged frames.

use std::sync::{Mutex, PoisonError};

/// Everything the display shows, as text slots.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Current time, e.g. "14:05:09".
    pub time: String,
    /// Current date, e.g. "Sun 18 Oct 2026".
    pub date: String,
    /// Event lines, in display order.
    pub events: Vec<String>,
    /// "Source: NAME" label. `None` when it could not be built.
    pub source_label: Option<String>,
    /// "Status: OK" / "Status: Fail" label.
    pub status_label: Option<String>,
    pub status_ok: bool,
}

impl Frame {
    /// Single-line text rendering used by the console display.
    pub fn to_line(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4 + self.events.len());
        if !self.time.is_empty() {
            parts.push(&self.time);
        }
        if !self.date.is_empty() {
            parts.push(&self.date);
        }
        for line in &self.events {
            parts.push(line);
        }
        if let Some(label) = &self.source_label {
            parts.push(label);
        }
        if let Some(label) = &self.status_label {
            parts.push(label);
        }
        parts.join(" | ")
    }
}

struct Inner {
    frame: Frame,
    revision: u64,
}

pub struct Backbuffer {
    inner: Mutex<Inner>,
}

impl Default for Backbuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Backbuffer {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                frame: Frame::default(),
                revision: 0,
            }),
        }
    }

    /// Modify the frame under the lock.
    /// The revision only moves when the frame actually changed.
    pub fn update<F: FnOnce(&mut Frame)>(&self, f: F) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let before = inner.frame.clone();
        f(&mut inner.frame);
        if inner.frame != before {
            inner.revision += 1;
        }
    }

    /// Copy of the frame if it changed after revision `seen`.
    pub fn snapshot_if_newer(&self, seen: u64) -> Option<(u64, Frame)> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        (inner.revision > seen).then(|| (inner.revision, inner.frame.clone()))
    }

    pub fn snapshot(&self) -> Frame {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .frame
            .clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_bumps_revision_only_on_change() {
        let buffer = Backbuffer::new();
        buffer.update(|f| f.time = "12:00:00".into());
        assert_eq!(buffer.revision(), 1);

        buffer.update(|f| f.time = "12:00:00".into());
        assert_eq!(buffer.revision(), 1);

        buffer.update(|f| f.status_ok = true);
        assert_eq!(buffer.revision(), 2);
    }

    #[test]
    fn test_snapshot_if_newer() {
        let buffer = Backbuffer::new();
        assert!(buffer.snapshot_if_newer(0).is_none());

        buffer.update(|f| f.date = "Sun 18 Oct 2026".into());
        let (rev, frame) = buffer.snapshot_if_newer(0).unwrap();
        assert_eq!(rev, 1);
        assert_eq!(frame.date, "Sun 18 Oct 2026");
        assert!(buffer.snapshot_if_newer(rev).is_none());
    }

    #[test]
    fn test_to_line_skips_missing_labels() {
        let frame = Frame {
            time: "09:30:00".into(),
            date: "Mon 19 Oct 2026".into(),
            events: vec!["10:00 Standup".into()],
            source_label: None,
            status_label: Some("Status: OK".into()),
            status_ok: true,
        };
        assert_eq!(
            frame.to_line(),
            "09:30:00 | Mon 19 Oct 2026 | 10:00 Standup | Status: OK"
        );
    }
}
