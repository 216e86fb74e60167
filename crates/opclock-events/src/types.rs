//! Core event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend supplies events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Demo,
    File,
    Http,
}

impl SourceKind {
    /// Token used in the config file and on the status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Demo => "DEMO",
            SourceKind::File => "FILE",
            SourceKind::Http => "HTTP",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEMO" => Ok(SourceKind::Demo),
            "FILE" => Ok(SourceKind::File),
            "HTTP" => Ok(SourceKind::Http),
            other => Err(format!("unknown event source {:?}", other)),
        }
    }
}

/// A displayable, timestamped item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub title: String,
}

impl Event {
    pub fn new(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            title: title.into(),
        }
    }

    /// An event without an end expires when it starts.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end.unwrap_or(self.start) <= now
    }
}

/// Most recently expired event and the next one that is not expired yet.
/// `events` must be sorted by start.
pub fn split_at(events: &[Event], now: DateTime<Utc>) -> (Option<&Event>, Option<&Event>) {
    let previous = events.iter().rev().find(|e| e.is_expired(now));
    let next = events.iter().find(|e| !e.is_expired(now));
    (previous, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, h, m, 0).unwrap()
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("DEMO".parse::<SourceKind>(), Ok(SourceKind::Demo));
        assert_eq!(" http ".parse::<SourceKind>(), Ok(SourceKind::Http));
        assert_eq!("File".parse::<SourceKind>(), Ok(SourceKind::File));
        assert!("SMTP".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_is_expired_uses_end_when_present() {
        let now = at(12, 0);
        let running = Event::new(
            now - Duration::minutes(5),
            Some(now + Duration::minutes(5)),
            "a",
        );
        let started = Event::new(now - Duration::minutes(5), None, "b");
        assert!(!running.is_expired(now));
        assert!(started.is_expired(now));
    }

    #[test]
    fn test_split_at() {
        let events = vec![
            Event::new(at(9, 0), Some(at(9, 30)), "early"),
            Event::new(at(10, 0), Some(at(10, 30)), "late"),
            Event::new(at(13, 0), None, "next"),
            Event::new(at(15, 0), None, "after"),
        ];
        let (previous, next) = split_at(&events, at(12, 0));
        assert_eq!(previous.map(|e| e.title.as_str()), Some("late"));
        assert_eq!(next.map(|e| e.title.as_str()), Some("next"));

        let (previous, next) = split_at(&events, at(8, 0));
        assert!(previous.is_none());
        assert_eq!(next.map(|e| e.title.as_str()), Some("early"));
    }
}
