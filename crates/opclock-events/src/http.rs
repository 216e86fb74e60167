//! HTTP event source.
//!
//! Expects a JSON array of `{"start": RFC3339, "end": RFC3339?, "title": string}`.

use crate::{Event, EventSource, SourceError, SourceKind};
use log::debug;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpSource {
    url: String,
    interval: Duration,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            interval,
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EventSource for HttpSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Http
    }

    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    fn fetch(&mut self) -> Result<Vec<Event>, SourceError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(SourceError::Status(code)),
            Err(ureq::Error::Transport(t)) => return Err(SourceError::Transport(Box::new(t))),
        };

        let body = response.into_string()?;
        let events = parse_events(&body)?;
        debug!("Fetched {} events from {}", events.len(), self.url);
        Ok(events)
    }
}

/// Parse an event document and sort it by start time.
pub fn parse_events(body: &str) -> Result<Vec<Event>, SourceError> {
    let mut events: Vec<Event> = serde_json::from_str(body)?;
    events.sort_by(|a, b| a.start.cmp(&b.start));
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_sorts_by_start() {
        let body = r#"[
            {"start": "2026-10-18T15:00:00Z", "title": "Later"},
            {"start": "2026-10-18T09:00:00+01:00", "end": "2026-10-18T09:30:00+01:00", "title": "Earlier"}
        ]"#;
        let events = parse_events(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Earlier");
        assert!(events[0].end.is_some());
        assert_eq!(events[1].title, "Later");
        assert!(events[1].end.is_none());
    }

    #[test]
    fn test_parse_events_rejects_bad_documents() {
        assert!(matches!(parse_events("{}"), Err(SourceError::Parse(_))));
        assert!(matches!(
            parse_events(r#"[{"title": "no start"}]"#),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is closed on loopback in practice.
        let mut source = HttpSource::new(
            "http://127.0.0.1:9/events.json",
            DEFAULT_INTERVAL,
            Duration::from_secs(2),
        );
        assert!(matches!(source.fetch(), Err(SourceError::Transport(_))));
    }
}
