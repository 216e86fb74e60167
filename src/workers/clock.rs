use super::{Worker, WorkerKind};
use crate::state::SharedState;
use chrono::{DateTime, Local, Utc};
use opclock_events::{Event, split_at};
use opclock_hw::Backbuffer;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_secs(1);

/// Writes time, date and the surrounding events into the backbuffer.
pub struct ClockWorker {
    backbuffer: Arc<Backbuffer>,
}

impl ClockWorker {
    pub fn new(backbuffer: Arc<Backbuffer>) -> Self {
        Self { backbuffer }
    }
}

impl Worker for ClockWorker {
    fn kind(&self) -> WorkerKind {
        WorkerKind::Clock
    }

    fn period(&self) -> Duration {
        TICK
    }

    fn step(&mut self, state: &SharedState) {
        let now = Local::now();
        let time = now.format("%H:%M:%S").to_string();
        let date = now.format("%d/%m/%Y").to_string();

        let events = state.read_events();
        let lines = event_lines(
            &events,
            now.with_timezone(&Utc),
            state.config().display_show_previous_expired_event,
        );

        self.backbuffer.update(|frame| {
            frame.time = time;
            frame.date = date;
            frame.events = lines;
        });
    }
}

fn event_line(prefix: &str, event: &Event) -> String {
    let start = event.start.with_timezone(&Local);
    format!("{} {} {}", prefix, start.format("%H:%M"), event.title)
}

/// Display lines for the event area: the next event, preceded by the last
/// expired one when `show_previous` is set.
fn event_lines(events: &[Event], now: DateTime<Utc>, show_previous: bool) -> Vec<String> {
    let (previous, next) = split_at(events, now);
    let mut lines = Vec::with_capacity(2);

    if show_previous {
        if let Some(event) = previous {
            lines.push(event_line("Prev:", event));
        }
    }
    match next {
        Some(event) => lines.push(event_line("Next:", event)),
        None => lines.push("No upcoming events".to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::Duration as ChronoDuration;

    fn sample(now: DateTime<Utc>) -> Vec<Event> {
        vec![
            Event::new(
                now - ChronoDuration::minutes(30),
                Some(now - ChronoDuration::minutes(10)),
                "Coffee",
            ),
            Event::new(now + ChronoDuration::minutes(15), None, "Standup"),
        ]
    }

    #[test]
    fn test_event_lines_hide_previous_by_default() {
        let now = Utc::now();
        let lines = event_lines(&sample(now), now, false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Next:"));
        assert!(lines[0].ends_with("Standup"));
    }

    #[test]
    fn test_event_lines_show_previous() {
        let now = Utc::now();
        let lines = event_lines(&sample(now), now, true);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Prev:"));
        assert!(lines[0].ends_with("Coffee"));
        assert!(lines[1].ends_with("Standup"));
    }

    #[test]
    fn test_event_lines_without_events() {
        assert_eq!(
            event_lines(&[], Utc::now(), true),
            vec!["No upcoming events".to_string()]
        );
    }

    #[test]
    fn test_step_draws_clock_and_events() {
        let config = Config {
            display_show_previous_expired_event: true,
            ..Config::default()
        };
        let state = SharedState::new(config);
        let now = Utc::now();
        state.set_events(sample(now));

        let backbuffer = Arc::new(Backbuffer::new());
        let mut worker = ClockWorker::new(backbuffer.clone());
        worker.step(&state);

        let frame = backbuffer.snapshot();
        assert_eq!(frame.time.len(), "00:00:00".len());
        assert_eq!(frame.date.len(), "18/10/2026".len());
        assert_eq!(frame.events.len(), 2);
    }
}
