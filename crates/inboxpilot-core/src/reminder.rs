//! Reminder engine: scans the event store on every automation tick and
//! fires notifications for events entering their reminder window.
//!
//! The window is `[event_time - 1h, event_time)`, half-open at the top:
//! an event exactly at `now` no longer fires. Events whose window fully
//! elapsed while the process was down are never reminded -- there is no
//! backfill, by design.

use chrono::{DateTime, Duration, FixedOffset};

use crate::error::Result;
use crate::integrations::NotificationChannel;
use crate::store::EventStore;

/// How far ahead of an event the reminder fires.
const REMINDER_LEAD: Duration = Duration::hours(1);

/// One reminder that fired during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredReminder {
    pub title: String,
    pub event_time: DateTime<FixedOffset>,
    pub message: String,
}

/// Whether `now` falls inside the event's reminder window.
pub fn in_reminder_window(event_time: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    let reminder_time = event_time - REMINDER_LEAD;
    reminder_time <= now && now < event_time
}

/// Fires reminders and flips `reminded` flags. Owns no schedule of its
/// own; the automation loop calls [`ReminderEngine::tick`] on a cadence.
pub struct ReminderEngine<'a> {
    store: &'a EventStore,
    channels: Vec<&'a dyn NotificationChannel>,
}

impl<'a> ReminderEngine<'a> {
    pub fn new(store: &'a EventStore, channels: Vec<&'a dyn NotificationChannel>) -> Self {
        Self { store, channels }
    }

    /// Scan unreminded events against `now`; fire and persist.
    ///
    /// Channel failures are logged and swallowed -- the event is still
    /// marked reminded. Store failures propagate.
    pub fn tick(&self, now: DateTime<FixedOffset>) -> Result<Vec<FiredReminder>> {
        let mut events = self.store.load()?;
        let mut fired = Vec::new();

        for event in events.iter_mut().filter(|e| !e.reminded) {
            if !in_reminder_window(event.datetime, now) {
                continue;
            }

            let message = format!("{} at {}", event.title, event.datetime.format("%H:%M"));
            log::info!("reminder: {message}");

            for channel in &self.channels {
                if let Err(e) = channel.send("Reminder", &message) {
                    log::warn!("notification channel '{}' failed: {e}", channel.name());
                }
            }

            event.reminded = true;
            fired.push(FiredReminder {
                title: event.title.clone(),
                event_time: event.datetime,
                message,
            });
        }

        if !fired.is_empty() {
            self.store.save(&events)?;
        }
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::local_offset;
    use crate::store::ScheduledEvent;
    use chrono::TimeZone;
    use std::cell::RefCell;

    struct RecordingChannel {
        sent: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordingChannel {
        fn new(fail: bool) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }

        fn send(&self, _title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
            self.sent.borrow_mut().push(body.to_string());
            if self.fail {
                Err("channel down".into())
            } else {
                Ok(())
            }
        }
    }

    fn event_at(hour: u32, min: u32) -> DateTime<FixedOffset> {
        local_offset().with_ymd_and_hms(2026, 3, 5, hour, min, 0).unwrap()
    }

    fn store_with(events: &[ScheduledEvent]) -> (tempfile::TempDir, EventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path().join("events.json"));
        store.save(events).unwrap();
        (dir, store)
    }

    #[test]
    fn window_boundaries() {
        let t = event_at(14, 30);
        assert!(in_reminder_window(t, t - Duration::minutes(30)));
        assert!(in_reminder_window(t, t - Duration::hours(1))); // closed lower bound
        assert!(!in_reminder_window(t, t - Duration::minutes(90)));
        assert!(!in_reminder_window(t, t)); // open upper bound
        assert!(!in_reminder_window(t, t + Duration::minutes(1)));
    }

    #[test]
    fn fires_inside_window_and_flips_flag() {
        let (_dir, store) = store_with(&[ScheduledEvent::new("Exam", event_at(14, 30))]);
        let channel = RecordingChannel::new(false);
        let engine = ReminderEngine::new(&store, vec![&channel]);

        let fired = engine.tick(event_at(14, 0)).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].message, "Exam at 14:30");
        assert_eq!(channel.sent.borrow().as_slice(), ["Exam at 14:30"]);
        assert!(store.load().unwrap()[0].reminded);
    }

    #[test]
    fn fires_at_most_once() {
        let (_dir, store) = store_with(&[ScheduledEvent::new("Exam", event_at(14, 30))]);
        let channel = RecordingChannel::new(false);
        let engine = ReminderEngine::new(&store, vec![&channel]);

        assert_eq!(engine.tick(event_at(14, 0)).unwrap().len(), 1);
        assert_eq!(engine.tick(event_at(14, 10)).unwrap().len(), 0);
    }

    #[test]
    fn too_early_or_too_late_does_not_fire() {
        let (_dir, store) = store_with(&[ScheduledEvent::new("Exam", event_at(14, 30))]);
        let engine = ReminderEngine::new(&store, vec![]);

        assert!(engine.tick(event_at(13, 0)).unwrap().is_empty()); // T - 90min
        assert!(engine.tick(event_at(14, 30)).unwrap().is_empty()); // now == T
        assert!(!store.load().unwrap()[0].reminded);
    }

    #[test]
    fn channel_failure_still_marks_reminded() {
        let (_dir, store) = store_with(&[ScheduledEvent::new("Exam", event_at(14, 30))]);
        let channel = RecordingChannel::new(true);
        let engine = ReminderEngine::new(&store, vec![&channel]);

        let fired = engine.tick(event_at(14, 0)).unwrap();
        assert_eq!(fired.len(), 1);
        assert!(store.load().unwrap()[0].reminded);
    }
}
