//! Event scheduler: validates an intent record, guards against
//! duplicates, creates the calendar entry, and records it locally.
//!
//! Failure policy is deliberate and asymmetric: calendar failures
//! propagate (the loop retries the whole cycle after backoff), mirror
//! failures are swallowed and logged (the local event's existence never
//! depends on the mirror).

use chrono::{DateTime, Duration, FixedOffset};

use crate::error::{CoreError, Result};
use crate::integrations::{CalendarService, TrackingMirror};
use crate::intent::IntentRecord;
use crate::store::{EventStore, ScheduledEvent};

/// Duplicate lookup window either side of the computed start.
const DUPLICATE_WINDOW_MIN: i64 = 1;

/// What happened to one intent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Calendar entry created, event stored, mirror attempted.
    Created,
    /// Start time was not strictly in the future.
    SkippedPast,
    /// Identical title already on the calendar within the window.
    SkippedDuplicate,
    /// Record carries no date.
    SkippedInvalid,
}

pub struct EventScheduler<'a> {
    calendar: &'a dyn CalendarService,
    mirror: Option<&'a dyn TrackingMirror>,
    store: &'a EventStore,
}

impl<'a> EventScheduler<'a> {
    pub fn new(
        calendar: &'a dyn CalendarService,
        mirror: Option<&'a dyn TrackingMirror>,
        store: &'a EventStore,
    ) -> Self {
        Self {
            calendar,
            mirror,
            store,
        }
    }

    /// Schedule one intent record.
    ///
    /// The duplicate guard is a best-effort window check against the
    /// external calendar, not a unique-key constraint; this process is
    /// single-threaded and sequential, so that is enough.
    pub fn schedule(
        &self,
        intent: &IntentRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<ScheduleOutcome> {
        let start = match intent.start_time() {
            Some(start) => start,
            None => return Ok(ScheduleOutcome::SkippedInvalid),
        };

        if start <= now {
            log::info!("past date, skipping '{}'", intent.title);
            return Ok(ScheduleOutcome::SkippedPast);
        }

        let duplicate = self
            .calendar
            .find_existing(&intent.title, start, DUPLICATE_WINDOW_MIN)
            .map_err(|e| CoreError::service("calendar", e))?;
        if duplicate {
            log::info!("duplicate on calendar, skipping '{}'", intent.title);
            return Ok(ScheduleOutcome::SkippedDuplicate);
        }

        let end = start + Duration::minutes(intent.duration_minutes);
        self.calendar
            .insert_event(&intent.title, intent.kind, start, end)
            .map_err(|e| CoreError::service("calendar", e))?;
        log::info!("created {} '{}' at {}", intent.kind.label(), intent.title, start);

        self.store.append(ScheduledEvent::new(intent.title.clone(), start))?;

        if let Some(mirror) = self.mirror {
            let note = format!("Created automatically by inboxpilot ({})", intent.kind.label());
            if let Err(e) = mirror.create_record(&intent.title, start, "Pending", &note) {
                log::warn!("tracking mirror failed for '{}': {e}", intent.title);
            }
        }

        Ok(ScheduleOutcome::Created)
    }
}
