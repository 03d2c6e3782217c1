//! The automation cycle: check inbox -> extract -> schedule -> remind.
//!
//! One cycle is purely sequential. Any external-service failure aborts
//! the cycle and bubbles up to [`run_forever`], which logs, sleeps the
//! backoff interval, and tries again. Messages are only marked read
//! once the pipeline has decided about them, so a failed cycle leaves
//! them unread for the next attempt.

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::AutomationConfig;
use crate::error::{CoreError, Result};
use crate::integrations::InboxReader;
use crate::intent::{local_offset, IntentExtractor};
use crate::reminder::ReminderEngine;
use crate::schedule::{EventScheduler, ScheduleOutcome};

/// Counters for one automation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub messages_seen: usize,
    pub created: usize,
    pub skipped_past: usize,
    pub skipped_duplicate: usize,
    pub skipped_invalid: usize,
    /// Messages the extractor rejected (no kind, no date, stale).
    pub rejected: usize,
    pub reminders_fired: usize,
}

pub struct Pipeline<'a> {
    inbox: &'a dyn InboxReader,
    extractor: IntentExtractor<'a>,
    scheduler: EventScheduler<'a>,
    reminder: ReminderEngine<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        inbox: &'a dyn InboxReader,
        extractor: IntentExtractor<'a>,
        scheduler: EventScheduler<'a>,
        reminder: ReminderEngine<'a>,
    ) -> Self {
        Self {
            inbox,
            extractor,
            scheduler,
            reminder,
        }
    }

    /// Run one full cycle against the supplied `now`.
    pub fn run_cycle(&self, now: DateTime<FixedOffset>) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        let messages = self
            .inbox
            .list_unread()
            .map_err(|e| CoreError::service("inbox", e))?;
        report.messages_seen = messages.len();
        log::info!("unread found: {}", messages.len());

        for message in messages {
            match self.extractor.extract(&message.body, now) {
                Some(intent) => match self.scheduler.schedule(&intent, now)? {
                    ScheduleOutcome::Created => report.created += 1,
                    ScheduleOutcome::SkippedPast => report.skipped_past += 1,
                    ScheduleOutcome::SkippedDuplicate => report.skipped_duplicate += 1,
                    ScheduleOutcome::SkippedInvalid => report.skipped_invalid += 1,
                },
                None => report.rejected += 1,
            }
            // Read receipt goes out whatever the outcome was.
            self.inbox
                .mark_read(&message.id)
                .map_err(|e| CoreError::service("inbox", e))?;
        }

        report.reminders_fired = self.reminder.tick(now)?.len();
        Ok(report)
    }

    /// Blocking loop: cycle, sleep, repeat. Never terminates on its
    /// own; cancellation is process termination.
    pub fn run_forever(&self, automation: &AutomationConfig) {
        let poll = std::time::Duration::from_secs(automation.poll_interval_secs);
        let backoff = std::time::Duration::from_secs(automation.error_backoff_secs);

        loop {
            let now = Utc::now().with_timezone(&local_offset());
            match self.run_cycle(now) {
                Ok(report) => {
                    log::info!(
                        "cycle done: {} created, {} reminders, {} rejected; sleeping {}s",
                        report.created,
                        report.reminders_fired,
                        report.rejected,
                        poll.as_secs()
                    );
                    std::thread::sleep(poll);
                }
                Err(e) => {
                    log::error!("cycle failed: {e}; retrying in {}s", backoff.as_secs());
                    std::thread::sleep(backoff);
                }
            }
        }
    }
}
