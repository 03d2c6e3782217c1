//! # inboxpilot Core Library
//!
//! Business logic for inboxpilot: polls an email inbox, classifies
//! messages into actionable intents (meeting, exam, task, interview,
//! payment), turns them into calendar events, mirrors them to a
//! tracking board, and fires reminders ahead of each event. The CLI
//! binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Intent Extractor**: keyword rules + regex date/time/duration
//!   parsing, with an advisory LLM classification oracle
//! - **Event Scheduler**: validation, duplicate guard, calendar insert,
//!   local persistence, best-effort mirror
//! - **Event Store**: one flat JSON file, rename-on-write saves
//! - **Reminder Engine**: fixed one-hour look-ahead window scan
//! - **Pipeline**: the sequential check-extract-schedule-remind loop
//! - **Integrations**: Gmail, Google Calendar, Notion, Ollama, webhook,
//!   desktop toast -- all behind substitutable traits

pub mod config;
pub mod error;
pub mod integrations;
pub mod intent;
pub mod pipeline;
pub mod reminder;
pub mod schedule;
pub mod store;

pub use config::Config;
pub use error::{ConfigError, CoreError, OAuthError, StoreError};
pub use intent::{IntentExtractor, IntentKind, IntentRecord};
pub use pipeline::{CycleReport, Pipeline};
pub use reminder::{FiredReminder, ReminderEngine};
pub use schedule::{EventScheduler, ScheduleOutcome};
pub use store::{EventStore, ScheduledEvent, Streak, StreakStore};
