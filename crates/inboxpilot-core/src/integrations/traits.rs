//! Collaborator seams for every external service.
//!
//! The pipeline only ever talks to these traits; the real Gmail,
//! Calendar, Notion, Ollama, webhook, and toast clients live behind
//! them, so tests substitute fakes with no network in sight.

use chrono::{DateTime, FixedOffset};

use crate::intent::{IntentKind, OracleReply};

/// One unread message pulled from the inbox.
#[derive(Debug, Clone)]
pub struct InboxMessage {
    pub id: String,
    pub body: String,
}

/// Reads and acknowledges inbox messages.
pub trait InboxReader {
    /// List unread messages (bounded by the provider's page cap).
    fn list_unread(&self) -> Result<Vec<InboxMessage>, Box<dyn std::error::Error>>;

    /// Mark one message read, whatever the pipeline decided about it.
    fn mark_read(&self, id: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// The external calendar: duplicate lookup and event creation.
pub trait CalendarService {
    /// Whether an event with this exact title already exists within
    /// `window_minutes` either side of `start`.
    fn find_existing(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
        window_minutes: i64,
    ) -> Result<bool, Box<dyn std::error::Error>>;

    /// Create a calendar entry.
    fn insert_event(
        &self,
        title: &str,
        kind: IntentKind,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Best-effort secondary copy of a scheduled event in an external
/// tracking system. Not authoritative; failures are swallowed upstream.
pub trait TrackingMirror {
    fn create_record(
        &self,
        title: &str,
        start: DateTime<FixedOffset>,
        status: &str,
        source_note: &str,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

/// Fire-and-forget notification sink (desktop toast, webhook, ...).
pub trait NotificationChannel {
    /// Identifier used in failure logs.
    fn name(&self) -> &str;

    fn send(&self, title: &str, body: &str) -> Result<(), Box<dyn std::error::Error>>;
}

/// Best-effort, possibly-wrong single-label classifier. Advisory only:
/// keyword rules override whatever it answers.
pub trait ClassificationOracle {
    fn classify(&self, email_text: &str) -> Result<OracleReply, Box<dyn std::error::Error>>;
}
