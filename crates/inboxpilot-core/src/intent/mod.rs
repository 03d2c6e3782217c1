//! Intent records extracted from email text.
//!
//! An [`IntentRecord`] is the ephemeral product of classifying one
//! email: what kind of commitment it describes, when it happens, and
//! how long it runs. Records without a date never reach the scheduler.

pub mod classify;
pub mod extract;

pub use classify::OracleReply;
pub use extract::IntentExtractor;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Fixed local offset for all event timestamps (UTC+5:30).
pub const LOCAL_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed UTC+5:30 offset used for parsing and staleness checks.
pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_OFFSET_SECS).expect("valid fixed offset")
}

/// Kind of actionable commitment detected in an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Meeting,
    Exam,
    Task,
    Interview,
    Payment,
}

impl IntentKind {
    /// Parse the oracle's lowercase type label. Unknown labels (and the
    /// literal "none" sentinel) yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "meeting" => Some(IntentKind::Meeting),
            "exam" => Some(IntentKind::Exam),
            "task" => Some(IntentKind::Task),
            "interview" => Some(IntentKind::Interview),
            "payment" => Some(IntentKind::Payment),
            _ => None,
        }
    }

    /// Lowercase label, matching the oracle's vocabulary.
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::Meeting => "meeting",
            IntentKind::Exam => "exam",
            IntentKind::Task => "task",
            IntentKind::Interview => "interview",
            IntentKind::Payment => "payment",
        }
    }

    /// Capitalized label, used as the default event title.
    pub fn title_case(&self) -> &'static str {
        match self {
            IntentKind::Meeting => "Meeting",
            IntentKind::Exam => "Exam",
            IntentKind::Task => "Task",
            IntentKind::Interview => "Interview",
            IntentKind::Payment => "Payment",
        }
    }

    /// Google Calendar color id for this kind.
    pub fn color_id(&self) -> &'static str {
        match self {
            IntentKind::Meeting => "1",
            IntentKind::Task => "2",
            IntentKind::Exam => "11",
            IntentKind::Interview => "3",
            IntentKind::Payment => "6",
        }
    }
}

/// Structured output of classifying and parsing one email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    pub kind: IntentKind,
    pub title: String,
    /// Calendar date. Extractor output always carries one; hand-built
    /// records (CLI paths) may not, and the scheduler rejects those.
    pub date: Option<NaiveDate>,
    pub time: NaiveTime,
    pub duration_minutes: i64,
}

impl IntentRecord {
    /// Combined start timestamp in the fixed local offset, or `None`
    /// when the record has no date.
    pub fn start_time(&self) -> Option<DateTime<FixedOffset>> {
        let date = self.date?;
        date.and_time(self.time)
            .and_local_timezone(local_offset())
            .single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_label_round_trip() {
        for kind in [
            IntentKind::Meeting,
            IntentKind::Exam,
            IntentKind::Task,
            IntentKind::Interview,
            IntentKind::Payment,
        ] {
            assert_eq!(IntentKind::from_label(kind.label()), Some(kind));
        }
        assert_eq!(IntentKind::from_label("none"), None);
        assert_eq!(IntentKind::from_label("banquet"), None);
    }

    #[test]
    fn start_time_uses_fixed_offset() {
        let record = IntentRecord {
            kind: IntentKind::Meeting,
            title: "Standup".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 60,
        };
        let start = record.start_time().unwrap();
        assert_eq!(start.offset().local_minus_utc(), LOCAL_OFFSET_SECS);
        assert_eq!(start.to_rfc3339(), "2026-03-05T09:00:00+05:30");
    }

    #[test]
    fn dateless_record_has_no_start() {
        let record = IntentRecord {
            kind: IntentKind::Task,
            title: "Task".into(),
            date: None,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration_minutes: 60,
        };
        assert!(record.start_time().is_none());
    }
}
