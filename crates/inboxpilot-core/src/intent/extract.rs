//! Hybrid intent extraction: keyword rules + regex field parsing, with
//! an advisory classification oracle.
//!
//! Keyword detection always wins over the oracle. The oracle is only
//! consulted when no keyword fires, so a flaky or offline model can
//! never misroute an email that names its own kind. Every parse
//! failure degrades to rejection or a default -- extraction never
//! returns an error.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use regex::Regex;

use super::classify::OracleReply;
use super::{local_offset, IntentKind, IntentRecord};
use crate::integrations::ClassificationOracle;

/// Default time-of-day for dateless-time emails (09:00 local).
const DEFAULT_HOUR: u32 = 9;
/// Default event length in minutes.
const DEFAULT_DURATION_MIN: i64 = 60;

/// Turns raw email text into an [`IntentRecord`], or rejects it.
pub struct IntentExtractor<'a> {
    oracle: Option<&'a dyn ClassificationOracle>,
    date_re: Regex,
    time_re: Regex,
    bare_hour_re: Regex,
    duration_re: Regex,
}

impl<'a> IntentExtractor<'a> {
    /// Build an extractor. Pass `None` to run keyword-only.
    pub fn new(oracle: Option<&'a dyn ClassificationOracle>) -> Self {
        Self {
            oracle,
            // Strict DD/MM/YYYY.
            date_re: Regex::new(r"\b(\d{2})/(\d{2})/(\d{4})\b").expect("date regex"),
            time_re: Regex::new(r"(?i)\b(\d{1,2}):(\d{2})\s*(am|pm)\b").expect("time regex"),
            bare_hour_re: Regex::new(r"(?i)\b(\d{1,2})\s*(am|pm)\b").expect("bare hour regex"),
            duration_re: Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*hours?\b").expect("duration regex"),
        }
    }

    /// Extract an intent from one email body.
    ///
    /// Returns `None` when the email has no recognizable kind, no
    /// parseable date, or a start time that is not strictly in the
    /// future relative to `now`.
    pub fn extract(&self, email_text: &str, now: DateTime<FixedOffset>) -> Option<IntentRecord> {
        let lower = email_text.to_lowercase();

        let keyword_kind = keyword_scan(&lower);
        let reply = if keyword_kind.is_some() {
            OracleReply::none()
        } else {
            self.consult_oracle(email_text)
        };

        let kind = match keyword_kind.or(reply.kind) {
            Some(kind) => kind,
            None => {
                log::debug!("no actionable content");
                return None;
            }
        };

        let date = match self.parse_date(email_text) {
            Some(date) => date,
            None => {
                log::debug!("no date found for {} email", kind.label());
                return None;
            }
        };

        let time = self.parse_time(email_text);
        let duration_minutes = self.parse_duration(email_text);
        let title = reply.title.unwrap_or_else(|| kind.title_case().to_string());

        let record = IntentRecord {
            kind,
            title,
            date: Some(date),
            time,
            duration_minutes,
        };

        // Canonical staleness filter: the same check the scheduler
        // applies, so stale mail is dropped before any network call.
        match record.start_time() {
            Some(start) if start > now => Some(record),
            _ => {
                log::debug!("past date, skipping '{}'", record.title);
                None
            }
        }
    }

    fn consult_oracle(&self, email_text: &str) -> OracleReply {
        let oracle = match self.oracle {
            Some(oracle) => oracle,
            None => return OracleReply::none(),
        };
        match oracle.classify(email_text) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("classification oracle unavailable: {e}");
                OracleReply::none()
            }
        }
    }

    /// Strict `DD/MM/YYYY`. Out-of-range components reject the record
    /// rather than erroring.
    fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.date_re.captures(text)?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// `H:MM am/pm`, else bare `H am/pm`, else 09:00.
    fn parse_time(&self, text: &str) -> NaiveTime {
        if let Some(caps) = self.time_re.captures(text) {
            let hour: u32 = caps[1].parse().unwrap_or(0);
            let minute: u32 = caps[2].parse().unwrap_or(0);
            if let Some(t) = clock_time(hour, minute, &caps[3]) {
                return t;
            }
        }
        if let Some(caps) = self.bare_hour_re.captures(text) {
            let hour: u32 = caps[1].parse().unwrap_or(0);
            if let Some(t) = clock_time(hour, 0, &caps[2]) {
                return t;
            }
        }
        NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).expect("default time")
    }

    /// `<number> hour[s]`, fractional allowed, else 60 minutes.
    fn parse_duration(&self, text: &str) -> i64 {
        self.duration_re
            .captures(text)
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .map(|hours| (hours * 60.0).round() as i64)
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_DURATION_MIN)
    }
}

/// Keyword substring scan in fixed priority order. A hit here
/// overrides whatever the oracle says.
fn keyword_scan(lower: &str) -> Option<IntentKind> {
    if lower.contains("exam") {
        Some(IntentKind::Exam)
    } else if lower.contains("meeting") {
        Some(IntentKind::Meeting)
    } else if lower.contains("interview") {
        Some(IntentKind::Interview)
    } else if lower.contains("assignment") || lower.contains("submission") {
        Some(IntentKind::Task)
    } else if lower.contains("payment") || lower.contains("fees") {
        Some(IntentKind::Payment)
    } else {
        None
    }
}

/// 12-hour clock to `NaiveTime`. Rejects hours outside 1..=12.
fn clock_time(hour_12: u32, minute: u32, meridiem: &str) -> Option<NaiveTime> {
    if !(1..=12).contains(&hour_12) {
        return None;
    }
    let hour = match (hour_12, meridiem.eq_ignore_ascii_case("pm")) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct StubOracle(Result<OracleReply, String>);

    impl ClassificationOracle for StubOracle {
        fn classify(&self, _email_text: &str) -> Result<OracleReply, Box<dyn std::error::Error>> {
            match &self.0 {
                Ok(reply) => Ok(reply.clone()),
                Err(msg) => Err(msg.clone().into()),
            }
        }
    }

    fn now() -> DateTime<FixedOffset> {
        local_offset()
            .with_ymd_and_hms(2026, 1, 1, 8, 0, 0)
            .unwrap()
    }

    #[test]
    fn exam_keyword_overrides_oracle() {
        let oracle = StubOracle(Ok(OracleReply {
            kind: Some(IntentKind::Meeting),
            title: Some("Weekly sync".into()),
        }));
        let extractor = IntentExtractor::new(Some(&oracle));
        let record = extractor
            .extract("Final exam scheduled on 05/03/2026", now())
            .unwrap();
        assert_eq!(record.kind, IntentKind::Exam);
        // Keyword path never consults the oracle, so the default title applies.
        assert_eq!(record.title, "Exam");
    }

    #[test]
    fn canonical_exam_scenario() {
        let extractor = IntentExtractor::new(None);
        let record = extractor
            .extract("Exam on 05/03/2026 at 2:30pm, duration 1.5 hours", now())
            .unwrap();
        assert_eq!(record.kind, IntentKind::Exam);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 3, 5));
        assert_eq!(record.time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(record.duration_minutes, 90);
    }

    #[test]
    fn oracle_classifies_when_no_keyword_fires() {
        let oracle = StubOracle(Ok(OracleReply {
            kind: Some(IntentKind::Meeting),
            title: Some("Catch up with Ravi".into()),
        }));
        let extractor = IntentExtractor::new(Some(&oracle));
        let record = extractor
            .extract("Let's catch up on 10/04/2026 at 11:00 am", now())
            .unwrap();
        assert_eq!(record.kind, IntentKind::Meeting);
        assert_eq!(record.title, "Catch up with Ravi");
        assert_eq!(record.time, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
    }

    #[test]
    fn oracle_none_and_no_keyword_rejects() {
        let oracle = StubOracle(Ok(OracleReply::none()));
        let extractor = IntentExtractor::new(Some(&oracle));
        assert!(extractor
            .extract("Lunch 10/04/2026 at the usual place", now())
            .is_none());
    }

    #[test]
    fn oracle_failure_degrades_to_keyword_only() {
        let oracle = StubOracle(Err("connection refused".into()));
        let extractor = IntentExtractor::new(Some(&oracle));
        // Keyword path still works.
        let record = extractor
            .extract("Fees payment due 20/02/2026", now())
            .unwrap();
        assert_eq!(record.kind, IntentKind::Payment);
        // No keyword, broken oracle: reject, not error.
        assert!(extractor.extract("Dinner on 20/02/2026", now()).is_none());
    }

    #[test]
    fn missing_date_rejects() {
        let extractor = IntentExtractor::new(None);
        assert!(extractor.extract("Exam next Tuesday at 2pm", now()).is_none());
    }

    #[test]
    fn impossible_date_rejects_without_panicking() {
        let extractor = IntentExtractor::new(None);
        assert!(extractor.extract("Exam on 99/99/2026", now()).is_none());
    }

    #[test]
    fn past_date_rejects() {
        let extractor = IntentExtractor::new(None);
        assert!(extractor.extract("Exam on 05/03/2020 at 2:30pm", now()).is_none());
    }

    #[test]
    fn bare_hour_time_parses() {
        let extractor = IntentExtractor::new(None);
        let record = extractor.extract("Meeting on 10/04/2026 at 5 pm", now()).unwrap();
        assert_eq!(record.time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn twelve_hour_clock_edges() {
        assert_eq!(clock_time(12, 15, "am"), NaiveTime::from_hms_opt(0, 15, 0));
        assert_eq!(clock_time(12, 0, "pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(clock_time(1, 0, "pm"), NaiveTime::from_hms_opt(13, 0, 0));
        assert_eq!(clock_time(13, 0, "pm"), None);
        assert_eq!(clock_time(0, 30, "am"), None);
    }

    #[test]
    fn defaults_apply_when_time_and_duration_absent() {
        let extractor = IntentExtractor::new(None);
        let record = extractor.extract("Assignment submission 11/06/2026", now()).unwrap();
        assert_eq!(record.kind, IntentKind::Task);
        assert_eq!(record.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(record.duration_minutes, 60);
    }

    #[test]
    fn same_day_future_time_passes_staleness_filter() {
        let extractor = IntentExtractor::new(None);
        // now() is 2026-01-01 08:00 +05:30; 9am default is still ahead.
        let record = extractor.extract("Meeting on 01/01/2026", now()).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 1, 1));
    }
}
