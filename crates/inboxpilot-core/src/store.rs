//! Flat-file persistence for scheduled events and the streak counter.
//!
//! The event store is one JSON array; every mutation is a whole-file
//! read-modify-write. Saves go through a temp file and an atomic
//! rename so a crash mid-write leaves the previous contents intact.
//! There is no cross-process locking -- the automation loop and the
//! dashboard are expected to run one at a time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A persisted calendar-linked record with reminder state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    pub title: String,
    /// ISO 8601 with the fixed +05:30 offset.
    pub datetime: DateTime<FixedOffset>,
    /// Starts false; flips to true exactly once (reminder fired or
    /// marked done from the dashboard). Never reset.
    pub reminded: bool,
}

impl ScheduledEvent {
    pub fn new(title: impl Into<String>, datetime: DateTime<FixedOffset>) -> Self {
        Self {
            title: title.into(),
            datetime,
            reminded: false,
        }
    }

    /// Dedup key: exact (title, serialized datetime) equality.
    fn key(&self) -> (String, String) {
        (self.title.clone(), self.datetime.to_rfc3339())
    }
}

/// The sole durable ownership point for scheduled events.
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all events. A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<ScheduledEvent>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Replace the whole store. Writes to a sibling temp file, then
    /// renames over the target.
    pub fn save(&self, events: &[ScheduledEvent]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(events).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let tmp = self.path.with_extension("json.tmp");
        let write = fs::write(&tmp, json).and_then(|_| fs::rename(&tmp, &self.path));
        write.map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Append one event (read-modify-write of the whole file).
    pub fn append(&self, event: ScheduledEvent) -> Result<(), StoreError> {
        let mut events = self.load()?;
        events.push(event);
        self.save(&events)
    }

    /// Remove exact (title, datetime) duplicates, keeping the first
    /// occurrence of each key in order. Saves and returns the result.
    /// Idempotent: running it again changes nothing.
    pub fn dedup(&self) -> Result<Vec<ScheduledEvent>, StoreError> {
        let events = self.load()?;
        let deduped = dedup_events(events);
        self.save(&deduped)?;
        Ok(deduped)
    }

    /// Flip `reminded` on every event with the given title. Returns
    /// how many events changed.
    pub fn mark_done(&self, title: &str) -> Result<usize, StoreError> {
        let mut events = self.load()?;
        let mut changed = 0;
        for event in events.iter_mut().filter(|e| e.title == title && !e.reminded) {
            event.reminded = true;
            changed += 1;
        }
        if changed > 0 {
            self.save(&events)?;
        }
        Ok(changed)
    }
}

/// Order-preserving, first-occurrence-wins dedup on (title, datetime).
pub fn dedup_events(events: Vec<ScheduledEvent>) -> Vec<ScheduledEvent> {
    let mut seen = std::collections::HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.key()))
        .collect()
}

/// Streak state: `{count}`, bumped by explicit user action only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Streak {
    pub count: u64,
}

/// Persistence for the streak counter, independent of the event model.
pub struct StreakStore {
    path: PathBuf,
}

impl StreakStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Streak, StoreError> {
        if !self.path.exists() {
            return Ok(Streak::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Increment and persist; returns the new count.
    pub fn bump(&self) -> Result<u64, StoreError> {
        let mut streak = self.load()?;
        streak.count += 1;
        let json = serde_json::to_string_pretty(&streak).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(streak.count)
    }
}
