//! In-memory record of every remote call.
//!
//! Entries are kept newest-first. The log never deduplicates and is not
//! persisted; when a capacity is configured the oldest entries fall off the
//! tail, otherwise it grows for the life of the session.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::MonotonicClock;

/// HTTP verbs the store client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub method: Method,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    pub response_body: Value,
}

/// Append-only, newest-first call log. Safe to share across tasks.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<VecDeque<CallLogEntry>>,
    capacity: Option<NonZeroUsize>,
    ids: MonotonicClock,
}

impl AuditLog {
    /// Unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that keeps at most `capacity` entries (`None` = unbounded).
    pub fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Record a call and return the stored entry.
    pub fn record(
        &self,
        method: Method,
        url: impl Into<String>,
        request_body: Option<Value>,
        response_body: Value,
    ) -> CallLogEntry {
        let entry = CallLogEntry {
            id: self.ids.next(),
            timestamp: Utc::now(),
            method,
            url: url.into(),
            request_body,
            response_body,
        };

        let mut entries = self.entries.lock().unwrap();
        entries.push_front(entry.clone());
        if let Some(cap) = self.capacity {
            entries.truncate(cap.get());
        }
        entry
    }

    /// Snapshot of all entries, newest first.
    pub fn entries(&self) -> Vec<CallLogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_empty() {
        let log = AuditLog::new();
        assert!(log.is_empty());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn entries_are_newest_first() {
        let log = AuditLog::new();
        log.record(Method::Post, "/a", Some(json!({"n": 1})), json!({}));
        log.record(Method::Get, "/b", None, json!({}));
        log.record(Method::Delete, "/c", None, json!({}));

        let urls: Vec<_> = log.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/c", "/b", "/a"]);
    }

    #[test]
    fn ids_increase_with_insertion() {
        let log = AuditLog::new();
        let first = log.record(Method::Get, "/a", None, json!({}));
        let second = log.record(Method::Get, "/a", None, json!({}));
        assert!(second.id > first.id);
    }

    #[test]
    fn identical_calls_are_not_deduplicated() {
        let log = AuditLog::new();
        for _ in 0..3 {
            log.record(Method::Get, "/same", None, json!({"x": 1}));
        }
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn snapshot_is_detached_from_log() {
        let log = AuditLog::new();
        log.record(Method::Get, "/a", None, json!({}));
        let mut snapshot = log.entries();
        snapshot.clear();
        assert_eq!(log.len(), 1);

        log.record(Method::Get, "/b", None, json!({}));
        assert!(snapshot.is_empty());
    }

    #[test]
    fn capacity_drops_oldest() {
        let log = AuditLog::with_capacity(NonZeroUsize::new(2));
        log.record(Method::Get, "/1", None, json!({}));
        log.record(Method::Get, "/2", None, json!({}));
        log.record(Method::Get, "/3", None, json!({}));

        let urls: Vec<_> = log.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/3", "/2"]);
    }

    #[test]
    fn smallest_capacity_still_keeps_the_latest_call() {
        let log = AuditLog::with_capacity(NonZeroUsize::new(1));
        log.record(Method::Post, "/1", None, json!({}));
        let latest = log.record(Method::Get, "/2", None, json!({}));
        assert_eq!(log.entries(), vec![latest]);
    }

    #[test]
    fn entry_serializes_uppercase_method_and_skips_missing_request() {
        let log = AuditLog::new();
        let entry = log.record(Method::Delete, "/x", None, json!({"ok": true}));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["method"], "DELETE");
        assert!(value.get("request_body").is_none());
        assert_eq!(value["response_body"], json!({"ok": true}));
    }
}
