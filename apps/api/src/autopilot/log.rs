#![allow(dead_code)]

//! Mission log — an append-only, timestamped, status-tagged line sequence.
//!
//! The one controlled exception to append-only semantics is `update_last`,
//! which flips the most recent line in place (loading → success/error)
//! instead of adding a new one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: LogStatus,
    /// Optional grouping tag for sub-steps; the log itself stays a flat
    /// ordered sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_task: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MissionLog {
    entries: Vec<LogEntry>,
}

impl MissionLog {
    pub fn push(&mut self, message: impl Into<String>, status: LogStatus) {
        self.push_tagged(message, status, None);
    }

    pub fn push_tagged(
        &mut self,
        message: impl Into<String>,
        status: LogStatus,
        sub_task: Option<&str>,
    ) {
        self.entries.push(LogEntry {
            id: Uuid::new_v4(),
            message: message.into(),
            timestamp: Utc::now(),
            status,
            sub_task: sub_task.map(str::to_string),
        });
    }

    /// Flips the last line's status and optionally its message. No-op on an
    /// empty log.
    pub fn update_last(&mut self, status: LogStatus, message: Option<String>) {
        if let Some(last) = self.entries.last_mut() {
            last.status = status;
            if let Some(message) = message {
                last.message = message;
            }
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_append_order() {
        let mut log = MissionLog::default();
        log.push("first", LogStatus::Info);
        log.push("second", LogStatus::Loading);

        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_update_last_mutates_only_the_last_entry() {
        let mut log = MissionLog::default();
        log.push("keep me", LogStatus::Info);
        log.push("working...", LogStatus::Loading);

        log.update_last(LogStatus::Success, Some("done.".to_string()));

        assert_eq!(log.entries()[0].message, "keep me");
        assert_eq!(log.entries()[0].status, LogStatus::Info);
        assert_eq!(log.entries()[1].message, "done.");
        assert_eq!(log.entries()[1].status, LogStatus::Success);
        assert_eq!(log.len(), 2, "update never adds a line");
    }

    #[test]
    fn test_update_last_without_message_keeps_text() {
        let mut log = MissionLog::default();
        log.push("working...", LogStatus::Loading);
        log.update_last(LogStatus::Error, None);
        assert_eq!(log.entries()[0].message, "working...");
        assert_eq!(log.entries()[0].status, LogStatus::Error);
    }

    #[test]
    fn test_update_last_on_empty_log_is_noop() {
        let mut log = MissionLog::default();
        log.update_last(LogStatus::Success, Some("ghost".to_string()));
        assert!(log.is_empty());
    }

    #[test]
    fn test_entries_serialize_camel_case_with_optional_sub_task() {
        let mut log = MissionLog::default();
        log.push_tagged("tagged", LogStatus::Info, Some("Scouting"));
        log.push("plain", LogStatus::Info);

        let json = serde_json::to_value(log.entries()).unwrap();
        assert_eq!(json[0]["subTask"], "Scouting");
        assert!(json[1].get("subTask").is_none());
        assert_eq!(json[0]["status"], "info");
    }
}
