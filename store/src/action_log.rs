//! Bounded in-memory action log

use chrono::Utc;
use sentinel_core::{LogEntry, LogLevel};
use std::collections::VecDeque;

/// Default number of entries kept
pub const DEFAULT_CAPACITY: usize = 500;

/// Record of user-visible actions, oldest entries evicted first
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

impl ActionLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Append an entry, returning its id
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            id,
            timestamp: Utc::now(),
            message: message.into(),
            level,
        });
        id
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.record(LogLevel::Info, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.record(LogLevel::Warning, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.record(LogLevel::Error, message)
    }

    /// Entries, newest first
    pub fn newest_first(&self) -> Vec<LogEntry> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = ActionLog::default();
        log.info("Started disk space analysis on all servers.");
        log.warning("Low disk space warning for DEV-APP-01 (88% used).");
        log.error("Failed to connect to BACKUP-01: Connection timed out.");

        let entries = log.newest_first();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[2].id, 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = ActionLog::new(2);
        log.info("one");
        log.info("two");
        let id = log.info("three");

        let entries = log.newest_first();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[1].message, "two");
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let mut log = ActionLog::default();
        log.warning("careful");
        let json = serde_json::to_value(&log.newest_first()[0]).unwrap();
        assert_eq!(json["level"], "WARNING");
    }
}
