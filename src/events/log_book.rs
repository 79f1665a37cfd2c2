use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::LogEntry;

pub const DEFAULT_LOG_CAPACITY: usize = 30;

/// Newest-first, capacity-bounded log of engine activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogBook {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    total: u64,
}

impl LogBook {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_front(LogEntry::new(message));
        self.entries.truncate(self.capacity);
        self.total += 1;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries ever pushed, including dropped and cleared ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }

    /// Entries pushed after `total` was observed, oldest first.
    pub fn since(&self, total: u64) -> Vec<&LogEntry> {
        let fresh = self.total.saturating_sub(total) as usize;
        let mut out: Vec<_> = self.entries.iter().take(fresh).collect();
        out.reverse();
        out
    }
}

impl Default for LogBook {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
