use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::{DashboardError, Result};
use crate::types::{ActivityEvent, EventKind};

pub const DEFAULT_FEED_CAPACITY: usize = 100;

/// Live chat and activity entries, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFeed {
    events: VecDeque<ActivityEvent>,
    capacity: usize,
}

impl ActivityFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    pub fn push(&mut self, event: ActivityEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// Posts a chat message from the dashboard user.
    pub fn send_message(&mut self, text: &str) -> Result<ActivityEvent> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DashboardError::EmptyMessage);
        }
        let event = ActivityEvent::new("You", text, EventKind::Message);
        self.push(event.clone());
        Ok(event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter()
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message() {
        let mut feed = ActivityFeed::default();
        let event = feed.send_message("  status?  ").unwrap();
        assert_eq!(event.source, "You");
        assert_eq!(event.text, "status?");
        assert_eq!(event.kind, EventKind::Message);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut feed = ActivityFeed::default();
        assert_eq!(feed.send_message("   ").unwrap_err(), DashboardError::EmptyMessage);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_feed_is_bounded() {
        let mut feed = ActivityFeed::new(3);
        for i in 0..5 {
            feed.push(ActivityEvent::new("Agent 1", format!("event {}", i), EventKind::Status));
        }
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.iter().next().unwrap().text, "event 4");
    }
}
