use chrono::{DateTime, Local};

use super::dedup::CommandDeduplicator;
use super::health::HealthTracker;

/// Per-run state owned by the sync worker.
///
/// A fresh session is built on every start, so a restart always begins
/// with an empty dedup memory and a new `start_time`.
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub start_time: DateTime<Local>,
    pub processed: CommandDeduplicator,
    pub last_known_clipboard: Option<String>,
    pub health: HealthTracker,
}

impl AgentSession {
    pub fn new(start_time: DateTime<Local>, dedup_capacity: usize, failure_threshold: u32) -> Self {
        Self {
            start_time,
            processed: CommandDeduplicator::new(dedup_capacity),
            last_known_clipboard: None,
            health: HealthTracker::new(failure_threshold),
        }
    }

    /// True when `content` matches the last observed clipboard text.
    pub fn is_known(&self, content: &str) -> bool {
        self.last_known_clipboard.as_deref() == Some(content)
    }

    pub fn remember(&mut self, content: impl Into<String>) {
        self.last_known_clipboard = Some(content.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::health::ConnectionHealth;

    #[test]
    fn test_new_session_is_blank() {
        let now = Local::now();
        let session = AgentSession::new(now, 100, 3);

        assert_eq!(session.start_time, now);
        assert!(session.processed.is_empty());
        assert!(session.last_known_clipboard.is_none());
        assert_eq!(session.health.state(), ConnectionHealth::Healthy);
    }

    #[test]
    fn test_remember_updates_known_content() {
        let mut session = AgentSession::new(Local::now(), 100, 3);
        assert!(!session.is_known("a"));
        session.remember("a");
        assert!(session.is_known("a"));
        assert!(!session.is_known("b"));
    }
}
