use std::collections::{HashSet, VecDeque};

use crate::ids::CommandId;

pub const DEFAULT_DEDUP_CAPACITY: usize = 100;

/// Bounded memory of executed command ids.
///
/// Holds at most `capacity` ids; inserting past the limit evicts the oldest.
/// An evicted id may be executed again if it reappears.
#[derive(Debug, Clone)]
pub struct CommandDeduplicator {
    order: VecDeque<CommandId>,
    members: HashSet<CommandId>,
    capacity: usize,
}

impl CommandDeduplicator {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    pub fn seen(&self, id: &CommandId) -> bool {
        self.members.contains(id)
    }

    pub fn mark_seen(&mut self, id: CommandId) {
        if self.members.contains(&id) {
            return;
        }
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.members.insert(id.clone());
        self.order.push_back(id);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl Default for CommandDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> CommandId {
        CommandId::new(format!("cmd-{n}"))
    }

    #[test]
    fn test_unknown_id_is_not_seen() {
        let dedup = CommandDeduplicator::default();
        assert!(!dedup.seen(&id(1)));
        assert!(dedup.is_empty());
    }

    #[test]
    fn test_mark_seen_is_idempotent() {
        let mut dedup = CommandDeduplicator::default();
        dedup.mark_seen(id(1));
        dedup.mark_seen(id(1));
        assert!(dedup.seen(&id(1)));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut dedup = CommandDeduplicator::default();
        for n in 0..101 {
            dedup.mark_seen(id(n));
        }

        assert_eq!(dedup.len(), DEFAULT_DEDUP_CAPACITY);
        assert!(!dedup.seen(&id(0)));
        assert!(dedup.seen(&id(1)));
        assert!(dedup.seen(&id(100)));
    }

    #[test]
    fn test_remark_does_not_refresh_position() {
        let mut dedup = CommandDeduplicator::new(2);
        dedup.mark_seen(id(1));
        dedup.mark_seen(id(2));
        dedup.mark_seen(id(1));
        dedup.mark_seen(id(3));

        assert!(!dedup.seen(&id(1)));
        assert!(dedup.seen(&id(2)));
        assert!(dedup.seen(&id(3)));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut dedup = CommandDeduplicator::new(0);
        dedup.mark_seen(id(1));
        assert_eq!(dedup.capacity(), 1);
        assert!(dedup.seen(&id(1)));
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut dedup = CommandDeduplicator::default();
        dedup.mark_seen(id(1));
        dedup.clear();
        assert!(!dedup.seen(&id(1)));
        assert_eq!(dedup.len(), 0);
    }
}
