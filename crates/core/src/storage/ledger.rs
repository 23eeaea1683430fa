use crate::domain::signal::NotificationKey;
use std::collections::HashSet;

/// Keys already announced during this process lifetime.
///
/// Grows by one entry per (symbol, UTC day) ever notified and is never pruned;
/// a new day produces new keys, so stale entries are simply never consulted again.
#[derive(Debug, Default)]
pub struct NotificationLedger {
    sent: HashSet<NotificationKey>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self, key: &NotificationKey) -> bool {
        !self.sent.contains(key)
    }

    pub fn mark_notified(&mut self, key: NotificationKey) {
        self.sent.insert(key);
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }
}
