use crate::model::notification::{Notification, Severity};
use crate::model::role::DashboardRole;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Receives user-facing outcomes. Nothing is returned to the caller.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

const DEFAULT_CAPACITY: usize = 50;

/// Per-shell queue the UI drains; also mirrors every entry to the log.
pub struct NotificationQueue {
    role: DashboardRole,
    capacity: usize,
    items: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new(role: DashboardRole) -> Self {
        Self::with_capacity(role, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(role: DashboardRole, capacity: usize) -> Self {
        Self {
            role,
            capacity: capacity.max(1),
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Takes everything queued so far, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        items.drain(..).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&self, notification: Notification) {
        let role = self.role;
        match notification.severity {
            Severity::Success => info!(%role, summary = %notification.summary, detail = %notification.detail),
            Severity::Warn => warn!(%role, summary = %notification.summary, detail = %notification.detail),
            Severity::Error => error!(%role, summary = %notification.summary, detail = %notification.detail),
        }

        let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        // oldest entries go first when nobody drains
        while items.len() >= self.capacity {
            items.pop_front();
        }
        items.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_order() {
        let queue = NotificationQueue::new(DashboardRole::Manager);
        queue.notify(Notification::success("one", ""));
        queue.notify(Notification::error("two", ""));

        let drained: Vec<_> = queue.drain().into_iter().map(|n| n.summary).collect();

        assert_eq!(drained, ["one", "two"]);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn bounded() {
        let queue = NotificationQueue::with_capacity(DashboardRole::Finance, 2);
        for summary in ["a", "b", "c"] {
            queue.notify(Notification::warn(summary, ""));
        }

        let drained: Vec<_> = queue.drain().into_iter().map(|n| n.summary).collect();
        assert_eq!(drained, ["b", "c"]);
    }
}
