//! In-memory notification center.
//!
//! Notifications are transient: a bounded ring of recent messages that the
//! API and the terminal status bar read.

use crate::types::{Notification, NotificationType};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Notification center shared by the controller and the bot.
#[derive(Clone)]
pub struct NotificationCenter {
    recent: Arc<Mutex<VecDeque<Notification>>>,
    capacity: usize,
}

impl NotificationCenter {
    /// Create a notification center keeping up to `capacity` recent messages.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Publish a notification.
    pub fn notify(&self, notification_type: NotificationType, message: impl Into<String>) -> Notification {
        let notification = Notification::new(notification_type, message);

        match notification_type {
            NotificationType::Error | NotificationType::Warning => {
                warn!("[{}] {}", notification_type.as_str(), notification.message)
            }
            _ => info!("[{}] {}", notification_type.as_str(), notification.message),
        }

        let mut recent = self.recent.lock().unwrap();
        recent.push_back(notification.clone());
        while recent.len() > self.capacity {
            recent.pop_front();
        }
        notification
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.notify(NotificationType::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.notify(NotificationType::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.notify(NotificationType::Info, message)
    }

    /// Most recent notifications, newest last.
    pub fn recent(&self, limit: usize) -> Vec<Notification> {
        let recent = self.recent.lock().unwrap();
        let start = recent.len().saturating_sub(limit);
        recent.iter().skip(start).cloned().collect()
    }

    /// The newest notification, if any.
    pub fn latest(&self) -> Option<Notification> {
        self.recent.lock().unwrap().back().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_is_bounded() {
        let center = NotificationCenter::new(3);
        for i in 0..5 {
            center.info(format!("msg {}", i));
        }

        let messages: Vec<String> = center.recent(10).into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);
        assert_eq!(center.latest().unwrap().message, "msg 4");
    }

    #[test]
    fn test_recent_limit() {
        let center = NotificationCenter::new(10);
        center.success("a");
        center.error("b");

        let recent = center.recent(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].notification_type, NotificationType::Error);
    }
}
