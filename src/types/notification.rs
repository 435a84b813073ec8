//! Notification types for transient on-screen messages.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Notification type categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationType {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Error => "error",
            NotificationType::Warning => "warning",
            NotificationType::Info => "info",
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification ID
    pub id: String,
    /// Notification type (success, error, warning, info)
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            notification_type,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Whether the notification should still be on screen at `now`.
    pub fn is_visible(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serialization() {
        let n = Notification::new(NotificationType::Error, "boom");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "boom");
        assert!(!n.id.is_empty());
    }

    #[test]
    fn test_visibility_window() {
        let n = Notification::new(NotificationType::Info, "hi");
        assert!(n.is_visible(n.timestamp, Duration::seconds(5)));
        assert!(!n.is_visible(n.timestamp + Duration::seconds(6), Duration::seconds(5)));
    }
}
