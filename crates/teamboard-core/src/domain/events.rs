//! Events - ドメインイベント
//!
//! The presentation layer subscribes to these through an `EventSink` to
//! learn when a notification appears or goes away and when the celebration
//! starts or clears.

use serde::{Deserialize, Serialize};

use super::celebration::Celebration;
use super::ids::NotificationId;
use super::notification::Notification;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    NotificationPosted { notification: Notification },
    NotificationDismissed { id: NotificationId },
    NotificationExpired { id: NotificationId },
    CelebrationStarted { celebration: Celebration },
    CelebrationCleared,
}

impl TrackerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerEvent::NotificationPosted { .. } => "notification_posted",
            TrackerEvent::NotificationDismissed { .. } => "notification_dismissed",
            TrackerEvent::NotificationExpired { .. } => "notification_expired",
            TrackerEvent::CelebrationStarted { .. } => "celebration_started",
            TrackerEvent::CelebrationCleared => "celebration_cleared",
        }
    }
}
