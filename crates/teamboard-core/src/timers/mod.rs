//! Timers: cancellable deferred actions keyed by deadline.
//!
//! Notification expiry and the celebration auto-clear are both scheduled
//! here. The queue never fires on its own: the owner calls `pop_due(now)`
//! (directly, or through the async `TimerDriver`) and applies whatever
//! comes out.

mod queue;

pub use queue::{TimerId, TimerQueue};

use crate::domain::NotificationId;

/// What the tracker does when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    ExpireNotification(NotificationId),
    ClearCelebration,
}
