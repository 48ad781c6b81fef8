//! Notification center: newest-first queue of transient messages.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Notification, NotificationId, NotificationKind};
use crate::timers::{TimerAction, TimerId, TimerQueue};

/// Active notifications, newest first, each with its own expiry timer.
#[derive(Debug)]
pub struct NotificationCenter {
    ttl: Duration,
    items: VecDeque<Notification>,
    expiry: HashMap<NotificationId, TimerId>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
            expiry: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Prepend a notification and schedule its removal at `now + ttl`.
    pub fn post(
        &mut self,
        id: NotificationId,
        message: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Utc>,
        timers: &mut TimerQueue<TimerAction>,
    ) -> &Notification {
        let expires_at = now + self.ttl;
        let timer = timers.schedule(expires_at, TimerAction::ExpireNotification(id));
        self.expiry.insert(id, timer);
        self.items.push_front(Notification {
            id,
            message: message.into(),
            kind,
            timestamp: now,
            expires_at,
        });
        &self.items[0]
    }

    /// Remove a notification now and cancel its expiry timer.
    ///
    /// Unknown or already removed ids return `None`.
    pub fn dismiss(
        &mut self,
        id: NotificationId,
        timers: &mut TimerQueue<TimerAction>,
    ) -> Option<Notification> {
        if let Some(timer) = self.expiry.remove(&id) {
            timers.cancel(timer);
        }
        self.take(id)
    }

    /// Remove a notification whose expiry timer fired.
    pub fn expire(&mut self, id: NotificationId) -> Option<Notification> {
        self.expiry.remove(&id);
        self.take(id)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn list(&self) -> Vec<Notification> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn take(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.items.iter().position(|n| n.id == id)?;
        self.items.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn center() -> (NotificationCenter, TimerQueue<TimerAction>) {
        (
            NotificationCenter::new(Duration::milliseconds(5000)),
            TimerQueue::new(),
        )
    }

    #[test]
    fn post_prepends_and_schedules_expiry() {
        let (mut center, mut timers) = center();
        center.post(NotificationId::new(1), "first", NotificationKind::Info, t0(), &mut timers);
        let second = center
            .post(NotificationId::new(2), "second", NotificationKind::Success, t0(), &mut timers)
            .clone();

        assert_eq!(center.ttl(), Duration::milliseconds(5000));
        assert_eq!(second.expires_at, t0() + center.ttl());
        let order: Vec<_> = center.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(order, vec!["second", "first"]);
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn dismiss_cancels_only_that_timer() {
        let (mut center, mut timers) = center();
        center.post(NotificationId::new(1), "keep", NotificationKind::Info, t0(), &mut timers);
        center.post(NotificationId::new(2), "drop", NotificationKind::Info, t0(), &mut timers);

        assert!(center.dismiss(NotificationId::new(2), &mut timers).is_some());
        assert!(center.dismiss(NotificationId::new(2), &mut timers).is_none());

        let fired = timers.pop_due(t0() + Duration::milliseconds(5000));
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fired[0].1,
            TimerAction::ExpireNotification(NotificationId::new(1))
        );
    }

    #[test]
    fn expire_is_idempotent() {
        let (mut center, mut timers) = center();
        center.post(NotificationId::new(1), "bye", NotificationKind::Warning, t0(), &mut timers);

        assert!(center.expire(NotificationId::new(1)).is_some());
        assert!(center.expire(NotificationId::new(1)).is_none());
        assert!(center.is_empty());
    }
}
