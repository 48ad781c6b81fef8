//! EventSink port - イベント通知の抽象化
//!
//! The tracker emits a `TrackerEvent` whenever a notification is posted,
//! dismissed or expires and whenever the celebration starts or clears.
//!
//! - **NoopEventSink**: 何もしない
//! - **LogEventSink**: tracing に記録
//! - **BroadcastEventSink**: tokio broadcast で購読者に配送

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::domain::TrackerEvent;

/// EventSink はトラッカーのイベントを受け取る
///
/// `emit` is called while the tracker is mid-operation, so implementations
/// must not block.
///
/// # 設計
/// - 同期 trait（tracker のロック内から呼ばれるので await しない）
/// - 配送の失敗は呼び出し側に返さない（イベントは補助情報）
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &TrackerEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &TrackerEvent) {
        (**self).emit(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &TrackerEvent) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&self, event: &TrackerEvent) {
        match event {
            TrackerEvent::NotificationPosted { notification } => tracing::info!(
                id = %notification.id,
                kind = %notification.kind,
                message = %notification.message,
                "notification posted"
            ),
            other => tracing::debug!(event = other.name(), "tracker event"),
        }
    }
}

/// BroadcastEventSink は購読者全員にイベントを配る
///
/// # 使用例
/// ```ignore
/// let sink = BroadcastEventSink::default();
/// let mut rx = sink.subscribe();
/// let tracker = TrackerBuilder::new().event_sink(sink).build()?;
/// ```
///
/// Slow subscribers lose the oldest events (`RecvError::Lagged`); sending
/// with no subscribers is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    tx: broadcast::Sender<TrackerEvent>,
}

impl BroadcastEventSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TrackerEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastEventSink {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventSink for BroadcastEventSink {
    fn emit(&self, event: &TrackerEvent) {
        // ignore send error: no subscribers yet
        let _ = self.tx.send(event.clone());
    }
}

/// Keeps every event in memory (for testing).
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingEventSink {
    events: std::sync::Mutex<Vec<TrackerEvent>>,
}

#[cfg(test)]
impl RecordingEventSink {
    pub(crate) fn events(&self) -> Vec<TrackerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(TrackerEvent::name).collect()
    }
}

#[cfg(test)]
impl EventSink for RecordingEventSink {
    fn emit(&self, event: &TrackerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationId;

    #[tokio::test]
    async fn broadcast_delivers_to_every_subscriber() {
        let sink = BroadcastEventSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        let event = TrackerEvent::NotificationExpired {
            id: NotificationId::new(1),
        };
        sink.emit(&event);

        assert_eq!(first.recv().await.unwrap(), event);
        assert_eq!(second.recv().await.unwrap(), event);
    }

    #[test]
    fn broadcast_without_subscribers_is_fine() {
        let sink = BroadcastEventSink::default();
        sink.emit(&TrackerEvent::CelebrationCleared);
    }
}
