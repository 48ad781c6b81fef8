//! TimerDriver - 通知とお祝いの期限を実時間で発火させる
//!
//! The tracker itself never sleeps. It keeps a queue of deadlines and fires
//! whatever is due when `tick` is called. `TimerDriver` is the task that
//! calls it: sleep until the earliest deadline, tick, repeat.
//!
//! # 学習ポイント
//! - `Notify` で「新しい期限が入った」ことをドライバに伝える
//! - `watch` チャネルでの停止（worker ループと同じ形）
//! - ロックを握ったまま await しない（sleep の前にガードを落とす）

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::tracker::Tracker;

/// SharedTracker は呼び出し側とドライバで Tracker を共有する
///
/// # 使用例
/// ```ignore
/// let shared = SharedTracker::new(tracker);
/// let driver = TimerDriver::spawn(shared.clone());
/// shared.update(|t| t.post("hello", NotificationKind::Info)).await;
/// ```
#[derive(Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<Tracker>>,
    wake: Arc<Notify>,
}

impl SharedTracker {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Tracker をロックする
    ///
    /// # 起床
    /// - ガードを drop したときにドライバを起こす
    /// - ガード経由で予約された期限（お祝いのクリアなど）も取りこぼさない
    pub async fn lock(&self) -> TrackerGuard<'_> {
        TrackerGuard {
            guard: self.inner.lock().await,
            wake: &self.wake,
        }
    }

    /// Run `f` against the tracker. The driver wakes once the lock is
    /// released.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Tracker) -> R) -> R {
        let mut tracker = self.lock().await;
        f(&mut *tracker)
    }
}

/// TrackerGuard はロック中の Tracker
///
/// drop 時に `Notify` を鳴らす。ドライバは次のループで期限を取り直す。
pub struct TrackerGuard<'a> {
    guard: MutexGuard<'a, Tracker>,
    wake: &'a Notify,
}

impl Deref for TrackerGuard<'_> {
    type Target = Tracker;

    fn deref(&self) -> &Tracker {
        &self.guard
    }
}

impl DerefMut for TrackerGuard<'_> {
    fn deref_mut(&mut self) -> &mut Tracker {
        &mut self.guard
    }
}

impl Drop for TrackerGuard<'_> {
    fn drop(&mut self) {
        self.wake.notify_one();
    }
}

/// TimerDriver は期限の発火ループのハンドル
///
/// # ライフサイクル
/// - `spawn()` で tokio タスクとして起動
/// - `request_shutdown()` で停止を要求（`watch` に true を送る）
/// - `shutdown_and_join()` で停止して終了を待つ
pub struct TimerDriver {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TimerDriver {
    pub fn spawn(shared: SharedTracker) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(timer_loop(shared, shutdown_rx));
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn timer_loop(shared: SharedTracker, mut shutdown_rx: watch::Receiver<bool>) {
    info!("timer driver started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // fire what is due, then find out how long to sleep
        let wait = {
            let mut tracker = shared.inner.lock().await;
            let fired = tracker.tick();
            if fired > 0 {
                debug!(fired, "timers fired");
            }
            let now = tracker.now();
            tracker
                .next_deadline()
                .map(|at| (at - now).to_std().unwrap_or_default())
        };

        let stop = match wait {
            Some(wait) => tokio::select! {
                changed = shutdown_rx.changed() => changed.is_err(),
                _ = shared.wake.notified() => false,
                _ = tokio::time::sleep(wait) => false,
            },
            None => tokio::select! {
                changed = shutdown_rx.changed() => changed.is_err(),
                _ = shared.wake.notified() => false,
            },
        };
        if stop {
            break;
        }
    }
    info!("timer driver stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TrackerBuilder;
    use crate::config::TrackerConfig;
    use crate::domain::{Level, NewMember, NewTask, NotificationKind, Role, TaskStatus, TrackerEvent};
    use crate::ports::TokioClock;
    use crate::ports::event_sink::RecordingEventSink;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn shared(events: Arc<RecordingEventSink>) -> SharedTracker {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let tracker = TrackerBuilder::new()
            .config(TrackerConfig {
                seed_sample_data: false,
                ..TrackerConfig::default()
            })
            .clock(TokioClock::anchored_at(t0))
            .event_sink(events)
            .build()
            .unwrap();
        SharedTracker::new(tracker)
    }

    #[tokio::test(start_paused = true)]
    async fn notification_expires_in_real_time() {
        let events = Arc::new(RecordingEventSink::default());
        let shared = shared(events.clone());
        let driver = TimerDriver::spawn(shared.clone());

        let id = shared
            .update(|t| t.post("hello", NotificationKind::Info))
            .await;

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(shared.lock().await.notifications().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(shared.lock().await.notifications().is_empty());
        assert_eq!(
            events.events().last(),
            Some(&TrackerEvent::NotificationExpired { id })
        );

        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_notification_never_expires() {
        let events = Arc::new(RecordingEventSink::default());
        let shared = shared(events.clone());
        let driver = TimerDriver::spawn(shared.clone());

        let id = shared
            .update(|t| t.post("bye", NotificationKind::Warning))
            .await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(shared.update(|t| t.dismiss_notification(id)).await);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(
            events.names(),
            vec!["notification_posted", "notification_dismissed"]
        );

        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn mutation_through_lock_wakes_driver() {
        let events = Arc::new(RecordingEventSink::default());
        let shared = shared(events.clone());
        let driver = TimerDriver::spawn(shared.clone());

        // notifications posted here expire at 5000 ms
        let task = shared
            .update(|t| {
                let ann = t.add_member(NewMember::new("Ann", Role::default(), "a@x.com", Level::Junior))?;
                t.create_task(NewTask::new("Write post", Some(ann), "2025-07-01"))
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        shared.lock().await.update_status(task, TaskStatus::Completed);
        assert!(shared.lock().await.celebration().show);

        // celebration clears at 4000 ms, ahead of the earlier-scheduled expiries
        tokio::time::sleep(Duration::from_millis(3001)).await;
        let tracker = shared.lock().await;
        assert!(!tracker.celebration().show);
        assert_eq!(tracker.notifications().len(), 3);
        drop(tracker);

        driver.shutdown_and_join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_idle_driver() {
        let shared = shared(Arc::new(RecordingEventSink::default()));
        let driver = TimerDriver::spawn(shared);
        tokio::task::yield_now().await;
        driver.shutdown_and_join().await;
    }
}
