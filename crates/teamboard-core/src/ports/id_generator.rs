//! IdGenerator port - ID 生成の抽象化
//!
//! Ids are derived from the clock's millisecond reading, like the
//! timestamp-based ids the tracker has always handed out, but are forced to
//! be strictly increasing. Two entities created in the same millisecond
//! still get distinct ids, and an id is never handed out twice.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ids::{MemberId, NotificationId, TaskId};
use crate::ports::Clock;

/// IdGenerator は一意な ID を生成
///
/// # 不変条件
/// - 同じ ID を二度返さない（種類をまたいでも）
/// - 返す値は単調増加
///
/// # Thread Safety
/// - `Send + Sync` を要求（共有された Tracker から使える）
pub trait IdGenerator: Send + Sync {
    fn generate_member_id(&self) -> MemberId;

    fn generate_task_id(&self) -> TaskId;

    fn generate_notification_id(&self) -> NotificationId;

    /// Make sure no future id is `<= id`. Used after inserting records that
    /// arrived with their own ids (sample data).
    fn reserve(&self, id: u64);
}

/// MonotonicIdGenerator は時計ベースの単調増加 ID
///
/// # アルゴリズム
/// - `max(now_ms, last + 1)` を CAS ループで確定させる
/// - `reserve()` は `fetch_max` で下限を引き上げる
pub struct MonotonicIdGenerator<C> {
    clock: C,
    last: AtomicU64,
}

impl<C: Clock> MonotonicIdGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    fn next_raw(&self) -> u64 {
        let now_ms = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_ms.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

impl<C: Clock> IdGenerator for MonotonicIdGenerator<C> {
    fn generate_member_id(&self) -> MemberId {
        MemberId::new(self.next_raw())
    }

    fn generate_task_id(&self) -> TaskId {
        TaskId::new(self.next_raw())
    }

    fn generate_notification_id(&self) -> NotificationId {
        NotificationId::new(self.next_raw())
    }

    fn reserve(&self, id: u64) {
        self.last.fetch_max(id, Ordering::Relaxed);
    }
}
