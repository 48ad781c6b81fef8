//! Domain identifiers (strongly-typed IDs).
//!
//! Every entity carries a numeric id handed out by an `IdGenerator`. Ids are
//! monotonic and never reused within a session.
//!
//! ## Phantom Type パターン
//! `Id<T>` というジェネリック型で共通実装を提供しつつ、
//! `T` は実行時には使わないマーカー型として、
//! コンパイル時の型安全性を提供します（MemberId と TaskId は混同できない）。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"member-", "task-", "notification-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic numeric id.
///
/// Serialized as the bare number so the wire form matches the numeric ids
/// the presentation layer works with.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T: IdMarker> {
    value: u64,
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> u64 {
        self.value
    }
}

impl<T: IdMarker> From<u64> for Id<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.value)
    }
}

impl<T: IdMarker> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, T: IdMarker> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Member {}

impl IdMarker for Member {
    fn prefix() -> &'static str {
        "member-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Notification {}

impl IdMarker for Notification {
    fn prefix() -> &'static str {
        "notification-"
    }
}

/// Identifier of a team member.
pub type MemberId = Id<Member>;

/// Identifier of a task on the board.
pub type TaskId = Id<Task>;

/// Identifier of a posted notification.
pub type NotificationId = Id<Notification>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_type_prefix() {
        assert_eq!(MemberId::new(3).to_string(), "member-3");
        assert_eq!(TaskId::new(3).to_string(), "task-3");
        assert_eq!(NotificationId::new(3).to_string(), "notification-3");
        // let _: MemberId = TaskId::new(3); // <- does not compile
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        let id = TaskId::new(1_717_000_000_000);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1717000000000");

        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ids_order_by_value() {
        assert!(MemberId::new(1) < MemberId::new(2));
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<MemberId>(), size_of::<u64>());
    }
}
