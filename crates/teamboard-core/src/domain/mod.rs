//! Domain model (ids, members, tasks, notifications, events, errors).

pub mod celebration;
pub mod errors;
pub mod events;
pub mod ids;
pub mod member;
pub mod notification;
pub mod task;

pub use self::celebration::Celebration;
pub use self::errors::{BulkAction, TrackerError, ValidationError};
pub use self::events::TrackerEvent;
pub use self::ids::{MemberId, NotificationId, TaskId};
pub use self::member::{Level, NewMember, Role, TeamMember};
pub use self::notification::{Notification, NotificationKind};
pub use self::task::{NewTask, Priority, Task, TaskStatus};
