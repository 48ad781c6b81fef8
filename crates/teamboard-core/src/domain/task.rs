use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{MemberId, TaskId};

/// Task status.
///
/// State transitions are unrestricted: any status may move to any other.
/// Only a move *into* `Completed` from another status is significant
/// (it triggers the completion notification and celebration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Does moving from `self` to `next` complete the task?
    pub fn completes_with(self, next: TaskStatus) -> bool {
        next == TaskStatus::Completed && self != TaskStatus::Completed
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task on the board.
///
/// `assigned_to == None` is the unassigned state. On the wire it is the
/// sentinel `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    #[serde(with = "assignee")]
    pub assigned_to: Option<MemberId>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub assigned_date: DateTime<Utc>,
}

impl Task {
    pub fn is_assigned_to(&self, member_id: MemberId) -> bool {
        self.assigned_to == Some(member_id)
    }
}

/// Input for creating a task.
///
/// `due_date` is raw `YYYY-MM-DD` text as entered; the board parses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(with = "assignee")]
    pub assigned_to: Option<MemberId>,
    pub priority: Priority,
    pub due_date: String,
    pub description: String,
}

impl NewTask {
    pub fn new(
        title: impl Into<String>,
        assigned_to: Option<MemberId>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            assigned_to,
            due_date: due_date.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Wire format for an optional assignee: `0` means unassigned.
pub mod assignee {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::ids::MemberId;

    pub const UNASSIGNED: u64 = 0;

    /// `None` for the unassigned sentinel, otherwise the id itself.
    pub fn from_id(id: MemberId) -> Option<MemberId> {
        (id.get() != UNASSIGNED).then_some(id)
    }

    pub fn serialize<S: Serializer>(
        value: &Option<MemberId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.map_or(UNASSIGNED, |id| id.get()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<MemberId>, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        Ok((raw != UNASSIGNED).then(|| MemberId::new(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::pending(TaskStatus::Pending, true)]
    #[case::in_progress(TaskStatus::InProgress, true)]
    #[case::already_completed(TaskStatus::Completed, false)]
    fn completion_only_counts_on_entry(#[case] from: TaskStatus, #[case] expected: bool) {
        assert_eq!(from.completes_with(TaskStatus::Completed), expected);
    }

    #[test]
    fn leaving_completed_is_not_a_completion() {
        assert!(!TaskStatus::Completed.completes_with(TaskStatus::Pending));
        assert!(!TaskStatus::Pending.completes_with(TaskStatus::InProgress));
    }

    #[test]
    fn status_uses_hyphenated_labels() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }

    #[test]
    fn unassigned_is_zero_on_the_wire() {
        let input: NewTask = serde_json::from_value(serde_json::json!({
            "title": "Blog post",
            "assigned_to": 0,
            "priority": "high",
            "due_date": "2025-06-15",
            "description": "",
        }))
        .unwrap();
        assert_eq!(input.assigned_to, None);
        assert_eq!(input.priority, Priority::High);

        let assigned = NewTask::new("Blog post", Some(MemberId::new(7)), "2025-06-15");
        let value = serde_json::to_value(&assigned).unwrap();
        assert_eq!(value["assigned_to"], 7);
    }
}
