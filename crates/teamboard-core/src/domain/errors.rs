//! Errors - エラー型と分類
//!
//! Every error here is local and recoverable. The tracker surfaces each one
//! to the user as a notification before returning it to the caller.

use std::fmt;

use super::notification::NotificationKind;

/// Which bulk operation was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Update,
    Assign,
    Delete,
}

impl BulkAction {
    pub fn verb(self) -> &'static str {
        match self {
            BulkAction::Update => "update",
            BulkAction::Assign => "assign",
            BulkAction::Delete => "delete",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A required field was missing or malformed on a create operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid due date: {0:?}")]
    InvalidDueDate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no tasks selected to {action}")]
    EmptySelection { action: BulkAction },
}

impl TrackerError {
    /// Notification kind used when this error is shown to the user.
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            TrackerError::Validation(_) => NotificationKind::Error,
            TrackerError::EmptySelection { .. } => NotificationKind::Warning,
        }
    }

    /// User-facing text for this error.
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Validation(ValidationError::MissingFields(_)) => {
                "Please fill in all required fields".to_string()
            }
            TrackerError::Validation(ValidationError::InvalidDueDate(raw)) => {
                format!("Invalid due date: {raw}")
            }
            TrackerError::EmptySelection { action } => {
                format!("Please select tasks to {action}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_a_warning() {
        let err = TrackerError::EmptySelection {
            action: BulkAction::Assign,
        };
        assert_eq!(err.notification_kind(), NotificationKind::Warning);
        assert_eq!(err.user_message(), "Please select tasks to assign");
        assert_eq!(err.to_string(), "no tasks selected to assign");
    }

    #[test]
    fn validation_lists_missing_fields() {
        let err: TrackerError = ValidationError::MissingFields(vec!["title", "due_date"]).into();
        assert_eq!(err.notification_kind(), NotificationKind::Error);
        assert_eq!(err.to_string(), "missing required fields: title, due_date");
        assert_eq!(err.user_message(), "Please fill in all required fields");
    }
}
