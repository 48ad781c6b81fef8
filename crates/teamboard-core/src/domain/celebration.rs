//! Celebration signal shown when a task is completed.

use serde::{Deserialize, Serialize};

pub const CELEBRATION_HEADLINE: &str = "🎉 Awesome Work! 🎉";

/// Ephemeral UI signal. `show == false` is the cleared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Celebration {
    pub show: bool,
    pub message: String,
    pub sub_message: String,
}

impl Celebration {
    pub fn for_completion(member_name: &str, task_title: &str) -> Self {
        Self {
            show: true,
            message: CELEBRATION_HEADLINE.to_string(),
            sub_message: format!("{member_name} completed: \"{task_title}\""),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }
}
