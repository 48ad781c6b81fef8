//! Report aggregation: read-only counts over the board.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{MemberId, Task, TaskStatus, TeamMember};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.completed + self.in_progress + self.pending
    }

    fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Pending => self.pending += 1,
        }
    }
}

/// Per-member workload, as shown on the team view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStats {
    pub member_id: MemberId,
    pub name: String,
    pub counts: StatusCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    Week,
    Month,
    Quarter,
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportPeriod::Week => "this week",
            ReportPeriod::Month => "this month",
            ReportPeriod::Quarter => "this quarter",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberFilter {
    #[default]
    All,
    Member(MemberId),
}

/// Parameters of a report request.
///
/// Both filters are accepted but not applied: counts always cover the whole
/// board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub period: ReportPeriod,
    pub member: MemberFilter,
}

/// Pure projections over the current board and registry.
pub struct ReportAggregator;

impl ReportAggregator {
    pub fn count_by_status(tasks: &[Task]) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for task in tasks {
            counts.record(task.status);
        }
        counts
    }

    /// One entry per member, in registry order. Unassigned tasks and tasks
    /// pointing at unknown members are not attributed to anyone.
    pub fn member_stats(members: &[TeamMember], tasks: &[Task]) -> Vec<MemberStats> {
        members
            .iter()
            .map(|member| {
                let mut counts = StatusCounts::default();
                for task in tasks.iter().filter(|t| t.is_assigned_to(member.id)) {
                    counts.record(task.status);
                }
                MemberStats {
                    member_id: member.id,
                    name: member.name.clone(),
                    counts,
                }
            })
            .collect()
    }
}
