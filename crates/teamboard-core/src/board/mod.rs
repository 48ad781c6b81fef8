//! Task board: the ordered set of tasks plus the bulk-selection side-table.

mod selection;

pub use selection::Selection;

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::task::assignee;
use crate::domain::{
    BulkAction, MemberId, NewTask, Task, TaskId, TaskStatus, TrackerError, ValidationError,
};
use crate::ports::IdGenerator;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// One task's status before and after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: TaskId,
    pub title: String,
    pub assigned_to: Option<MemberId>,
    pub previous: TaskStatus,
    pub current: TaskStatus,
}

impl StatusChange {
    /// Did this update move the task into `Completed`?
    pub fn is_completion(&self) -> bool {
        self.previous.completes_with(self.current)
    }
}

/// Owns every task, in insertion order.
///
/// Design:
/// - `tasks` is the single source of truth for task records.
/// - `selection` holds TaskIds only and never outlives the task it names.
#[derive(Debug, Default, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    selection: Selection,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check required fields and parse the due date.
    pub fn validate(input: &NewTask) -> Result<NaiveDate, ValidationError> {
        let mut missing = Vec::new();
        if input.title.trim().is_empty() {
            missing.push("title");
        }
        // `0` is the unassigned sentinel, not a member
        if input.assigned_to.and_then(assignee::from_id).is_none() {
            missing.push("assigned_to");
        }
        let due_date = input.due_date.trim();
        if due_date.is_empty() {
            missing.push("due_date");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        NaiveDate::parse_from_str(due_date, DUE_DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDueDate(input.due_date.clone()))
    }

    /// Append a new pending task. `created_at` and `assigned_date` are both
    /// `now`.
    pub fn create(
        &mut self,
        input: NewTask,
        ids: &dyn IdGenerator,
        now: DateTime<Utc>,
    ) -> Result<&Task, ValidationError> {
        let due_date = Self::validate(&input)?;
        let task = Task {
            id: ids.generate_task_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            assigned_to: input.assigned_to,
            priority: input.priority,
            due_date,
            status: TaskStatus::Pending,
            created_at: now,
            assigned_date: now,
        };
        Ok(self.push(task))
    }

    /// Insert a task that already carries an id (sample data).
    pub(crate) fn insert(&mut self, task: Task) -> &Task {
        self.push(task)
    }

    /// Set the status of one task. `None` if the id is unknown.
    pub fn update_status(&mut self, id: TaskId, status: TaskStatus) -> Option<StatusChange> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        Some(apply_status(task, status))
    }

    /// Flip the selection of one task. Returns the new state, or `None` if
    /// the id is unknown.
    pub fn toggle_selection(&mut self, id: TaskId) -> Option<bool> {
        if !self.contains(id) {
            return None;
        }
        Some(self.selection.toggle(id))
    }

    /// Clear the selection if every task is selected, otherwise select every
    /// task. An empty board counts as fully selected, so this is a no-op
    /// there. Returns whether all tasks are selected afterwards.
    pub fn toggle_select_all(&mut self) -> bool {
        let all_selected = self.tasks.iter().all(|t| self.selection.contains(t.id));
        if all_selected {
            self.selection.clear();
            false
        } else {
            self.selection.select_all(self.tasks.iter().map(|t| t.id));
            true
        }
    }

    /// Set the status of every selected task and deselect them.
    pub fn bulk_update_status(
        &mut self,
        status: TaskStatus,
    ) -> Result<Vec<StatusChange>, TrackerError> {
        let targets = self.selected_or_err(BulkAction::Update)?;
        let mut changes = Vec::with_capacity(targets.len());
        for task in self.tasks.iter_mut().filter(|t| targets.contains(&t.id)) {
            changes.push(apply_status(task, status));
            self.selection.deselect(task.id);
        }
        Ok(changes)
    }

    /// Assign every selected task to `member_id` and deselect them.
    /// Assigning to the unassigned sentinel `0` unassigns.
    pub fn bulk_assign(&mut self, member_id: MemberId) -> Result<Vec<TaskId>, TrackerError> {
        let targets = self.selected_or_err(BulkAction::Assign)?;
        let mut assigned = Vec::with_capacity(targets.len());
        let assigned_to = assignee::from_id(member_id);
        for task in self.tasks.iter_mut().filter(|t| targets.contains(&t.id)) {
            task.assigned_to = assigned_to;
            self.selection.deselect(task.id);
            assigned.push(task.id);
        }
        Ok(assigned)
    }

    /// Delete every selected task.
    ///
    /// The target ids are collected before anything is removed; exactly
    /// those tasks go.
    pub fn bulk_delete(&mut self) -> Result<Vec<Task>, TrackerError> {
        let targets = self.selected_or_err(BulkAction::Delete)?;
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| targets.contains(&t.id));
        self.tasks = kept;
        for task in &removed {
            self.selection.deselect(task.id);
        }
        Ok(removed)
    }

    /// Delete one task. `None` if the id is unknown.
    pub fn delete(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        self.selection.deselect(id);
        Some(self.tasks.remove(index))
    }

    /// Unassign every task pointing at `member_id`. Tasks are kept.
    pub fn unassign_member(&mut self, member_id: MemberId) -> Vec<TaskId> {
        self.tasks
            .iter_mut()
            .filter(|t| t.is_assigned_to(member_id))
            .map(|t| {
                t.assigned_to = None;
                t.id
            })
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_selected(&self, id: TaskId) -> bool {
        self.selection.contains(id)
    }

    /// Selected task ids, in board order.
    pub fn selected_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| self.selection.contains(t.id))
            .map(|t| t.id)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn selected_or_err(&self, action: BulkAction) -> Result<BTreeSet<TaskId>, TrackerError> {
        let targets: BTreeSet<TaskId> = self.selected_ids().into_iter().collect();
        if targets.is_empty() {
            return Err(TrackerError::EmptySelection { action });
        }
        Ok(targets)
    }

    fn push(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }
}

fn apply_status(task: &mut Task, status: TaskStatus) -> StatusChange {
    let previous = task.status;
    task.status = status;
    StatusChange {
        task_id: task.id,
        title: task.title.clone(),
        assigned_to: task.assigned_to,
        previous,
        current: status,
    }
}
