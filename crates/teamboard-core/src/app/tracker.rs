//! Tracker - the single mutator over members, tasks and notifications.
//!
//! Every user action goes through a `&mut self` method here. Each method
//! runs to completion, updates the owning component, posts its
//! notifications and emits events before returning, so callers never see a
//! half-applied operation.
//!
//! # 学習ポイント
//! - コンポーネントは状態だけを持ち、通知とイベントはここで一括して出す
//! - 失敗も通知になる（`reject()` で error / warning を投稿してから返す）
//! - 期限は `TimerQueue` に積むだけ。発火は `advance()` / `TimerDriver` 側

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::board::{StatusChange, TaskBoard};
use crate::config::TrackerConfig;
use crate::domain::task::assignee;
use crate::domain::{
    Celebration, MemberId, NewMember, NewTask, Notification, NotificationId, NotificationKind,
    Task, TaskId, TaskStatus, TeamMember, TrackerError, TrackerEvent,
};
use crate::notifications::NotificationCenter;
use crate::ports::{Clock, EventSink, IdGenerator};
use crate::registry::MemberRegistry;
use crate::report::{MemberFilter, MemberStats, ReportAggregator, ReportRequest, StatusCounts};
use crate::seed;
use crate::timers::{TimerAction, TimerId, TimerQueue};

/// Shown in notifications for a task with no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Shown in notifications when an assignee id is not in the registry.
pub const UNKNOWN_MEMBER: &str = "Unknown member";

/// Shown in the celebration when the completing member cannot be resolved.
pub const FALLBACK_CELEBRANT: &str = "Team member";

/// Result of a bulk operation that went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Every task the operation touched, in board order.
    pub affected: Vec<TaskId>,
    /// Tasks that moved into `Completed` (bulk status updates only).
    pub newly_completed: Vec<TaskId>,
}

impl BulkOutcome {
    pub fn count(&self) -> usize {
        self.affected.len()
    }
}

/// Serializable view of the whole tracker.
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub members: Vec<TeamMember>,
    pub tasks: Vec<Task>,
    pub selected: Vec<TaskId>,
    pub notifications: Vec<Notification>,
    pub celebration: Celebration,
    pub counts: StatusCounts,
    pub member_stats: Vec<MemberStats>,
}

/// Tracker はすべての操作の入口
///
/// # 使用例
/// ```ignore
/// let mut tracker = TrackerBuilder::new().build()?;
/// let ann = tracker.add_member(NewMember::new("Ann", Role::ContentCreator, "a@x.com", Level::Junior))?;
/// let task = tracker.create_task(NewTask::new("Write post", Some(ann), "2025-07-01"))?;
/// tracker.update_status(task, TaskStatus::Completed);
/// ```
///
/// # 所有
/// - MemberRegistry / TaskBoard / NotificationCenter を直接所有する
/// - ports（Clock, IdGenerator, EventSink）は `Arc<dyn _>` で保持
pub struct Tracker {
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    sink: Arc<dyn EventSink>,
    members: MemberRegistry,
    board: TaskBoard,
    notifications: NotificationCenter,
    celebration: Celebration,
    celebration_timer: Option<TimerId>,
    timers: TimerQueue<TimerAction>,
}

impl Tracker {
    /// Use `TrackerBuilder` to construct one.
    pub(crate) fn new(
        config: TrackerConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let notifications = NotificationCenter::new(config.notification_ttl());
        Self {
            config,
            clock,
            ids,
            sink,
            members: MemberRegistry::new(),
            board: TaskBoard::new(),
            notifications,
            celebration: Celebration::cleared(),
            celebration_timer: None,
            timers: TimerQueue::new(),
        }
    }

    /// Load the sample members and tasks. Their fixed ids are reserved so
    /// generated ids never collide with them.
    pub fn load_sample_data(&mut self) {
        for member in seed::sample_members() {
            self.ids.reserve(member.id.get());
            self.members.insert(member);
        }
        for task in seed::sample_tasks() {
            self.ids.reserve(task.id.get());
            self.board.insert(task);
        }
        info!(
            members = self.members.len(),
            tasks = self.board.len(),
            "sample data loaded"
        );
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ========================================
    // Members
    // ========================================

    pub fn add_member(&mut self, input: NewMember) -> Result<MemberId, TrackerError> {
        let (id, name) = match self.members.add(input, self.ids.as_ref()) {
            Ok(member) => (member.id, member.name.clone()),
            Err(err) => return Err(self.reject(err.into())),
        };
        info!(member = %id, %name, "member added");
        self.post(
            format!("{name} has been added to the team!"),
            NotificationKind::Success,
        );
        Ok(id)
    }

    /// Remove a member and unassign their tasks in the same step.
    /// Unknown ids are ignored.
    pub fn remove_member(&mut self, id: MemberId) -> Option<TeamMember> {
        let Some(member) = self.members.remove(id) else {
            debug!(member = %id, "remove_member: unknown member, ignoring");
            return None;
        };
        let unassigned = self.board.unassign_member(id);
        info!(
            member = %id,
            unassigned = unassigned.len(),
            "member removed"
        );
        self.post(
            format!("{} has been removed from the team", member.name),
            NotificationKind::Warning,
        );
        Some(member)
    }

    pub fn members(&self) -> &[TeamMember] {
        self.members.list()
    }

    pub fn member(&self, id: MemberId) -> Option<&TeamMember> {
        self.members.get(id)
    }

    // ========================================
    // Tasks
    // ========================================

    pub fn create_task(&mut self, input: NewTask) -> Result<TaskId, TrackerError> {
        let now = self.clock.now();
        let (id, title, assigned_to) = match self.board.create(input, self.ids.as_ref(), now) {
            Ok(task) => (task.id, task.title.clone(), task.assigned_to),
            Err(err) => return Err(self.reject(err.into())),
        };
        let member_name = self.display_name(assigned_to);
        info!(task = %id, %title, assignee = %member_name, "task created");
        self.post(
            format!("Task \"{title}\" assigned to {member_name}"),
            NotificationKind::Success,
        );
        Ok(id)
    }

    /// Set a task's status. Moving into `Completed` posts the completion
    /// notification and starts the celebration. Unknown ids are ignored.
    pub fn update_status(&mut self, id: TaskId, status: TaskStatus) -> Option<StatusChange> {
        let Some(change) = self.board.update_status(id, status) else {
            debug!(task = %id, "update_status: unknown task, ignoring");
            return None;
        };
        debug!(task = %id, from = %change.previous, to = %change.current, "status updated");
        if change.is_completion() {
            let celebrant = change
                .assigned_to
                .and_then(|m| self.members.name_of(m))
                .unwrap_or(FALLBACK_CELEBRANT)
                .to_string();
            let member_name = self.display_name(change.assigned_to);
            self.post(
                completion_message(&change.title, &member_name),
                NotificationKind::Success,
            );
            self.celebrate(&celebrant, &change.title);
        }
        Some(change)
    }

    pub fn toggle_selection(&mut self, id: TaskId) -> Option<bool> {
        let selected = self.board.toggle_selection(id);
        if selected.is_none() {
            debug!(task = %id, "toggle_selection: unknown task, ignoring");
        }
        selected
    }

    pub fn toggle_select_all(&mut self) -> bool {
        self.board.toggle_select_all()
    }

    /// Set the status of every selected task.
    ///
    /// Each task that newly completes gets its own completion notification
    /// (no celebration); one summary notification follows.
    pub fn bulk_update_status(&mut self, status: TaskStatus) -> Result<BulkOutcome, TrackerError> {
        let changes = match self.board.bulk_update_status(status) {
            Ok(changes) => changes,
            Err(err) => return Err(self.reject(err)),
        };
        let mut outcome = BulkOutcome::default();
        for change in &changes {
            outcome.affected.push(change.task_id);
            if change.is_completion() {
                outcome.newly_completed.push(change.task_id);
                let member_name = self.display_name(change.assigned_to);
                self.post(
                    completion_message(&change.title, &member_name),
                    NotificationKind::Success,
                );
            }
        }
        info!(
            count = outcome.count(),
            completed = outcome.newly_completed.len(),
            %status,
            "bulk status update"
        );
        self.post(
            format!("Updated status of {} tasks to {status}", outcome.count()),
            NotificationKind::Success,
        );
        Ok(outcome)
    }

    pub fn bulk_assign(&mut self, member_id: MemberId) -> Result<BulkOutcome, TrackerError> {
        let affected = match self.board.bulk_assign(member_id) {
            Ok(affected) => affected,
            Err(err) => return Err(self.reject(err)),
        };
        let member_name = self.display_name(Some(member_id));
        if assignee::from_id(member_id).is_some() && !self.members.contains(member_id) {
            warn!(member = %member_id, "bulk_assign: tasks assigned to an unknown member");
        }
        info!(count = affected.len(), member = %member_id, "bulk assign");
        self.post(
            format!("Assigned {} tasks to {member_name}", affected.len()),
            NotificationKind::Success,
        );
        Ok(BulkOutcome {
            affected,
            newly_completed: Vec::new(),
        })
    }

    pub fn bulk_delete(&mut self) -> Result<BulkOutcome, TrackerError> {
        let removed = match self.board.bulk_delete() {
            Ok(removed) => removed,
            Err(err) => return Err(self.reject(err)),
        };
        info!(count = removed.len(), "bulk delete");
        self.post(
            format!("Deleted {} tasks", removed.len()),
            NotificationKind::Warning,
        );
        Ok(BulkOutcome {
            affected: removed.into_iter().map(|t| t.id).collect(),
            newly_completed: Vec::new(),
        })
    }

    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let Some(task) = self.board.delete(id) else {
            debug!(task = %id, "delete_task: unknown task, ignoring");
            return None;
        };
        info!(task = %id, "task deleted");
        self.post(
            format!("Task \"{}\" has been deleted", task.title),
            NotificationKind::Warning,
        );
        Some(task)
    }

    pub fn tasks(&self) -> &[Task] {
        self.board.list()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.board.get(id)
    }

    pub fn is_selected(&self, id: TaskId) -> bool {
        self.board.is_selected(id)
    }

    pub fn selected_ids(&self) -> Vec<TaskId> {
        self.board.selected_ids()
    }

    pub fn selected_count(&self) -> usize {
        self.board.selected_count()
    }

    // ========================================
    // Notifications
    // ========================================

    /// Post a notification. It expires after the configured ttl.
    pub fn post(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = self.ids.generate_notification_id();
        let now = self.clock.now();
        let notification = self
            .notifications
            .post(id, message, kind, now, &mut self.timers)
            .clone();
        self.sink
            .emit(&TrackerEvent::NotificationPosted { notification });
        id
    }

    /// Remove a notification before it expires. Returns `false` if it is
    /// already gone.
    pub fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        if self.notifications.dismiss(id, &mut self.timers).is_none() {
            debug!(notification = %id, "dismiss: already gone");
            return false;
        }
        self.sink.emit(&TrackerEvent::NotificationDismissed { id });
        true
    }

    /// Active notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.list()
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    // ========================================
    // Reports
    // ========================================

    pub fn status_counts(&self) -> StatusCounts {
        ReportAggregator::count_by_status(self.board.list())
    }

    pub fn member_stats(&self) -> Vec<MemberStats> {
        ReportAggregator::member_stats(self.members.list(), self.board.list())
    }

    /// Announce a generated report. No document is produced and the filters
    /// do not change any counts.
    pub fn generate_report(&mut self, request: ReportRequest) -> NotificationId {
        let scope = match request.member {
            MemberFilter::All => "all team members".to_string(),
            MemberFilter::Member(id) => self.display_name(Some(id)),
        };
        info!(period = ?request.period, member = ?request.member, "report generated");
        self.post(
            format!("Performance report generated ({}, {scope})", request.period),
            NotificationKind::Success,
        )
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            members: self.members.list().to_vec(),
            tasks: self.board.list().to_vec(),
            selected: self.board.selected_ids(),
            notifications: self.notifications.list(),
            celebration: self.celebration.clone(),
            counts: self.status_counts(),
            member_stats: self.member_stats(),
        }
    }

    // ========================================
    // Timers
    // ========================================

    /// `now` までに期限が来たタイマーをすべて発火する
    ///
    /// # 発火内容
    /// - `ExpireNotification`: 通知を消して `NotificationExpired` を emit
    /// - `ClearCelebration`: お祝いを消して `CelebrationCleared` を emit
    ///
    /// Returns how many fired. Cancelled timers never fire.
    pub fn advance(&mut self, now: DateTime<Utc>) -> usize {
        let fired = self.timers.pop_due(now);
        let count = fired.len();
        for (_, action) in fired {
            match action {
                TimerAction::ExpireNotification(id) => {
                    if self.notifications.expire(id).is_some() {
                        self.sink.emit(&TrackerEvent::NotificationExpired { id });
                    }
                }
                TimerAction::ClearCelebration => {
                    self.celebration_timer = None;
                    self.celebration = Celebration::cleared();
                    self.sink.emit(&TrackerEvent::CelebrationCleared);
                }
            }
        }
        count
    }

    /// `advance` to the clock's current time.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.advance(now)
    }

    pub fn next_deadline(&mut self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    fn celebrate(&mut self, member_name: &str, task_title: &str) {
        // a newer celebration owns the clear timer
        if let Some(timer) = self.celebration_timer.take() {
            self.timers.cancel(timer);
        }
        self.celebration = Celebration::for_completion(member_name, task_title);
        let due_at = self.clock.now() + self.config.celebration_ttl();
        self.celebration_timer = Some(self.timers.schedule(due_at, TimerAction::ClearCelebration));
        self.sink.emit(&TrackerEvent::CelebrationStarted {
            celebration: self.celebration.clone(),
        });
    }

    fn reject(&mut self, err: TrackerError) -> TrackerError {
        warn!(error = %err, "operation rejected");
        self.post(err.user_message(), err.notification_kind());
        err
    }

    /// `Unassigned` for no assignee (or the `0` sentinel), `Unknown member`
    /// for an id missing from the registry.
    fn display_name(&self, id: Option<MemberId>) -> String {
        match id.and_then(assignee::from_id) {
            None => UNASSIGNED.to_string(),
            Some(id) => self
                .members
                .name_of(id)
                .unwrap_or(UNKNOWN_MEMBER)
                .to_string(),
        }
    }
}

fn completion_message(title: &str, member_name: &str) -> String {
    format!("🎉 Task \"{title}\" completed by {member_name}!")
}
