//! Sample data loaded at startup when `seed_sample_data` is on.

use chrono::{NaiveDate, TimeZone, Utc};

use crate::domain::{Level, MemberId, Priority, Role, Task, TaskId, TaskStatus, TeamMember};

pub fn sample_members() -> Vec<TeamMember> {
    vec![
        TeamMember {
            id: MemberId::new(1),
            name: "Sarah Johnson".into(),
            role: Role::SocialMediaManager,
            email: "sarah@company.com".into(),
            level: Level::Senior,
        },
        TeamMember {
            id: MemberId::new(2),
            name: "Mike Chen".into(),
            role: Role::ContentCreator,
            email: "mike@company.com".into(),
            level: Level::MidLevel,
        },
        TeamMember {
            id: MemberId::new(3),
            name: "Emily Rodriguez".into(),
            role: Role::SeoSpecialist,
            email: "emily@company.com".into(),
            level: Level::Senior,
        },
    ]
}

pub fn sample_tasks() -> Vec<Task> {
    let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
    let midnight = |y, m, d| {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .unwrap_or_default()
    };
    vec![
        Task {
            id: TaskId::new(1),
            title: "Instagram Campaign Launch".into(),
            description: "Create and launch summer campaign".into(),
            assigned_to: Some(MemberId::new(1)),
            priority: Priority::High,
            due_date: day(2025, 6, 10),
            status: TaskStatus::InProgress,
            created_at: midnight(2025, 5, 28),
            assigned_date: midnight(2025, 5, 28),
        },
        Task {
            id: TaskId::new(2),
            title: "Blog Content Strategy".into(),
            description: "Develop Q3 content calendar".into(),
            assigned_to: Some(MemberId::new(2)),
            priority: Priority::Medium,
            due_date: day(2025, 6, 15),
            status: TaskStatus::Pending,
            created_at: midnight(2025, 5, 30),
            assigned_date: midnight(2025, 5, 30),
        },
    ]
}
