// src/models/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow stages, in display order. The order is not a transition graph:
/// any status may be set from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Backlog,
    Todo,
    InProgress,
    Blocked,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::Todo => "todo",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "backlog" => Some(Status::Backlog),
            "todo" => Some(Status::Todo),
            "in_progress" => Some(Status::InProgress),
            "blocked" => Some(Status::Blocked),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Med,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Med => "med",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "med" => Some(Priority::Med),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Who a task belongs to. The board is shared by two people, so this is a
/// closed set rather than a user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignee {
    Unassigned,
    A,
    B,
    Both,
}

impl Assignee {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assignee::Unassigned => "unassigned",
            Assignee::A => "a",
            Assignee::B => "b",
            Assignee::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Assignee> {
        match s {
            "unassigned" => Some(Assignee::Unassigned),
            "a" => Some(Assignee::A),
            "b" => Some(Assignee::B),
            "both" => Some(Assignee::Both),
            _ => None,
        }
    }
}

/// The Task model. `id` is caller-supplied and immutable; `created_at` is set
/// once at first persistence and never changes, `updated_at` moves on every
/// write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assignee: Assignee,
    pub status: Status,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The whole board: just the task collection, re-read from the active
/// backend on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub tasks: Vec<Task>,
}

/// A partial task keyed by id, as handed to upsert. Absent fields fall back
/// to the stored value, or to the built-in defaults on first insert.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<Assignee>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Field-level checks that serde cannot express.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.id.is_empty() {
            return Err("id must not be empty");
        }
        if let Some(title) = &self.title {
            if title.is_empty() {
                return Err("title must not be empty");
            }
        }
        Ok(())
    }
}

impl Task {
    /// First insert for an unseen id: unset fields take the documented
    /// defaults, and both timestamps are "now".
    pub fn create_from(patch: &TaskPatch, now: DateTime<Utc>) -> Task {
        Task {
            id: patch.id.clone(),
            title: patch
                .title
                .clone()
                .unwrap_or_else(|| "Untitled".to_string()),
            description: patch.description.clone(),
            assignee: patch.assignee.unwrap_or(Assignee::Unassigned),
            status: patch.status.unwrap_or(Status::Backlog),
            priority: patch.priority.unwrap_or(Priority::Med),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the stored state: provided fields win, everything
    /// else is carried forward. `created_at` is kept stable.
    pub fn merged(&self, patch: &TaskPatch, now: DateTime<Utc>) -> Task {
        Task {
            id: self.id.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            assignee: patch.assignee.unwrap_or(self.assignee),
            status: patch.status.unwrap_or(self.status),
            priority: patch.priority.unwrap_or(self.priority),
            created_at: self.created_at,
            updated_at: now,
        }
    }
}
