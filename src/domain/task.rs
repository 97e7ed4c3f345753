use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::date_parts::DateParts;
use super::error::ValidationError;
use super::tag::{Tag, TagId};
use super::timestamp;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub i64);

/// Board column of a task. Statuses this client does not know are kept
/// verbatim in `Other` so the task stays visible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
            TaskStatus::Other(s) => s,
        }
    }

    /// Next column in todo -> in progress -> done -> todo order.
    pub fn next(&self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done | TaskStatus::Other(_) => TaskStatus::Todo,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "todo" => TaskStatus::Todo,
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Task {
    pub fn tag_ids(&self) -> Vec<TagId> { self.tags.iter().map(|t| t.id).collect() }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    pub tag_ids: Vec<TagId>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<TagId>>,
}

impl UpdateTask {
    pub fn status(status: TaskStatus) -> Self { Self { status: Some(status), ..Self::default() } }
}

/// What the create-task form holds before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due: DateParts,
    pub tag_ids: Vec<TagId>,
}

impl TaskDraft {
    pub fn new(due: DateParts) -> Self {
        Self { title: String::new(), description: String::new(), due, tag_ids: Vec::new() }
    }

    pub fn toggle_tag(&mut self, id: TagId) {
        match self.tag_ids.iter().position(|t| *t == id) {
            Some(idx) => { self.tag_ids.remove(idx); }
            None => self.tag_ids.push(id),
        }
    }

    /// Checks the title and due date and produces the request body.
    /// The due date fields are read in `tz`.
    pub fn validate<Tz: TimeZone>(&self, tz: &Tz) -> Result<NewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() { return Err(ValidationError::EmptyTitle); }
        let mut due = self.due.clone();
        due.pad_all();
        let due_date = due.to_timestamp(tz)?;
        let description = Some(self.description.trim()).filter(|d| !d.is_empty()).map(str::to_string);
        Ok(NewTask { title: title.to_string(), description, status: TaskStatus::Todo, due_date: Some(due_date), tag_ids: self.tag_ids.clone() })
    }
}
