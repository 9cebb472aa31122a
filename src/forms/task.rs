use crate::models::{TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde_derive::Deserialize;
use serde_valid::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 255)]
    pub title: String,
    #[validate(max_length = 5000)]
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskForm {
    /// Unknown or missing priorities fall back to medium.
    pub fn priority_or_default(&self) -> TaskPriority {
        self.priority
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_default()
    }

    /// Unknown values are ignored on update.
    pub fn known_priority(&self) -> Option<TaskPriority> {
        self.priority.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn known_status(&self) -> Option<TaskStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Query string of the task list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQuery {
    pub search: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        TaskFilter {
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            priority: query.priority.and_then(|p| p.parse().ok()),
            status: query.status.and_then(|s| s.parse().ok()),
        }
    }
}
