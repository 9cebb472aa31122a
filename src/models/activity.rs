use chrono::{DateTime, Utc};
use serde_derive::Serialize;
use std::fmt;

/// One audit record of a task mutation or export.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Activity {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub action: String,
    pub details: String,
    #[serde(skip_serializing)]
    pub ip_address: String,
    #[serde(skip_serializing)]
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    TaskCreated,
    TaskUpdated,
    TaskStatusChanged,
    TaskDeleted,
    TasksExported,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::TaskCreated => "task_created",
            ActivityAction::TaskUpdated => "task_updated",
            ActivityAction::TaskStatusChanged => "task_status_changed",
            ActivityAction::TaskDeleted => "task_deleted",
            ActivityAction::TasksExported => "tasks_exported",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a request came from, as recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub ip_address: String,
    pub user_agent: String,
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_and_network_fields_stay_out_of_responses() {
        let activity = Activity {
            id: 1,
            user_id: "7".to_string(),
            action: ActivityAction::TaskCreated.to_string(),
            details: "Created task: Pay rent".to_string(),
            ip_address: "10.0.0.1".to_string(),
            user_agent: "curl/8.0".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["action"], "task_created");
        assert!(json.get("ip_address").is_none());
        assert!(json.get("user_agent").is_none());
        assert!(json.get("user_id").is_none());
    }
}
