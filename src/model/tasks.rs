use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

/// Kanban column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskColumn {
    Queue,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// One work item on the board.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskColumn,
    pub priority: TaskPriority,
    /// How much drive the agent currently has for this task, 0-100.
    pub momentum: u8,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub momentum: Option<u8>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskColumn>,
    pub priority: Option<TaskPriority>,
    pub momentum: Option<u8>,
    pub progress: Option<u8>,
}

impl TaskRecord {
    /// New task lands in the queue with zero progress.
    pub fn create(new: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: new.title,
            description: new.description.unwrap_or_default(),
            status: TaskColumn::Queue,
            priority: new.priority.unwrap_or(TaskPriority::Medium),
            momentum: new.momentum.unwrap_or(50).min(100),
            progress: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Merge the supplied fields and stamp `updated_at`.
    ///
    /// The first transition into `done` sets `completed_at` and forces the
    /// progress to 100. `completed_at` is never cleared afterwards, even if
    /// the task is moved back out of the column.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(momentum) = patch.momentum {
            self.momentum = momentum.min(100);
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }

        self.updated_at = now;

        if self.status == TaskColumn::Done && self.completed_at.is_none() {
            self.completed_at = Some(now);
            self.progress = 100;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn new_task(title: &str) -> TaskRecord {
        TaskRecord::create(
            NewTask {
                title: title.to_string(),
                description: None,
                priority: None,
                momentum: None,
            },
            Utc::now(),
        )
    }

    fn empty_patch() -> TaskPatch {
        TaskPatch {
            title: None,
            description: None,
            status: None,
            priority: None,
            momentum: None,
            progress: None,
        }
    }

    #[test]
    fn create_defaults() {
        let task = new_task("ship it");
        assert_eq!(task.status, TaskColumn::Queue);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.momentum, 50);
        assert_eq!(task.progress, 0);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn patch_stamps_updated_at() {
        let mut task = new_task("ship it");
        let later = task.created_at + TimeDelta::seconds(5);

        task.apply(
            TaskPatch {
                progress: Some(30),
                ..empty_patch()
            },
            later,
        );
        assert_eq!(task.progress, 30);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn done_transition_completes_task() {
        let mut task = new_task("ship it");
        let later = task.created_at + TimeDelta::seconds(5);

        task.apply(
            TaskPatch {
                status: Some(TaskColumn::Done),
                ..empty_patch()
            },
            later,
        );
        assert_eq!(task.progress, 100);
        assert_eq!(task.completed_at, Some(later));
    }

    #[test]
    fn done_transition_is_one_way() {
        let mut task = new_task("ship it");
        let done_at = task.created_at + TimeDelta::seconds(5);
        task.apply(
            TaskPatch {
                status: Some(TaskColumn::Done),
                ..empty_patch()
            },
            done_at,
        );

        // Moving the task back out keeps the completion timestamp.
        task.apply(
            TaskPatch {
                status: Some(TaskColumn::Queue),
                ..empty_patch()
            },
            done_at + TimeDelta::seconds(5),
        );
        assert_eq!(task.status, TaskColumn::Queue);
        assert_eq!(task.completed_at, Some(done_at));
    }

    #[test]
    fn momentum_and_progress_are_clamped() {
        let mut task = new_task("ship it");
        task.apply(
            TaskPatch {
                momentum: Some(250),
                progress: Some(110),
                ..empty_patch()
            },
            Utc::now(),
        );
        assert_eq!(task.momentum, 100);
        // 110 clamps to 100, which also marks nothing: status is still queue.
        assert_eq!(task.progress, 100);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let task = new_task("ship it");
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("completedAt").is_some());
        assert_eq!(value["status"], "queue");
    }
}
