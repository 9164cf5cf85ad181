//! Task model and CRUD operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::TaskStore;
use crate::validate::Errors;

use super::ModelError;

/// A task owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Non-empty
    pub title: String,

    pub details: Option<String>,

    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskInput {
    pub title: String,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

impl TaskInput {
    /// The only rule is title presence; empty details is valid.
    pub fn validate(&self) -> Errors {
        let mut errors = Errors::new();
        errors.check_presence("title", &self.title, "Title can not be blank.");
        errors
    }
}

impl Task {
    pub fn validate(&self) -> Errors {
        let mut errors = Errors::new();
        errors.check_presence("title", &self.title, "Title can not be blank.");
        errors
    }

    /// Creates a task for `user_id` from validated input.
    pub async fn create(
        store: &dyn TaskStore,
        user_id: Uuid,
        input: TaskInput,
    ) -> Result<Task, ModelError> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            details: input.details,
            completed: input.completed,
            created_at: now,
            updated_at: now,
        };

        Ok(store.insert_task(&task).await?)
    }

    /// Applies an update to an existing task, revalidating first.
    pub async fn apply(
        mut self,
        store: &dyn TaskStore,
        input: TaskInput,
    ) -> Result<Task, ModelError> {
        self.title = input.title;
        self.details = input.details;
        self.completed = input.completed;
        self.updated_at = Utc::now();

        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ModelError::Invalid(errors));
        }

        Ok(store.update_task(&self).await?)
    }
}
