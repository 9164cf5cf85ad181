//! In-memory store for tests.
//!
//! Backs both repository traits with plain vectors. `fail_with` poisons the
//! store so every subsequent call returns `StoreError::Unavailable`, which
//! lets tests exercise the infrastructure-error paths of validators and the
//! auth flow.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::task::Task;
use crate::models::user::User;

use super::{StoreError, TaskStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    tasks: Mutex<Vec<Task>>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent store call fail with the given message.
    pub fn fail_with(&self, message: impl Into<String>) {
        let mut failure = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *failure = Some(message.into());
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        let failure = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        match failure.as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.check_failure()?;
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.check_failure()?;
        let needle = username.to_lowercase();
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users
            .iter()
            .find(|u| u.username.to_lowercase() == needle)
            .cloned())
    }

    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        self.check_failure()?;
        let needle = username.to_lowercase();
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users
            .iter()
            .any(|u| u.username.to_lowercase() == needle && Some(u.id) != excluding))
    }

    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &User) -> Result<User, StoreError> {
        self.check_failure()?;
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user.clone())
            }
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        self.check_failure()?;
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        let mut owned: Vec<Task> = tasks.iter().filter(|t| t.user_id == user_id).cloned().collect();
        owned.sort_by_key(|t| t.created_at);
        Ok(owned)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>, StoreError> {
        self.check_failure()?;
        let tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn insert_task(&self, task: &Task) -> Result<Task, StoreError> {
        self.check_failure()?;
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.push(task.clone());
        Ok(task.clone())
    }

    async fn update_task(&self, task: &Task) -> Result<Task, StoreError> {
        self.check_failure()?;
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        match tasks
            .iter_mut()
            .find(|t| t.id == task.id && t.user_id == task.user_id)
        {
            Some(existing) => {
                *existing = task.clone();
                Ok(task.clone())
            }
            None => Err(StoreError::Database(sqlx::Error::RowNotFound)),
        }
    }

    async fn delete_task(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        self.check_failure()?;
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(tasks.len() < before)
    }
}
