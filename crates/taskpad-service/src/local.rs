use std::sync::Arc;

use async_trait::async_trait;
use taskpad_core::task::{CreateTask, Task, TaskFilter, UpdateTask};
use taskpad_db::{Database, DbError};

use crate::{ServiceError, TaskService};

/// Implementation backed by a store instance in the same process.
///
/// Input validation lives here, in front of the backends, so the
/// durable and transient stores see identical rules.
pub struct LocalService {
    db: Arc<dyn Database>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl TaskService for LocalService {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError> {
        Ok(self.db.list_tasks(filter).await?)
    }

    async fn get_task(&self, id: &str) -> Result<Task, ServiceError> {
        Ok(self.db.get_task(id).await?)
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::InvalidInput("title is required".into()));
        }
        Ok(self.db.create_task(input).await?)
    }

    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, ServiceError> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ServiceError::InvalidInput("title cannot be empty".into()));
        }
        Ok(self.db.update_task(id, update).await?)
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        Ok(self.db.delete_task(id).await?)
    }
}
