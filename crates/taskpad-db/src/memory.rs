use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use taskpad_core::task::{CreateTask, SortKey, Task, TaskFilter, UpdateTask};

use crate::{Database, DbError};

/// Transient store: an insertion-ordered list that is empty at every
/// process start and discarded at shutdown. Each operation holds the
/// lock for its whole read-modify-write, so concurrent writers cannot
/// clobber each other's writebacks.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tasks: Arc<Mutex<Vec<Task>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tasks<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<T, DbError>,
    {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|_| DbError::Internal("lock poisoned".into()))?;
        f(&mut tasks)
    }
}

fn not_found(id: &str) -> DbError {
    DbError::NotFound(format!("task {id}"))
}

/// Apply the listing order in place. `sort_by_key` is stable, so ties
/// keep the insertion order of the underlying list.
fn sort_tasks(tasks: &mut [Task], sort: SortKey) {
    match sort {
        SortKey::Priority => tasks.sort_by_key(|t| t.priority.rank()),
        // Undated tasks sort after every dated one.
        SortKey::DueDate => tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date)),
        SortKey::CreatedAt => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
        self.with_tasks(|tasks| {
            let mut out: Vec<Task> = tasks
                .iter()
                .filter(|t| filter.completed.is_none_or(|c| t.completed == c))
                .cloned()
                .collect();
            sort_tasks(&mut out, filter.sort);
            Ok(out)
        })
    }

    async fn get_task(&self, id: &str) -> Result<Task, DbError> {
        self.with_tasks(|tasks| {
            tasks
                .iter()
                .find(|t| t.id == id)
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, DbError> {
        self.with_tasks(|tasks| {
            let now = Utc::now();
            let task = Task {
                id: uuid::Uuid::new_v4().to_string(),
                title: input.title.clone(),
                description: input.description.clone(),
                priority: input.priority,
                due_date: input.due_date,
                completed: false,
                created_at: now,
                updated_at: now,
            };
            tasks.push(task.clone());
            Ok(task)
        })
    }

    async fn update_task(&self, id: &str, update: &UpdateTask) -> Result<Task, DbError> {
        self.with_tasks(|tasks| {
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| not_found(id))?;
            if let Some(ref title) = update.title {
                task.title = title.clone();
            }
            if let Some(ref description) = update.description {
                task.description = Some(description.clone());
            }
            if let Some(priority) = update.priority {
                task.priority = priority;
            }
            if let Some(due_date) = update.due_date {
                task.due_date = Some(due_date);
            }
            if let Some(completed) = update.completed {
                task.completed = completed;
            }
            task.updated_at = Utc::now();
            Ok(task.clone())
        })
    }

    async fn delete_task(&self, id: &str) -> Result<(), DbError> {
        self.with_tasks(|tasks| {
            let idx = tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| not_found(id))?;
            tasks.remove(idx);
            Ok(())
        })
    }
}
