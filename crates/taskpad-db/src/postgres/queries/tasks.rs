use chrono::{DateTime, Utc};

use taskpad_core::task::{CreateTask, Priority, SortKey, Task, TaskFilter, UpdateTask};

use super::super::{pg_err, pg_not_found, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    priority: String,
    due_date: Option<DateTime<Utc>>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(r: TaskRow) -> Self {
        Task {
            id: r.id,
            title: r.title,
            description: r.description,
            priority: Priority::parse_str(&r.priority).unwrap_or(Priority::Medium),
            due_date: r.due_date,
            completed: r.completed,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// ORDER BY clause per sort key. Priority ranks through a CASE so the
/// textual column orders high before low; created_at breaks ties the
/// same way the in-memory store's stable sort does.
fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Priority => {
            "ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END, created_at ASC"
        }
        SortKey::DueDate => "ORDER BY due_date ASC NULLS LAST, created_at ASC",
        SortKey::CreatedAt => "ORDER BY created_at DESC",
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_create_task(&self, input: &CreateTask) -> Result<Task, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO tasks (id, title, description, priority, due_date, completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)",
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.priority.as_str())
        .bind(input.due_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;

        self.pg_get_task(&id).await
    }

    pub(crate) async fn pg_get_task(&self, id: &str) -> Result<Task, DbError> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(pg_err)?
            .ok_or_else(|| pg_not_found(&format!("task {id}")))?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DbError> {
        let mut sql = String::from("SELECT * FROM tasks");
        if filter.completed.is_some() {
            sql.push_str(" WHERE completed = $1");
        }
        sql.push(' ');
        sql.push_str(order_clause(filter.sort));

        let mut query = sqlx::query_as::<_, TaskRow>(&sql);
        if let Some(completed) = filter.completed {
            query = query.bind(completed);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(pg_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub(crate) async fn pg_update_task(
        &self,
        id: &str,
        update: &UpdateTask,
    ) -> Result<Task, DbError> {
        let now = Utc::now();
        let mut sets = vec![String::from("updated_at = $1")];
        let mut param_idx = 2usize;

        enum ParamValue {
            Str(String),
            Bool(bool),
            Timestamp(DateTime<Utc>),
        }
        let mut params: Vec<ParamValue> = Vec::new();

        if let Some(ref title) = update.title {
            sets.push(format!("title = ${param_idx}"));
            params.push(ParamValue::Str(title.clone()));
            param_idx += 1;
        }
        if let Some(ref description) = update.description {
            sets.push(format!("description = ${param_idx}"));
            params.push(ParamValue::Str(description.clone()));
            param_idx += 1;
        }
        if let Some(priority) = update.priority {
            sets.push(format!("priority = ${param_idx}"));
            params.push(ParamValue::Str(priority.as_str().to_string()));
            param_idx += 1;
        }
        if let Some(due_date) = update.due_date {
            sets.push(format!("due_date = ${param_idx}"));
            params.push(ParamValue::Timestamp(due_date));
            param_idx += 1;
        }
        if let Some(completed) = update.completed {
            sets.push(format!("completed = ${param_idx}"));
            params.push(ParamValue::Bool(completed));
            param_idx += 1;
        }

        let id_param = param_idx;
        let sql = format!("UPDATE tasks SET {} WHERE id = ${id_param}", sets.join(", "));

        let mut query = sqlx::query(&sql).bind(now);
        for p in &params {
            match p {
                ParamValue::Str(s) => query = query.bind(s),
                ParamValue::Bool(b) => query = query.bind(b),
                ParamValue::Timestamp(t) => query = query.bind(t),
            }
        }
        query = query.bind(id);

        let result = query.execute(&self.pool).await.map_err(pg_err)?;
        if result.rows_affected() == 0 {
            return Err(pg_not_found(&format!("task {id}")));
        }

        self.pg_get_task(id).await
    }

    pub(crate) async fn pg_delete_task(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(pg_err)?;

        if result.rows_affected() == 0 {
            return Err(pg_not_found(&format!("task {id}")));
        }

        Ok(())
    }
}
