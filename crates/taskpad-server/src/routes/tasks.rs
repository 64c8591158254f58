use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use taskpad_core::task::{CreateTask, SortKey, TaskFilter, UpdateTask};
use taskpad_service::{ServiceError, TaskService};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskQuery {
    status: Option<String>,
    sort_by: Option<String>,
}

impl TaskQuery {
    /// Map the wire parameters onto store criteria. Unknown values are
    /// treated the same as an absent parameter.
    fn into_filter(self) -> TaskFilter {
        let completed = match self.status.as_deref() {
            Some("pending") => Some(false),
            Some("completed") => Some(true),
            _ => None,
        };
        let sort = self
            .sort_by
            .as_deref()
            .and_then(SortKey::parse_str)
            .unwrap_or_default();
        TaskFilter { completed, sort }
    }
}

async fn list_tasks(
    State(state): State<AppState>,
    Query(q): Query<TaskQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .list_tasks(&q.into_filter())
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .get_task(&id)
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn create_task(
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    state
        .service
        .create_task(&input)
        .await
        .map(|t| (StatusCode::CREATED, Json(json!(t))))
        .map_err(to_error)
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTask>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .update_task(&id, &input)
        .await
        .map(|t| Json(json!(t)))
        .map_err(to_error)
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .delete_task(&id)
        .await
        .map(|_| Json(json!({ "message": "Task deleted" })))
        .map_err(to_error)
}

fn to_error(e: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &e {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "message": e.to_string() })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use taskpad_db::memory::MemoryDatabase;
    use taskpad_service::LocalService;
    use tower::util::ServiceExt;

    use crate::routes::build_router;

    fn test_app() -> axum::Router {
        build_router(LocalService::new(Arc::new(MemoryDatabase::new())))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_returns_created_with_defaults() {
        let app = test_app();
        let resp = app
            .oneshot(post_json("/api/tasks", r#"{"title": "Buy milk"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let task = body_json(resp).await;
        assert_eq!(task["title"], "Buy milk");
        assert_eq!(task["priority"], "medium");
        assert_eq!(task["completed"], false);
        assert!(task["id"].is_string());
    }

    #[tokio::test]
    async fn create_without_title_is_bad_request() {
        let app = test_app();
        let resp = app.oneshot(post_json("/api/tasks", "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn get_unknown_task_is_not_found() {
        let app = test_app();
        let resp = app
            .oneshot(Request::get("/api/tasks/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn delete_unknown_task_is_not_found() {
        let app = test_app();
        let resp = app
            .oneshot(
                Request::delete("/api/tasks/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_ignores_unknown_query_values() {
        let app = test_app();
        let resp = app
            .oneshot(
                Request::get("/api/tasks?status=bogus&sortBy=bogus")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_app();
        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
