// Backend-agnostic tests for the Database trait.
//
// Each public async function accepts `&dyn Database` so that the same
// assertions can be exercised against both the in-memory and the
// Postgres backend.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use taskpad_core::task::{CreateTask, Priority, SortKey, TaskFilter, UpdateTask};
use taskpad_db::Database;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_task(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        priority: Priority::default(),
        due_date: None,
    }
}

fn with_priority(title: &str, priority: Priority) -> CreateTask {
    CreateTask {
        priority,
        ..make_task(title)
    }
}

/// Creation timestamps are tie-breakers for every sort, so keep
/// consecutive creates on distinct instants.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

// ---------------------------------------------------------------------------
// Contract tests
// ---------------------------------------------------------------------------

/// A create with only a title gets the documented defaults.
pub async fn test_create_applies_defaults(db: &dyn Database) {
    let task = db.create_task(&make_task("Buy milk")).await.unwrap();

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.priority, Priority::Medium);
    assert!(!task.completed);
    assert!(task.description.is_none());
    assert!(task.due_date.is_none());
    assert_eq!(task.created_at, task.updated_at);
}

/// create followed by get returns a record equal to the creation response.
pub async fn test_create_get_round_trip(db: &dyn Database) {
    let created = db
        .create_task(&CreateTask {
            title: "Round trip".into(),
            description: Some("check equality".into()),
            priority: Priority::High,
            due_date: Some(Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()),
        })
        .await
        .unwrap();

    let fetched = db.get_task(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

pub async fn test_get_unknown_id_is_not_found(db: &dyn Database) {
    let err = db.get_task("no-such-id").await.unwrap_err();
    assert!(matches!(err, taskpad_db::DbError::NotFound(_)));
}

/// completed=false returns exactly the pending subset, completed=true
/// the completed subset, and no filter returns everything.
pub async fn test_list_filters_by_completion(db: &dyn Database) {
    let a = db.create_task(&make_task("a")).await.unwrap();
    let b = db.create_task(&make_task("b")).await.unwrap();
    let c = db.create_task(&make_task("c")).await.unwrap();
    db.update_task(
        &b.id,
        &UpdateTask {
            completed: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = db.list_tasks(&TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let pending = db
        .list_tasks(&TaskFilter {
            completed: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    let pending_ids: Vec<&str> = pending.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(pending.len(), 2);
    assert!(pending_ids.contains(&a.id.as_str()));
    assert!(pending_ids.contains(&c.id.as_str()));

    let completed = db
        .list_tasks(&TaskFilter {
            completed: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, b.id);
}

/// Priority sort lists high, then medium, then low, preserving
/// insertion order within each tier.
pub async fn test_sort_by_priority_is_stable(db: &dyn Database) {
    let m1 = db.create_task(&with_priority("m1", Priority::Medium)).await.unwrap();
    settle().await;
    let h1 = db.create_task(&with_priority("h1", Priority::High)).await.unwrap();
    settle().await;
    let l1 = db.create_task(&with_priority("l1", Priority::Low)).await.unwrap();
    settle().await;
    let m2 = db.create_task(&with_priority("m2", Priority::Medium)).await.unwrap();

    let listed = db
        .list_tasks(&TaskFilter {
            sort: SortKey::Priority,
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![&h1.id, &m1.id, &m2.id, &l1.id]);
}

/// Due-date sort is ascending; undated tasks come last.
pub async fn test_sort_by_due_date_ascending(db: &dyn Database) {
    let due = |day: u32| Utc.with_ymd_and_hms(2026, 9, day, 9, 0, 0).unwrap();

    let later = db
        .create_task(&CreateTask {
            due_date: Some(due(20)),
            ..make_task("later")
        })
        .await
        .unwrap();
    settle().await;
    let undated = db.create_task(&make_task("undated")).await.unwrap();
    settle().await;
    let soon = db
        .create_task(&CreateTask {
            due_date: Some(due(2)),
            ..make_task("soon")
        })
        .await
        .unwrap();

    let listed = db
        .list_tasks(&TaskFilter {
            sort: SortKey::DueDate,
            ..Default::default()
        })
        .await
        .unwrap();
    let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![&soon.id, &later.id, &undated.id]);
}

/// The default ordering is newest first.
pub async fn test_default_sort_is_newest_first(db: &dyn Database) {
    let first = db.create_task(&make_task("first")).await.unwrap();
    settle().await;
    let second = db.create_task(&make_task("second")).await.unwrap();
    settle().await;
    let third = db.create_task(&make_task("third")).await.unwrap();

    let listed = db.list_tasks(&TaskFilter::default()).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![&third.id, &second.id, &first.id]);
}

/// A patch carrying only `completed` leaves every other field untouched
/// and moves updated_at strictly forward.
pub async fn test_partial_update_preserves_other_fields(db: &dyn Database) {
    let created = db
        .create_task(&CreateTask {
            title: "Write report".into(),
            description: Some("quarterly numbers".into()),
            priority: Priority::High,
            due_date: Some(Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap()),
        })
        .await
        .unwrap();

    settle().await;
    let updated = db
        .update_task(
            &created.id,
            &UpdateTask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.completed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.due_date, created.due_date);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

pub async fn test_update_unknown_id_is_not_found(db: &dyn Database) {
    let err = db
        .update_task(
            "no-such-id",
            &UpdateTask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, taskpad_db::DbError::NotFound(_)));
}

/// Deleting an id that never existed, or one already deleted, both
/// report not-found.
pub async fn test_delete_twice_is_not_found(db: &dyn Database) {
    assert!(matches!(
        db.delete_task("no-such-id").await.unwrap_err(),
        taskpad_db::DbError::NotFound(_)
    ));

    let task = db.create_task(&make_task("short lived")).await.unwrap();
    db.delete_task(&task.id).await.unwrap();
    assert!(matches!(
        db.delete_task(&task.id).await.unwrap_err(),
        taskpad_db::DbError::NotFound(_)
    ));
}

/// End-to-end lifecycle: create high-priority, complete it, watch it
/// move between the filtered listings, delete it.
pub async fn test_completion_lifecycle(db: &dyn Database) {
    let task = db
        .create_task(&with_priority("Submit report", Priority::High))
        .await
        .unwrap();
    assert!(!task.completed);
    assert_eq!(task.priority, Priority::High);

    let updated = db
        .update_task(
            &task.id,
            &UpdateTask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Submit report");

    let completed = db
        .list_tasks(&TaskFilter {
            completed: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(completed.iter().any(|t| t.id == task.id));

    let pending = db
        .list_tasks(&TaskFilter {
            completed: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(pending.iter().all(|t| t.id != task.id));

    db.delete_task(&task.id).await.unwrap();
    assert!(matches!(
        db.get_task(&task.id).await.unwrap_err(),
        taskpad_db::DbError::NotFound(_)
    ));
}
