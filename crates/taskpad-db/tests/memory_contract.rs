// Runs the shared Database contract suite against the in-memory backend.
// The test logic lives in `common/mod.rs` so the same assertions can be
// re-used for Postgres.

mod common;

use std::sync::Arc;

use taskpad_db::memory::MemoryDatabase;
use taskpad_db::Database;

fn make_db() -> Arc<dyn Database> {
    Arc::new(MemoryDatabase::new())
}

#[tokio::test]
async fn create_applies_defaults() {
    let db = make_db();
    common::test_create_applies_defaults(&*db).await;
}

#[tokio::test]
async fn create_get_round_trip() {
    let db = make_db();
    common::test_create_get_round_trip(&*db).await;
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let db = make_db();
    common::test_get_unknown_id_is_not_found(&*db).await;
}

#[tokio::test]
async fn list_filters_by_completion() {
    let db = make_db();
    common::test_list_filters_by_completion(&*db).await;
}

#[tokio::test]
async fn sort_by_priority_is_stable() {
    let db = make_db();
    common::test_sort_by_priority_is_stable(&*db).await;
}

#[tokio::test]
async fn sort_by_due_date_ascending() {
    let db = make_db();
    common::test_sort_by_due_date_ascending(&*db).await;
}

#[tokio::test]
async fn default_sort_is_newest_first() {
    let db = make_db();
    common::test_default_sort_is_newest_first(&*db).await;
}

#[tokio::test]
async fn partial_update_preserves_other_fields() {
    let db = make_db();
    common::test_partial_update_preserves_other_fields(&*db).await;
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let db = make_db();
    common::test_update_unknown_id_is_not_found(&*db).await;
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let db = make_db();
    common::test_delete_twice_is_not_found(&*db).await;
}

#[tokio::test]
async fn completion_lifecycle() {
    let db = make_db();
    common::test_completion_lifecycle(&*db).await;
}
