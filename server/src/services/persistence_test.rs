use super::*;
use crate::state::test_helpers;
use board::element::Tool;

fn temp_store_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("whiteboard-test-{}-{name}.json", std::process::id()))
}

struct FileGuard(PathBuf);

impl Drop for FileGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
        let _ = std::fs::remove_file(temp_path(&self.0));
    }
}

#[tokio::test]
async fn load_missing_file_yields_empty_board() {
    let path = temp_store_path("missing");
    let elements = load_elements(&path).await.expect("load should succeed");
    assert!(elements.is_empty());
}

#[tokio::test]
async fn flush_writes_elements_and_load_round_trips_them() {
    let path = temp_store_path("round-trip");
    let _guard = FileGuard(path.clone());

    let element = test_helpers::dummy_element();
    let state = test_helpers::test_app_state_with_elements(vec![element.clone()]);
    {
        let mut store = state.store.write().await;
        store.dirty = true;
        store.version = 1;
    }

    let wrote = flush_if_dirty(&state, &path).await.expect("flush should succeed");
    assert!(wrote);

    let loaded = load_elements(&path).await.expect("load should succeed");
    assert_eq!(loaded.to_vec(), vec![element]);
}

#[tokio::test]
async fn flush_is_skipped_when_store_is_clean() {
    let path = temp_store_path("clean");
    let _guard = FileGuard(path.clone());

    let state = test_helpers::test_app_state_with_elements(vec![test_helpers::dummy_element()]);
    let wrote = flush_if_dirty(&state, &path).await.expect("flush should succeed");

    assert!(!wrote);
    assert!(!path.exists());
}

#[tokio::test]
async fn flush_clears_dirty_only_for_the_flushed_version() {
    let path = temp_store_path("version-race");
    let _guard = FileGuard(path.clone());

    let state = test_helpers::test_app_state();
    {
        let mut store = state.store.write().await;
        store.dirty = true;
        store.version = 3;
    }

    flush_if_dirty(&state, &path).await.expect("flush should succeed");
    {
        let store = state.store.read().await;
        assert!(!store.dirty, "dirty should clear when no write raced the flush");
    }

    // A write that lands after the snapshot keeps the store dirty.
    {
        let mut store = state.store.write().await;
        store.dirty = true;
        store.version = 4;
    }
    ack_flush(&state, 3).await;
    let store = state.store.read().await;
    assert!(store.dirty, "a newer version must stay dirty");
}

#[tokio::test]
async fn load_skips_malformed_records_and_keeps_valid_ones() {
    let path = temp_store_path("malformed");
    let _guard = FileGuard(path.clone());

    let good = test_helpers::dummy_element();
    let contents = serde_json::json!([
        good,
        {"id": "not-a-uuid", "points": []},
        42,
    ]);
    tokio::fs::write(&path, serde_json::to_vec(&contents).expect("encode"))
        .await
        .expect("write test file");

    let loaded = load_elements(&path).await.expect("load should succeed");
    assert_eq!(loaded.to_vec(), vec![good]);
}

#[tokio::test]
async fn load_rejects_a_file_that_is_not_an_array() {
    let path = temp_store_path("not-array");
    let _guard = FileGuard(path.clone());
    tokio::fs::write(&path, b"{\"elements\": 1}").await.expect("write test file");

    let result = load_elements(&path).await;
    assert!(matches!(result, Err(PersistError::Json(_))));
}

#[tokio::test]
async fn flush_preserves_arrival_order_in_the_file() {
    let path = temp_store_path("order");
    let _guard = FileGuard(path.clone());

    let mut first = test_helpers::dummy_element();
    first.tool = Tool::Line;
    let second = test_helpers::dummy_element();
    let state = test_helpers::test_app_state_with_elements(vec![first.clone(), second.clone()]);
    {
        let mut store = state.store.write().await;
        store.dirty = true;
        store.version = 1;
    }

    flush_if_dirty(&state, &path).await.expect("flush should succeed");
    let loaded = load_elements(&path).await.expect("load should succeed");
    let order: Vec<_> = loaded.iter().map(|e| e.id).collect();
    assert_eq!(order, vec![first.id, second.id]);
}
