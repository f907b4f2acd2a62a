use std::fs;
use std::time::Duration;

use serde_json::{Value, json};
use streavmin_store::error::StoreError;
use streavmin_store::infrastructure::store::{DocumentStore, LockSettings};
use tempfile::tempdir;

fn fast_lock() -> LockSettings {
    LockSettings {
        retries: 30,
        min_wait: Duration::from_millis(5),
        max_wait: Duration::from_millis(40),
    }
}

#[tokio::test]
async fn read_seeds_missing_document_with_default() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    let value: Vec<String> = store
        .read("catalog/movies.json", Vec::new())
        .await
        .expect("read");
    assert!(value.is_empty());
    assert!(dir.path().join("catalog/movies.json").exists());
}

#[tokio::test]
async fn read_opt_reports_missing_and_empty_as_none() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    let missing: Option<Value> = store.read_opt("nope.json").await.expect("read");
    assert!(missing.is_none());

    fs::write(dir.path().join("empty.json"), "").expect("write");
    let empty: Option<Value> = store.read_opt("empty.json").await.expect("read");
    assert!(empty.is_none());
    // the placeholder is left alone, not rewritten
    assert_eq!(fs::read(dir.path().join("empty.json")).expect("read").len(), 0);
}

#[tokio::test]
async fn non_json_content_is_a_corrupt_document() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    fs::write(dir.path().join("bad.json"), "{definitely not json").expect("write");
    let err = store.read::<Value>("bad.json", json!({})).await.unwrap_err();
    assert!(matches!(err, StoreError::CorruptDocument { .. }));
}

#[tokio::test]
async fn write_then_read_round_trips() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    store
        .write("nested/dir/doc.json", &json!({ "answer": 42 }))
        .await
        .expect("write");
    let doc: Option<Value> = store.read_opt("nested/dir/doc.json").await.expect("read");
    assert_eq!(doc.expect("present")["answer"], 42);
}

#[tokio::test]
async fn update_passes_default_when_file_is_absent() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    let next = store
        .update("counter.json", Some(json!({ "n": 0 })), |current| {
            let mut doc = current.expect("default");
            doc["n"] = json!(doc["n"].as_i64().expect("n") + 1);
            Ok(doc)
        })
        .await
        .expect("update");
    assert_eq!(next["n"], 1);

    let on_disk: Option<Value> = store.read_opt("counter.json").await.expect("read");
    assert_eq!(on_disk.expect("present")["n"], 1);
}

#[tokio::test]
async fn updater_error_propagates_and_releases_the_lock() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::new(dir.path());

    let err = store
        .update::<Value, _>("doc.json", Some(json!([])), |_| {
            Err(StoreError::InvalidInput("nope".to_string()))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput(_)));

    // a failed cycle leaves nothing behind and the path stays lockable
    assert!(!dir.path().join("doc.json").exists());
    store
        .update("doc.json", Some(json!([])), |current| {
            Ok(current.expect("default"))
        })
        .await
        .expect("second update");
}

#[tokio::test]
async fn concurrent_updates_serialize_even_with_a_failing_updater() {
    let dir = tempdir().expect("tempdir");
    let store = DocumentStore::with_settings(dir.path(), fast_lock());

    store
        .write("counter.json", &json!({ "applied": [] }))
        .await
        .expect("seed");

    let mut tasks = Vec::new();
    for i in 0..12u32 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            store
                .update("counter.json", None, move |current: Option<Value>| {
                    let mut doc = current.ok_or(StoreError::NotFound("counter"))?;
                    if i == 5 {
                        return Err(StoreError::InvalidInput("injected failure".to_string()));
                    }
                    doc["applied"]
                        .as_array_mut()
                        .expect("array")
                        .push(json!(i));
                    Ok(doc)
                })
                .await
        }));
    }

    let mut failures = 0;
    for task in tasks {
        if task.await.expect("join").is_err() {
            failures += 1;
        }
    }
    assert_eq!(failures, 1);

    // the final document is valid json reflecting exactly the successful updates
    let doc: Value = store
        .read_opt("counter.json")
        .await
        .expect("read")
        .expect("present");
    assert_eq!(doc["applied"].as_array().expect("array").len(), 11);
    assert!(!dir.path().join("counter.json.tmp").exists());
}

#[tokio::test]
async fn lock_held_elsewhere_times_out() {
    let dir = tempdir().expect("tempdir");
    let settings = LockSettings {
        retries: 2,
        min_wait: Duration::from_millis(5),
        max_wait: Duration::from_millis(10),
    };
    let store = DocumentStore::with_settings(dir.path(), settings);
    store.write("doc.json", &json!({})).await.expect("seed");

    let lock_file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.path().join("doc.json.lock"))
        .expect("open lock file");
    lock_file.lock().expect("hold lock");

    let err = store
        .update::<Value, _>("doc.json", None, |current| Ok(current.expect("doc")))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::LockTimeout { attempts: 3, .. }));
}
