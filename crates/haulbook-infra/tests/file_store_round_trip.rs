//! The store over real files in a temp directory

use std::fs;

use haulbook_domain::model::{JobDraft, ReceiptDraft};
use haulbook_domain::repository::StorageKey;
use haulbook_domain::service::daily_net;
use haulbook_infra::persistence::FileListStorage;
use haulbook_store::Store;
use tempfile::tempdir;

#[test]
fn test_reopen_sees_saved_state() {
    let dir = tempdir().expect("Failed to create temp dir");
    let storage = FileListStorage::open(dir.path().to_path_buf()).expect("Failed to open storage");

    let mut store = Store::load_all(storage.clone());
    let job = store.create_job(JobDraft {
        date: Some("2025-06-10".into()),
        amount: Some(500.0),
        ..Default::default()
    });
    store.create_receipt(ReceiptDraft {
        date: Some("2025-06-10".into()),
        amount: Some(40.0),
        job_id: Some(job.id.clone()),
        ..Default::default()
    });
    assert!(store.persistence_error().is_none());

    let reopened = Store::load_all(FileListStorage::open(dir.path().to_path_buf()).unwrap());
    assert_eq!(reopened.ledger(), store.ledger());
    assert_eq!(daily_net(reopened.ledger(), "2025-06-10"), 460.0);
}

#[test]
fn test_corrupt_file_loads_empty_and_is_repaired_on_save() {
    let dir = tempdir().unwrap();
    let storage = FileListStorage::open(dir.path().to_path_buf()).unwrap();
    fs::write(storage.path_for(StorageKey::Jobs), "[{\"id\": \"j1\",").unwrap();

    let mut store = Store::load_all(storage.clone());
    assert!(store.ledger().jobs.is_empty());

    store.create_job(JobDraft::default());
    let content = fs::read_to_string(storage.path_for(StorageKey::Jobs)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_legacy_files_are_normalized() {
    let dir = tempdir().unwrap();
    let storage = FileListStorage::open(dir.path().to_path_buf()).unwrap();
    fs::write(
        storage.path_for(StorageKey::Jobs),
        r#"[{"id": "old-1", "date": "2023-9-4", "customer": " Pat ", "amount": "750", "status": "done"}]"#,
    )
    .unwrap();
    fs::write(
        storage.path_for(StorageKey::Trucks),
        r#"[{"id": "t1", "unit": "Unit 12", "active": "yes"}]"#,
    )
    .unwrap();

    let store = Store::load_all(storage);
    let job = store.ledger().job("old-1").unwrap();
    assert_eq!(job.date, "2023-09-04");
    assert_eq!(job.customer, "Pat");
    assert_eq!(job.amount, 750.0);
    assert_eq!(job.status.as_str(), "scheduled");
    assert_eq!(job.driver_id, "");
    assert_eq!(store.ledger().truck("t1").unwrap().label, "Unit 12");
}
