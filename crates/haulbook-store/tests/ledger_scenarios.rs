//! End-to-end scenarios over the store and the domain services

use haulbook_domain::model::{DriverDraft, JobDraft, JobStatus, ReceiptDraft, TruckDraft};
use haulbook_domain::service::{calendar_markers, daily_expense, daily_net, daily_revenue, month_totals};
use haulbook_store::{MemoryStorage, Store};

const DAY: &str = "2025-06-10";

#[test]
fn test_job_with_fuel_receipt_then_cancelled() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);

    let job = store.create_job(JobDraft {
        date: Some(DAY.into()),
        customer: Some("Acme".into()),
        amount: Some(500.0),
        ..Default::default()
    });
    store.create_receipt(ReceiptDraft {
        date: Some(DAY.into()),
        vendor: Some("Shell".into()),
        amount: Some(40.0),
        job_id: Some(job.id.clone()),
        ..Default::default()
    });

    assert_eq!(daily_revenue(store.ledger(), DAY), 500.0);
    assert_eq!(daily_expense(store.ledger(), DAY), 40.0);
    assert_eq!(daily_net(store.ledger(), DAY), 460.0);

    let cancelled = store.set_job_status(&job.id, JobStatus::Cancelled).unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert_eq!(daily_revenue(store.ledger(), DAY), 0.0);
    assert_eq!(daily_net(store.ledger(), DAY), -40.0);
    assert_eq!(calendar_markers(store.ledger(), DAY).job_count, 1);

    let june = month_totals(store.ledger(), 2025, 5);
    assert_eq!((june.revenue, june.expenses, june.net), (0.0, 40.0, -40.0));
}

#[test]
fn test_deleting_driver_unassigns_but_keeps_job() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);

    let driver = store.create_driver(DriverDraft {
        name: Some("Dee".into()),
        ..Default::default()
    });
    let job = store.create_job(JobDraft {
        date: Some(DAY.into()),
        driver_id: Some(driver.id.clone()),
        ..Default::default()
    });

    assert!(store.delete_driver(&driver.id));
    let job = store.ledger().job(&job.id).expect("job survives driver deletion");
    assert_eq!(job.driver_id, "");

    // the unassignment reached storage too
    let reloaded = Store::load_all(&storage);
    assert_eq!(reloaded.ledger().job(&job.id).unwrap().driver_id, "");
}

#[test]
fn test_deleting_truck_unassigns_jobs() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);

    let truck = store.create_truck(TruckDraft {
        label: Some("Box 1".into()),
        ..Default::default()
    });
    let job = store.create_job(JobDraft {
        truck_id: Some(truck.id.clone()),
        ..Default::default()
    });

    assert!(store.delete_truck(&truck.id));
    assert!(store.ledger().trucks.is_empty());
    assert_eq!(store.ledger().job(&job.id).unwrap().truck_id, "");
}

#[test]
fn test_deleting_job_never_deletes_receipts() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);

    let job = store.create_job(JobDraft::default());
    let receipt = store.create_receipt(ReceiptDraft {
        amount: Some(12.0),
        job_id: Some(job.id.clone()),
        ..Default::default()
    });

    assert!(store.delete_job(&job.id));
    let kept = store.ledger().receipt(&receipt.id).expect("receipt survives job deletion");
    assert_eq!(kept.job_id, "");
    assert_eq!(kept.amount, 12.0);
}

#[test]
fn test_save_then_load_round_trips() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);
    store.seed_if_empty();
    let driver = store.create_driver(DriverDraft {
        name: Some("Lou".into()),
        active: Some(false),
        ..Default::default()
    });
    let job = store.create_job(JobDraft {
        date: Some("2025-07-01".into()),
        amount: Some(1234.56),
        status: Some("completed".into()),
        driver_id: Some(driver.id.clone()),
        ..Default::default()
    });
    store.create_receipt(ReceiptDraft {
        category: Some("Tolls".into()),
        amount: Some(7.25),
        job_id: Some(job.id),
        ..Default::default()
    });

    let reloaded = Store::load_all(&storage);
    assert_eq!(reloaded.ledger(), store.ledger());
}

#[test]
fn test_month_boundary_through_store() {
    let storage = MemoryStorage::new();
    let mut store = Store::load_all(&storage);
    store.create_job(JobDraft {
        date: Some("2025-01-31".into()),
        amount: Some(300.0),
        ..Default::default()
    });
    store.create_job(JobDraft {
        date: Some("2025-02-01".into()),
        amount: Some(700.0),
        ..Default::default()
    });

    assert_eq!(month_totals(store.ledger(), 2025, 0).revenue, 300.0);
    assert_eq!(month_totals(store.ledger(), 2025, 1).revenue, 700.0);
}
