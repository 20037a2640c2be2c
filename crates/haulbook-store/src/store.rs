//! The persistent store
//!
//! Owns the [`Ledger`] and is the only way to change it. Every mutation
//! applies to memory first and then writes every list back to storage.
//! Storage failures never abort a mutation: they are logged, remembered in
//! [`Store::persistence_error`], and the in-memory ledger stays authoritative
//! for the rest of the session.

use std::collections::{HashMap, HashSet};

use haulbook_domain::ledger::{Collection, Ledger};
use haulbook_domain::model::{
    DispatchAssignment, Draft, Driver, DriverDraft, Job, JobDraft, JobStatus, Receipt,
    ReceiptCategory, ReceiptDraft, Record, Truck, TruckDraft,
};
use haulbook_domain::repository::{ListStorage, StorageKey};
use haulbook_domain::service::integrity;
use haulbook_types::date_key::today_key;
use haulbook_types::timestamp::now_millis;
use haulbook_types::{Error, Timestamp};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub struct Store<S> {
    storage: S,
    ledger: Ledger,
    persistence_error: Option<String>,
}

impl<S: ListStorage> Store<S> {
    /// Read and normalize every list. Never fails: unreadable or corrupt
    /// lists load as empty.
    pub fn load_all(storage: S) -> Self {
        let now = now_millis();

        let dispatch: Vec<DispatchAssignment> =
            normalize_list(objects(&storage, StorageKey::Dispatch), StorageKey::Dispatch, now);
        let legacy: HashMap<&str, &DispatchAssignment> = dispatch
            .iter()
            .filter(|a| !a.job_id.is_empty())
            .map(|a| (a.job_id.as_str(), a))
            .collect();

        let jobs: Vec<Job> = objects(&storage, StorageKey::Jobs)
            .iter()
            .map(|obj| {
                let mut draft = JobDraft::from_object(obj);
                // Jobs written before dispatch moved onto the job record
                if draft.lacks_assignment_fields() {
                    if let Some(a) = draft.id.as_deref().and_then(|id| legacy.get(id.trim())) {
                        draft.driver_id = Some(a.driver_id.clone());
                        draft.truck_id = Some(a.truck_id.clone());
                    }
                }
                Job::normalize_at(draft, now)
            })
            .collect();

        let ledger = Ledger {
            jobs: dedupe(jobs, StorageKey::Jobs),
            receipts: normalize_list(objects(&storage, StorageKey::Receipts), StorageKey::Receipts, now),
            drivers: normalize_list(objects(&storage, StorageKey::Drivers), StorageKey::Drivers, now),
            trucks: normalize_list(objects(&storage, StorageKey::Trucks), StorageKey::Trucks, now),
        };
        debug!(
            jobs = ledger.jobs.len(),
            receipts = ledger.receipts.len(),
            drivers = ledger.drivers.len(),
            trucks = ledger.trucks.len(),
            "ledger loaded"
        );

        Self {
            storage,
            ledger,
            persistence_error: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Last write failure, cleared by the next successful save
    pub fn persistence_error(&self) -> Option<&str> {
        self.persistence_error.as_deref()
    }

    /// Write every list. Returns false if any list failed to write.
    pub fn save_all(&mut self) -> bool {
        let dispatch = self.ledger.dispatch_assignments();
        let results = [
            (StorageKey::Jobs, self.write_list(StorageKey::Jobs, &self.ledger.jobs)),
            (StorageKey::Receipts, self.write_list(StorageKey::Receipts, &self.ledger.receipts)),
            (StorageKey::Drivers, self.write_list(StorageKey::Drivers, &self.ledger.drivers)),
            (StorageKey::Trucks, self.write_list(StorageKey::Trucks, &self.ledger.trucks)),
            (StorageKey::Dispatch, self.write_list(StorageKey::Dispatch, &dispatch)),
        ];

        let mut first_error = None;
        for (key, result) in results {
            if let Err(e) = result {
                warn!(key = %key, error = %e, "failed to persist list; keeping in-memory state");
                first_error.get_or_insert_with(|| format!("{}: {}", key, e));
            }
        }
        let ok = first_error.is_none();
        self.persistence_error = first_error;
        ok
    }

    fn write_list<T: Serialize>(&self, key: StorageKey, records: &[T]) -> Result<(), Error> {
        let payload = serde_json::to_string_pretty(records)?;
        self.storage.write(key, &payload)
    }

    /// Give a brand-new install one of everything so the calendar isn't blank.
    /// Returns true if anything was added.
    pub fn seed_if_empty(&mut self) -> bool {
        if !self.ledger.is_empty() {
            return false;
        }
        let now = now_millis();
        let today = today_key();

        let driver = Driver::normalize_at(
            DriverDraft {
                name: Some("Sample Driver".into()),
                phone: Some("555-0100".into()),
                ..Default::default()
            },
            now,
        );
        let truck = Truck::normalize_at(
            TruckDraft {
                label: Some("Truck 1".into()),
                capacity: Some("26 ft".into()),
                ..Default::default()
            },
            now,
        );
        let job = Job::normalize_at(
            JobDraft {
                date: Some(today.clone()),
                customer: Some("Sample Customer".into()),
                pickup: Some("123 Main St".into()),
                dropoff: Some("456 Oak Ave".into()),
                amount: Some(850.0),
                driver_id: Some(driver.id.clone()),
                truck_id: Some(truck.id.clone()),
                ..Default::default()
            },
            now,
        );
        let receipt = Receipt::normalize_at(
            ReceiptDraft {
                date: Some(today),
                vendor: Some("Fuel Stop".into()),
                category: Some(ReceiptCategory::Fuel.as_str().into()),
                amount: Some(65.0),
                job_id: Some(job.id.clone()),
                ..Default::default()
            },
            now,
        );

        self.ledger.drivers.push(driver);
        self.ledger.trucks.push(truck);
        self.ledger.jobs.push(job);
        self.ledger.receipts.push(receipt);
        debug!("seeded empty ledger");
        self.save_all();
        true
    }

    fn create<T: Collection>(&mut self, draft: T::Draft) -> T {
        let record = T::normalize_at(draft.without_identity(), now_millis());
        T::list_mut(&mut self.ledger).push(record.clone());
        debug!(kind = T::KIND, id = record.id(), "created");
        self.save_all();
        record
    }

    fn update<T: Collection>(&mut self, id: &str, patch: T::Draft) -> Option<T> {
        let now = now_millis();
        let record = T::list_mut(&mut self.ledger)
            .iter_mut()
            .find(|r| r.id() == id)?;
        record.apply_patch(patch, now);
        let updated = record.clone();
        debug!(kind = T::KIND, id, "updated");
        self.save_all();
        Some(updated)
    }

    fn finish_delete<T>(&mut self, removed: Option<T>) -> bool {
        if removed.is_none() {
            return false;
        }
        self.save_all();
        true
    }

    pub fn create_job(&mut self, draft: JobDraft) -> Job {
        self.create(draft)
    }

    /// `None` if no job has that id
    pub fn update_job(&mut self, id: &str, patch: JobDraft) -> Option<Job> {
        self.update(id, patch)
    }

    /// Removes the job and unlinks its receipts. False if not found.
    pub fn delete_job(&mut self, id: &str) -> bool {
        let removed = integrity::delete_job(&mut self.ledger, id, now_millis());
        self.finish_delete(removed)
    }

    pub fn set_job_status(&mut self, id: &str, status: JobStatus) -> Option<Job> {
        self.update_job(
            id,
            JobDraft {
                status: Some(status.as_str().to_string()),
                ..Default::default()
            },
        )
    }

    /// Set the crew of a job. `None` leaves a slot as is, `Some("")` clears it.
    /// Double-booking is allowed.
    pub fn assign(&mut self, job_id: &str, driver_id: Option<&str>, truck_id: Option<&str>) -> Option<Job> {
        self.update_job(
            job_id,
            JobDraft {
                driver_id: driver_id.map(str::to_string),
                truck_id: truck_id.map(str::to_string),
                ..Default::default()
            },
        )
    }

    pub fn unassign(&mut self, job_id: &str) -> Option<Job> {
        self.assign(job_id, Some(""), Some(""))
    }

    pub fn create_receipt(&mut self, draft: ReceiptDraft) -> Receipt {
        self.create(draft)
    }

    pub fn update_receipt(&mut self, id: &str, patch: ReceiptDraft) -> Option<Receipt> {
        self.update(id, patch)
    }

    pub fn delete_receipt(&mut self, id: &str) -> bool {
        let removed = integrity::delete_receipt(&mut self.ledger, id);
        self.finish_delete(removed)
    }

    pub fn create_driver(&mut self, draft: DriverDraft) -> Driver {
        self.create(draft)
    }

    pub fn update_driver(&mut self, id: &str, patch: DriverDraft) -> Option<Driver> {
        self.update(id, patch)
    }

    /// Removes the driver and unassigns it from every job
    pub fn delete_driver(&mut self, id: &str) -> bool {
        let removed = integrity::delete_driver(&mut self.ledger, id, now_millis());
        self.finish_delete(removed)
    }

    pub fn create_truck(&mut self, draft: TruckDraft) -> Truck {
        self.create(draft)
    }

    pub fn update_truck(&mut self, id: &str, patch: TruckDraft) -> Option<Truck> {
        self.update(id, patch)
    }

    /// Removes the truck and unassigns it from every job
    pub fn delete_truck(&mut self, id: &str) -> bool {
        let removed = integrity::delete_truck(&mut self.ledger, id, now_millis());
        self.finish_delete(removed)
    }
}

/// Object elements of the list stored under `key`. Unreadable storage,
/// corrupt JSON and non-array payloads all read as an empty list.
fn objects<S: ListStorage>(storage: &S, key: StorageKey) -> Vec<Map<String, Value>> {
    let payload = match storage.read(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %key, error = %e, "storage unreadable; starting list empty");
            return Vec::new();
        }
    };

    let items = match serde_json::from_str::<Value>(&payload) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(key = %key, "stored list is not an array; starting list empty");
            return Vec::new();
        }
        Err(e) => {
            warn!(key = %key, error = %e, "stored list is corrupt; starting list empty");
            return Vec::new();
        }
    };

    let total = items.len();
    let objects: Vec<_> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect();
    if objects.len() < total {
        warn!(key = %key, skipped = total - objects.len(), "skipped non-object records");
    }
    objects
}

fn normalize_list<T: Record>(objects: Vec<Map<String, Value>>, key: StorageKey, now: Timestamp) -> Vec<T> {
    let records = objects
        .iter()
        .map(|obj| T::normalize_at(T::Draft::from_object(obj), now))
        .collect();
    dedupe(records, key)
}

/// Keep the first record for each id
fn dedupe<T: Record>(records: Vec<T>, key: StorageKey) -> Vec<T> {
    let total = records.len();
    let mut seen = HashSet::new();
    let unique: Vec<T> = records
        .into_iter()
        .filter(|r| seen.insert(r.id().to_string()))
        .collect();
    if unique.len() < total {
        warn!(key = %key, dropped = total - unique.len(), "dropped records with duplicate ids");
    }
    unique
}
