//! Referential integrity on delete
//!
//! Deleting a driver, truck or job never deletes anything else. Dependents
//! are unlinked (their reference set to empty) and their `updatedAt` bumped,
//! so receipts survive the job they were filed against.

use haulbook_types::Timestamp;
use tracing::debug;

use crate::ledger::{Collection, Ledger};
use crate::model::{Driver, Job, Receipt, Record, Truck};

/// Clear `driverId` on every job pointing at `driver_id`
pub fn unassign_driver(jobs: &mut [Job], driver_id: &str, now: Timestamp) -> usize {
    scrub(jobs, now, |job| clear_if(&mut job.driver_id, driver_id))
}

/// Clear `truckId` on every job pointing at `truck_id`
pub fn unassign_truck(jobs: &mut [Job], truck_id: &str, now: Timestamp) -> usize {
    scrub(jobs, now, |job| clear_if(&mut job.truck_id, truck_id))
}

/// Clear `jobId` on every receipt pointing at `job_id`
pub fn unlink_receipts(receipts: &mut [Receipt], job_id: &str, now: Timestamp) -> usize {
    scrub(receipts, now, |receipt| clear_if(&mut receipt.job_id, job_id))
}

fn clear_if(field: &mut String, target: &str) -> bool {
    if target.is_empty() || field.as_str() != target {
        return false;
    }
    field.clear();
    true
}

fn scrub<T: Record>(records: &mut [T], now: Timestamp, mut unlink: impl FnMut(&mut T) -> bool) -> usize {
    let mut touched = 0;
    for record in records.iter_mut() {
        if unlink(record) {
            record.touch(now);
            touched += 1;
        }
    }
    touched
}

/// Remove a record by id, returning it
pub fn remove<T: Collection>(ledger: &mut Ledger, id: &str) -> Option<T> {
    let list = T::list_mut(ledger);
    let index = list.iter().position(|r| r.id() == id)?;
    Some(list.remove(index))
}

/// Remove a driver and unassign it from every job
pub fn delete_driver(ledger: &mut Ledger, id: &str, now: Timestamp) -> Option<Driver> {
    let driver = remove::<Driver>(ledger, id)?;
    let unassigned = unassign_driver(&mut ledger.jobs, id, now);
    debug!(driver = id, jobs = unassigned, "driver deleted");
    Some(driver)
}

/// Remove a truck and unassign it from every job
pub fn delete_truck(ledger: &mut Ledger, id: &str, now: Timestamp) -> Option<Truck> {
    let truck = remove::<Truck>(ledger, id)?;
    let unassigned = unassign_truck(&mut ledger.jobs, id, now);
    debug!(truck = id, jobs = unassigned, "truck deleted");
    Some(truck)
}

/// Remove a job and unlink its receipts
pub fn delete_job(ledger: &mut Ledger, id: &str, now: Timestamp) -> Option<Job> {
    let job = remove::<Job>(ledger, id)?;
    let unlinked = unlink_receipts(&mut ledger.receipts, id, now);
    debug!(job = id, receipts = unlinked, "job deleted");
    Some(job)
}

/// Receipts have no dependents
pub fn delete_receipt(ledger: &mut Ledger, id: &str) -> Option<Receipt> {
    remove::<Receipt>(ledger, id)
}
