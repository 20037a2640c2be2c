//! In-memory snapshot of every record the business tracks

use serde::Serialize;

use crate::model::{DispatchAssignment, Driver, Job, Receipt, Record, Truck};

/// The owned record lists. Dispatch assignments live on the jobs and are
/// projected on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    pub jobs: Vec<Job>,
    pub receipts: Vec<Receipt>,
    pub drivers: Vec<Driver>,
    pub trucks: Vec<Truck>,
}

impl Ledger {
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
            && self.receipts.is_empty()
            && self.drivers.is_empty()
            && self.trucks.is_empty()
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        find(&self.jobs, id)
    }

    pub fn receipt(&self, id: &str) -> Option<&Receipt> {
        find(&self.receipts, id)
    }

    pub fn driver(&self, id: &str) -> Option<&Driver> {
        find(&self.drivers, id)
    }

    pub fn truck(&self, id: &str) -> Option<&Truck> {
        find(&self.trucks, id)
    }

    /// Receipts linked to a job
    pub fn receipts_for_job(&self, job_id: &str) -> Vec<&Receipt> {
        if job_id.is_empty() {
            return Vec::new();
        }
        self.receipts.iter().filter(|r| r.job_id == job_id).collect()
    }

    /// One assignment per job that has a driver or a truck
    pub fn dispatch_assignments(&self) -> Vec<DispatchAssignment> {
        self.jobs.iter().filter_map(DispatchAssignment::for_job).collect()
    }
}

fn find<'a, T: Record>(list: &'a [T], id: &str) -> Option<&'a T> {
    list.iter().find(|r| r.id() == id)
}

/// Record types the ledger stores in a list of their own
pub trait Collection: Record {
    fn list(ledger: &Ledger) -> &Vec<Self>;
    fn list_mut(ledger: &mut Ledger) -> &mut Vec<Self>;
}

impl Collection for Job {
    fn list(ledger: &Ledger) -> &Vec<Self> {
        &ledger.jobs
    }

    fn list_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.jobs
    }
}

impl Collection for Receipt {
    fn list(ledger: &Ledger) -> &Vec<Self> {
        &ledger.receipts
    }

    fn list_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.receipts
    }
}

impl Collection for Driver {
    fn list(ledger: &Ledger) -> &Vec<Self> {
        &ledger.drivers
    }

    fn list_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.drivers
    }
}

impl Collection for Truck {
    fn list(ledger: &Ledger) -> &Vec<Self> {
        &ledger.trucks
    }

    fn list_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.trucks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JobDraft;

    fn job(id: &str, driver: &str, truck: &str) -> Job {
        Job::normalize_at(
            JobDraft {
                id: Some(id.into()),
                date: Some("2025-06-10".into()),
                driver_id: Some(driver.into()),
                truck_id: Some(truck.into()),
                ..Default::default()
            },
            1,
        )
    }

    #[test]
    fn test_dispatch_is_projected_from_assigned_jobs() {
        let ledger = Ledger {
            jobs: vec![job("j1", "d1", ""), job("j2", "", ""), job("j3", "", "t1")],
            ..Default::default()
        };
        let dispatch = ledger.dispatch_assignments();
        let job_ids: Vec<&str> = dispatch.iter().map(|a| a.job_id.as_str()).collect();
        assert_eq!(job_ids, ["j1", "j3"]);
        assert_eq!(dispatch[0].id, "dispatch_j1");
        assert_eq!(dispatch[0].driver_id, "d1");
        assert_eq!(dispatch[1].truck_id, "t1");
        assert_eq!(dispatch[1].date, "2025-06-10");
    }
}
